//! Service item DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{CreateServiceItem, ReplaceServiceItem};
use crate::domain::ServiceItem;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceItemDto {
    pub id: u64,
    pub service: String,
    pub name: String,
    pub descriptions: Vec<String>,
    /// Relative paths served under `/uploads`
    pub images: Vec<String>,
    pub rating: f64,
}

impl From<ServiceItem> for ServiceItemDto {
    fn from(s: ServiceItem) -> Self {
        Self {
            id: s.id,
            service: s.service,
            name: s.name,
            descriptions: s.descriptions,
            images: s.images,
            rating: s.rating,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRequest {
    pub service: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    /// Base64 image payloads (data URIs accepted)
    #[serde(default)]
    pub images: Vec<String>,
    pub rating: Option<f64>,
}

impl From<CreateServiceRequest> for CreateServiceItem {
    fn from(r: CreateServiceRequest) -> Self {
        Self {
            service: r.service,
            name: r.name,
            descriptions: r.descriptions,
            images: r.images,
            rating: r.rating,
        }
    }
}

/// Full replacement. Omit `images` to keep the current ones.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRequest {
    pub service: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    pub images: Option<Vec<String>>,
    pub rating: Option<f64>,
}

impl From<UpdateServiceRequest> for ReplaceServiceItem {
    fn from(r: UpdateServiceRequest) -> Self {
        Self {
            service: r.service,
            name: r.name,
            descriptions: r.descriptions,
            images: r.images,
            rating: r.rating,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListServicesParams {
    /// Exact category (`service` field)
    pub category: Option<String>,
    /// Ignored unless > 0
    pub min_rating: Option<String>,
    /// Case-insensitive match on name or descriptions
    pub q: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}
