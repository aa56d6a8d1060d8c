//! Menu item DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{CreateMenuItem, MenuItemChanges};
use crate::domain::MenuItem;

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemDto {
    pub id: u64,
    pub category: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: u32,
}

impl From<MenuItem> for MenuItemDto {
    fn from(m: MenuItem) -> Self {
        Self {
            id: m.id,
            category: m.category,
            name: m.name,
            currency: m.currency,
            price_cents: m.price_cents,
            duration_minutes: m.duration_minutes,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMenuItemRequest {
    pub category: Option<String>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub price_cents: Option<i64>,
    pub duration_minutes: Option<i64>,
}

impl From<CreateMenuItemRequest> for CreateMenuItem {
    fn from(r: CreateMenuItemRequest) -> Self {
        Self {
            category: r.category,
            name: r.name,
            currency: r.currency,
            price_cents: r.price_cents,
            duration_minutes: r.duration_minutes,
        }
    }
}

/// Merge update: absent fields keep their current value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub category: Option<String>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub price_cents: Option<i64>,
    pub duration_minutes: Option<i64>,
}

impl From<UpdateMenuItemRequest> for MenuItemChanges {
    fn from(r: UpdateMenuItemRequest) -> Self {
        Self {
            category: r.category,
            name: r.name,
            currency: r.currency,
            price_cents: r.price_cents,
            duration_minutes: r.duration_minutes,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListMenuItemsParams {
    /// Exact category
    pub category: Option<String>,
    /// Case-insensitive match on name or category
    pub q: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}
