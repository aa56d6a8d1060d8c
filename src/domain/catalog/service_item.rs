//! Bookable service (e.g. "Knotless Braids" with its size variants)

use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, DomainResult};

pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub id: u64,
    /// Classification tag such as a category name
    pub service: String,
    pub name: String,
    /// Ordered style/size variants an appointment must pick from
    pub descriptions: Vec<String>,
    /// Stored image references (relative paths)
    pub images: Vec<String>,
    pub rating: f64,
}

/// Service fields as supplied for create/replace, images already stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceItemDraft {
    pub service: String,
    pub name: String,
    pub descriptions: Vec<String>,
    pub images: Vec<String>,
    pub rating: f64,
}

impl ServiceItemDraft {
    /// Trim text fields, drop blank descriptions and check the rating range.
    pub fn normalized(mut self) -> DomainResult<Self> {
        self.service = self.service.trim().to_string();
        self.name = self.name.trim().to_string();
        self.descriptions = self
            .descriptions
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();

        if self.service.is_empty() {
            return Err(DomainError::validation("service is required"));
        }
        if self.name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if self.descriptions.is_empty() {
            return Err(DomainError::validation("descriptions must not be empty"));
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(DomainError::validation("rating must be between 0 and 5"));
        }
        Ok(self)
    }
}

impl ServiceItem {
    pub fn from_draft(id: u64, draft: ServiceItemDraft) -> Self {
        Self {
            id,
            service: draft.service,
            name: draft.name,
            descriptions: draft.descriptions,
            images: draft.images,
            rating: draft.rating,
        }
    }

    /// Exact string membership in the description variants.
    pub fn offers(&self, description: &str) -> bool {
        self.descriptions.iter().any(|d| d == description)
    }

    /// Case-insensitive substring match against the name or any description.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.descriptions.iter().any(|d| d.to_lowercase().contains(&q))
    }
}

/// Filters for listing services. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Exact match on `service`
    pub category: Option<String>,
    /// Ignored unless > 0
    pub min_rating: Option<f64>,
    pub query: Option<String>,
}

impl ServiceFilter {
    pub fn accepts(&self, item: &ServiceItem) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if item.service != category {
                return false;
            }
        }
        if let Some(min) = self.min_rating.filter(|r| *r > 0.0) {
            if item.rating < min {
                return false;
            }
        }
        if let Some(q) = self.query.as_deref().filter(|q| !q.is_empty()) {
            if !item.matches_query(q) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn braids() -> ServiceItem {
        ServiceItem {
            id: 1,
            service: "Hair Styling & Braiding".into(),
            name: "Knotless Braids".into(),
            descriptions: vec!["Small".into(), "Medium".into(), "Large".into()],
            images: vec![],
            rating: 4.5,
        }
    }

    #[test]
    fn offers_is_exact() {
        let item = braids();
        assert!(item.offers("Medium"));
        assert!(!item.offers("medium"));
        assert!(!item.offers("Medium "));
    }

    #[test]
    fn filter_composes_with_and() {
        let item = braids();
        let filter = ServiceFilter {
            category: Some("Hair Styling & Braiding".into()),
            min_rating: Some(4.0),
            query: Some("LARGE".into()),
        };
        assert!(filter.accepts(&item));

        let too_strict = ServiceFilter {
            min_rating: Some(4.8),
            ..filter.clone()
        };
        assert!(!too_strict.accepts(&item));
    }

    #[test]
    fn zero_min_rating_is_ignored() {
        let mut item = braids();
        item.rating = 0.0;
        let filter = ServiceFilter {
            min_rating: Some(0.0),
            ..Default::default()
        };
        assert!(filter.accepts(&item));
    }

    #[test]
    fn draft_rejects_missing_descriptions() {
        let draft = ServiceItemDraft {
            service: "Nails".into(),
            name: "Gel Manicure".into(),
            descriptions: vec!["  ".into()],
            images: vec![],
            rating: 4.0,
        };
        let err = draft.normalized().unwrap_err();
        assert_eq!(err.to_string(), "descriptions must not be empty");
    }

    #[test]
    fn draft_rejects_rating_out_of_range() {
        let draft = ServiceItemDraft {
            service: "Nails".into(),
            name: "Gel Manicure".into(),
            descriptions: vec!["Short".into()],
            images: vec![],
            rating: 5.5,
        };
        assert!(matches!(draft.normalized(), Err(DomainError::Validation(_))));
    }
}
