//! Public price-list entry

use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, DomainResult};

pub const MIN_DURATION_MINUTES: u32 = 1;
pub const MAX_DURATION_MINUTES: u32 = 1440;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u64,
    pub category: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemDraft {
    pub category: String,
    pub name: String,
    pub currency: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: u32,
}

impl MenuItemDraft {
    pub fn normalized(mut self) -> DomainResult<Self> {
        self.category = self.category.trim().to_string();
        self.name = self.name.trim().to_string();
        self.currency = self
            .currency
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        if self.category.is_empty() {
            return Err(DomainError::validation("category is required"));
        }
        if self.name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if self.price_cents < 0 {
            return Err(DomainError::validation("price_cents must be >= 0"));
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.duration_minutes) {
            return Err(DomainError::validation(
                "duration_minutes must be between 1 and 1440",
            ));
        }
        Ok(self)
    }
}

impl MenuItem {
    pub fn from_draft(id: u64, draft: MenuItemDraft) -> Self {
        Self {
            id,
            category: draft.category,
            name: draft.name,
            currency: draft.currency,
            price_cents: draft.price_cents,
            duration_minutes: draft.duration_minutes,
        }
    }

    pub fn to_draft(&self) -> MenuItemDraft {
        MenuItemDraft {
            category: self.category.clone(),
            name: self.name.clone(),
            currency: self.currency.clone(),
            price_cents: self.price_cents,
            duration_minutes: self.duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MenuItemFilter {
    /// Exact match
    pub category: Option<String>,
    /// Case-insensitive substring of name or category
    pub query: Option<String>,
}

impl MenuItemFilter {
    pub fn accepts(&self, item: &MenuItem) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if item.category != category {
                return false;
            }
        }
        if let Some(q) = self.query.as_deref().filter(|q| !q.is_empty()) {
            let q = q.to_lowercase();
            if !item.name.to_lowercase().contains(&q) && !item.category.to_lowercase().contains(&q)
            {
                return false;
            }
        }
        true
    }
}
