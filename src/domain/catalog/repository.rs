//! Catalog repository interfaces

use async_trait::async_trait;

use super::menu_item::{MenuItem, MenuItemDraft, MenuItemFilter};
use super::service_item::{ServiceFilter, ServiceItem, ServiceItemDraft};
use crate::shared::{DomainResult, Page, PageRequest};

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, draft: ServiceItemDraft) -> DomainResult<ServiceItem>;

    /// Resolve a service reference. `NotFound` if absent.
    async fn get(&self, id: u64) -> DomainResult<ServiceItem>;

    /// Full replacement, ID preserved.
    async fn replace(&self, id: u64, draft: ServiceItemDraft) -> DomainResult<ServiceItem>;

    /// Remove and return the item so the caller can release its images.
    async fn delete(&self, id: u64) -> DomainResult<ServiceItem>;

    /// Filter, then paginate. `total` is the filtered count.
    async fn list(&self, filter: &ServiceFilter, page: PageRequest)
        -> DomainResult<Page<ServiceItem>>;

    /// Whether any stored service lists `reference` among its images.
    async fn references_image(&self, reference: &str) -> DomainResult<bool>;
}

#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    async fn create(&self, draft: MenuItemDraft) -> DomainResult<MenuItem>;

    async fn get(&self, id: u64) -> DomainResult<MenuItem>;

    async fn replace(&self, id: u64, draft: MenuItemDraft) -> DomainResult<MenuItem>;

    async fn delete(&self, id: u64) -> DomainResult<()>;

    async fn list(&self, filter: &MenuItemFilter, page: PageRequest)
        -> DomainResult<Page<MenuItem>>;
}
