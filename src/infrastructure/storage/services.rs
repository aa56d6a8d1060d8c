//! In-memory service catalog

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::table::Table;
use crate::domain::{
    DomainError, DomainResult, ServiceFilter, ServiceItem, ServiceItemDraft, ServiceRepository,
};
use crate::shared::{Page, PageRequest};

const ENTITY: &str = "service";

pub struct InMemoryServiceRepository {
    table: RwLock<Table<ServiceItem>>,
}

impl InMemoryServiceRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }
}

impl Default for InMemoryServiceRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn create(&self, draft: ServiceItemDraft) -> DomainResult<ServiceItem> {
        let mut table = self.table.write().await;
        Ok(table
            .insert_with(|id| ServiceItem::from_draft(id, draft))
            .clone())
    }

    async fn get(&self, id: u64) -> DomainResult<ServiceItem> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    async fn replace(&self, id: u64, draft: ServiceItemDraft) -> DomainResult<ServiceItem> {
        let mut table = self.table.write().await;
        let slot = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;
        *slot = ServiceItem::from_draft(id, draft);
        Ok(slot.clone())
    }

    async fn delete(&self, id: u64) -> DomainResult<ServiceItem> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    async fn list(
        &self,
        filter: &ServiceFilter,
        page: PageRequest,
    ) -> DomainResult<Page<ServiceItem>> {
        let table = self.table.read().await;
        let filtered: Vec<&ServiceItem> =
            table.rows.values().filter(|s| filter.accepts(s)).collect();
        Ok(page.slice(filtered).map(ServiceItem::clone))
    }

    async fn references_image(&self, reference: &str) -> DomainResult<bool> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .any(|s| s.images.iter().any(|i| i == reference)))
    }
}
