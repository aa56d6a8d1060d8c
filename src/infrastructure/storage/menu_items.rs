//! In-memory price list

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::table::Table;
use crate::domain::{
    DomainError, DomainResult, MenuItem, MenuItemDraft, MenuItemFilter, MenuItemRepository,
};
use crate::shared::{Page, PageRequest};

const ENTITY: &str = "menu item";

pub struct InMemoryMenuItemRepository {
    table: RwLock<Table<MenuItem>>,
}

impl InMemoryMenuItemRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }
}

impl Default for InMemoryMenuItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MenuItemRepository for InMemoryMenuItemRepository {
    async fn create(&self, draft: MenuItemDraft) -> DomainResult<MenuItem> {
        let mut table = self.table.write().await;
        Ok(table.insert_with(|id| MenuItem::from_draft(id, draft)).clone())
    }

    async fn get(&self, id: u64) -> DomainResult<MenuItem> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    async fn replace(&self, id: u64, draft: MenuItemDraft) -> DomainResult<MenuItem> {
        let mut table = self.table.write().await;
        let slot = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;
        *slot = MenuItem::from_draft(id, draft);
        Ok(slot.clone())
    }

    async fn delete(&self, id: u64) -> DomainResult<()> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    async fn list(
        &self,
        filter: &MenuItemFilter,
        page: PageRequest,
    ) -> DomainResult<Page<MenuItem>> {
        let table = self.table.read().await;
        let filtered: Vec<&MenuItem> = table.rows.values().filter(|m| filter.accepts(m)).collect();
        Ok(page.slice(filtered).map(MenuItem::clone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(category: &str, name: &str) -> MenuItemDraft {
        MenuItemDraft {
            category: category.into(),
            name: name.into(),
            currency: Some("GBP".into()),
            price_cents: 2500,
            duration_minutes: 30,
        }
    }

    #[tokio::test]
    async fn crud_round() {
        let repo = InMemoryMenuItemRepository::new();
        let item = repo.create(draft("Nails", "Gel Polish")).await.unwrap();
        assert_eq!(item.id, 1);

        let mut changed = item.to_draft();
        changed.price_cents = 3000;
        let replaced = repo.replace(item.id, changed).await.unwrap();
        assert_eq!(replaced.price_cents, 3000);

        repo.delete(item.id).await.unwrap();
        assert!(matches!(repo.get(item.id).await, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn list_by_category_and_query() {
        let repo = InMemoryMenuItemRepository::new();
        repo.create(draft("Nails", "Gel Polish")).await.unwrap();
        repo.create(draft("Nails", "Acrylic Fill")).await.unwrap();
        repo.create(draft("Hair", "Silk Press")).await.unwrap();

        let nails = MenuItemFilter {
            category: Some("Nails".into()),
            query: None,
        };
        assert_eq!(repo.list(&nails, PageRequest::default()).await.unwrap().total, 2);

        let press = MenuItemFilter {
            category: None,
            query: Some("press".into()),
        };
        let page = repo.list(&press, PageRequest::default()).await.unwrap();
        assert_eq!(page.data[0].name, "Silk Press");
    }
}
