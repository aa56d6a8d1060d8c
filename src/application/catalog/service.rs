//! Catalog administration: service items with their images, and the menu.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::normalization::optional_text;
use crate::application::ports::{ImageStore, ImageStoreError};
use crate::domain::{
    DomainError, DomainResult, MenuItem, MenuItemDraft, MenuItemFilter, MenuItemRepository,
    ServiceFilter, ServiceItem, ServiceItemDraft, ServiceRepository,
};
use crate::shared::{Page, PageRequest};

pub const DEFAULT_MAX_IMAGES: usize = 8;

/// Admin-configurable catalog rules.
#[derive(Debug, Clone)]
pub struct CatalogPolicy {
    /// Canonical category spellings. Empty means any category is accepted.
    pub allowed_categories: Vec<String>,
    pub max_images_per_service: usize,
}

impl Default for CatalogPolicy {
    fn default() -> Self {
        Self {
            allowed_categories: Vec::new(),
            max_images_per_service: DEFAULT_MAX_IMAGES,
        }
    }
}

impl CatalogPolicy {
    /// Map a category onto its canonical spelling (case-insensitive).
    pub fn canonical_category(&self, raw: &str) -> DomainResult<String> {
        let raw = raw.trim();
        if self.allowed_categories.is_empty() {
            return Ok(raw.to_string());
        }
        self.allowed_categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(raw))
            .cloned()
            .ok_or_else(|| DomainError::validation(format!("unknown service category: {}", raw)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateServiceItem {
    pub service: Option<String>,
    pub name: Option<String>,
    pub descriptions: Vec<String>,
    /// Base64 payloads, optionally data URIs
    pub images: Vec<String>,
    pub rating: Option<f64>,
}

/// Full replacement. `images: None` keeps the stored images.
#[derive(Debug, Clone, Default)]
pub struct ReplaceServiceItem {
    pub service: Option<String>,
    pub name: Option<String>,
    pub descriptions: Vec<String>,
    pub images: Option<Vec<String>>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateMenuItem {
    pub category: Option<String>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub price_cents: Option<i64>,
    pub duration_minutes: Option<i64>,
}

/// Merge update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct MenuItemChanges {
    pub category: Option<String>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub price_cents: Option<i64>,
    pub duration_minutes: Option<i64>,
}

fn duration_from(raw: i64) -> DomainResult<u32> {
    u32::try_from(raw)
        .map_err(|_| DomainError::validation("duration_minutes must be between 1 and 1440"))
}

impl From<ImageStoreError> for DomainError {
    fn from(e: ImageStoreError) -> Self {
        match e {
            ImageStoreError::Invalid(msg) => DomainError::Validation(msg),
            ImageStoreError::Io(e) => DomainError::internal(e),
        }
    }
}

pub struct CatalogService {
    services: Arc<dyn ServiceRepository>,
    menu: Arc<dyn MenuItemRepository>,
    images: Arc<dyn ImageStore>,
    policy: CatalogPolicy,
}

impl CatalogService {
    pub fn new(
        services: Arc<dyn ServiceRepository>,
        menu: Arc<dyn MenuItemRepository>,
        images: Arc<dyn ImageStore>,
        policy: CatalogPolicy,
    ) -> Self {
        Self {
            services,
            menu,
            images,
            policy,
        }
    }

    pub fn policy(&self) -> &CatalogPolicy {
        &self.policy
    }

    // ---- service items ----

    pub async fn list_services(
        &self,
        mut filter: ServiceFilter,
        page: PageRequest,
    ) -> DomainResult<Page<ServiceItem>> {
        filter.category = match filter.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => Some(self.policy.canonical_category(c)?),
            _ => None,
        };
        self.services.list(&filter, page).await
    }

    pub async fn get_service(&self, id: u64) -> DomainResult<ServiceItem> {
        self.services.get(id).await
    }

    pub async fn create_service(&self, cmd: CreateServiceItem) -> DomainResult<ServiceItem> {
        self.check_image_count(cmd.images.len())?;
        let draft = self.draft(cmd.service, cmd.name, cmd.descriptions, cmd.rating, Vec::new())?;

        let stored = self.store_images(&cmd.images).await?;
        let created = match self
            .services
            .create(ServiceItemDraft {
                images: stored.clone(),
                ..draft
            })
            .await
        {
            Ok(created) => created,
            Err(e) => {
                for reference in &stored {
                    self.release_image(reference).await;
                }
                return Err(e);
            }
        };

        info!(service_id = created.id, name = %created.name, images = created.images.len(), "Service created");
        Ok(created)
    }

    pub async fn replace_service(
        &self,
        id: u64,
        cmd: ReplaceServiceItem,
    ) -> DomainResult<ServiceItem> {
        let current = self.services.get(id).await?;
        if let Some(images) = &cmd.images {
            self.check_image_count(images.len())?;
        }
        let draft = self.draft(
            cmd.service,
            cmd.name,
            cmd.descriptions,
            cmd.rating,
            current.images.clone(),
        )?;

        let draft = match &cmd.images {
            Some(payloads) => ServiceItemDraft {
                images: self.store_images(payloads).await?,
                ..draft
            },
            None => draft,
        };

        let updated = self.services.replace(id, draft).await?;

        // Content-addressed names: an unchanged image keeps its reference.
        let stale: Vec<&String> = current
            .images
            .iter()
            .filter(|old| !updated.images.contains(old))
            .collect();
        for reference in stale {
            self.release_image(reference).await;
        }

        info!(service_id = id, "Service updated");
        Ok(updated)
    }

    pub async fn delete_service(&self, id: u64) -> DomainResult<()> {
        let removed = self.services.delete(id).await?;
        for reference in &removed.images {
            self.release_image(reference).await;
        }
        info!(service_id = id, "Service deleted");
        Ok(())
    }

    fn check_image_count(&self, count: usize) -> DomainResult<()> {
        let max = self.policy.max_images_per_service;
        if count == 0 || count > max {
            return Err(DomainError::validation(format!(
                "between 1 and {} images are required",
                max
            )));
        }
        Ok(())
    }

    fn draft(
        &self,
        service: Option<String>,
        name: Option<String>,
        descriptions: Vec<String>,
        rating: Option<f64>,
        images: Vec<String>,
    ) -> DomainResult<ServiceItemDraft> {
        let draft = ServiceItemDraft {
            service: service.unwrap_or_default(),
            name: name.unwrap_or_default(),
            descriptions,
            images,
            rating: rating.unwrap_or_default(),
        }
        .normalized()?;
        let service = self.policy.canonical_category(&draft.service)?;
        Ok(ServiceItemDraft { service, ..draft })
    }

    /// Store every payload or none: already written files are released on
    /// the first failure.
    async fn store_images(&self, payloads: &[String]) -> DomainResult<Vec<String>> {
        let mut stored = Vec::with_capacity(payloads.len());
        for payload in payloads {
            match self.images.save_base64(payload).await {
                Ok(reference) => stored.push(reference),
                Err(e) => {
                    for reference in &stored {
                        self.release_image(reference).await;
                    }
                    return Err(e.into());
                }
            }
        }
        Ok(stored)
    }

    /// Files are content-addressed and may be shared between services, so
    /// a file is only deleted once no stored service lists it. Callers
    /// release after the repository reflects the outcome.
    async fn release_image(&self, reference: &str) {
        match self.services.references_image(reference).await {
            Ok(false) => {}
            Ok(true) => {
                debug!(reference, "Image still referenced, keeping file");
                return;
            }
            Err(e) => {
                warn!(reference, error = %e, "Could not check image references, keeping file");
                return;
            }
        }
        if let Err(e) = self.images.delete(reference).await {
            warn!(reference, error = %e, "Failed to release image");
        }
    }

    // ---- menu items ----

    pub async fn list_menu_items(
        &self,
        filter: MenuItemFilter,
        page: PageRequest,
    ) -> DomainResult<Page<MenuItem>> {
        self.menu.list(&filter, page).await
    }

    pub async fn get_menu_item(&self, id: u64) -> DomainResult<MenuItem> {
        self.menu.get(id).await
    }

    pub async fn create_menu_item(&self, cmd: CreateMenuItem) -> DomainResult<MenuItem> {
        let price_cents = cmd
            .price_cents
            .ok_or_else(|| DomainError::validation("price_cents is required"))?;
        let duration_minutes = cmd
            .duration_minutes
            .ok_or_else(|| DomainError::validation("duration_minutes is required"))
            .and_then(duration_from)?;

        let draft = MenuItemDraft {
            category: cmd.category.unwrap_or_default(),
            name: cmd.name.unwrap_or_default(),
            currency: cmd.currency,
            price_cents,
            duration_minutes,
        }
        .normalized()?;

        let created = self.menu.create(draft).await?;
        info!(menu_item_id = created.id, name = %created.name, "Menu item created");
        Ok(created)
    }

    pub async fn update_menu_item(&self, id: u64, changes: MenuItemChanges) -> DomainResult<MenuItem> {
        let mut draft = self.menu.get(id).await?.to_draft();

        if let Some(v) = changes.category {
            draft.category = v;
        }
        if let Some(v) = changes.name {
            draft.name = v;
        }
        if changes.currency.is_some() {
            draft.currency = optional_text(changes.currency);
        }
        if let Some(v) = changes.price_cents {
            draft.price_cents = v;
        }
        if let Some(v) = changes.duration_minutes {
            draft.duration_minutes = duration_from(v)?;
        }

        let updated = self.menu.replace(id, draft.normalized()?).await?;
        info!(menu_item_id = id, "Menu item updated");
        Ok(updated)
    }

    pub async fn delete_menu_item(&self, id: u64) -> DomainResult<()> {
        self.menu.delete(id).await?;
        info!(menu_item_id = id, "Menu item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::{InMemoryMenuItemRepository, InMemoryServiceRepository};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Keeps references in memory; payloads equal to "bad" are rejected.
    #[derive(Default)]
    struct MemoryImages {
        saved: Mutex<Vec<String>>,
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageStore for MemoryImages {
        async fn save_base64(&self, encoded: &str) -> Result<String, ImageStoreError> {
            if encoded == "bad" {
                return Err(ImageStoreError::Invalid("invalid base64 image".into()));
            }
            let reference = format!("uploads/{}.png", encoded);
            self.saved.lock().unwrap().push(reference.clone());
            Ok(reference)
        }

        async fn delete(&self, reference: &str) -> Result<(), ImageStoreError> {
            self.deleted.lock().unwrap().push(reference.to_string());
            Ok(())
        }
    }

    fn catalog_with(policy: CatalogPolicy) -> (CatalogService, Arc<MemoryImages>) {
        let images = Arc::new(MemoryImages::default());
        let catalog = CatalogService::new(
            Arc::new(InMemoryServiceRepository::new()),
            Arc::new(InMemoryMenuItemRepository::new()),
            images.clone(),
            policy,
        );
        (catalog, images)
    }

    fn braids(images: &[&str]) -> CreateServiceItem {
        CreateServiceItem {
            service: Some("Hair".into()),
            name: Some("Knotless Braids".into()),
            descriptions: vec!["Small".into(), " Large ".into()],
            images: images.iter().map(|s| s.to_string()).collect(),
            rating: Some(4.5),
        }
    }

    #[tokio::test]
    async fn create_service_stores_images() {
        let (catalog, _) = catalog_with(CatalogPolicy::default());
        let item = catalog.create_service(braids(&["a", "b"])).await.unwrap();
        assert_eq!(item.images, vec!["uploads/a.png", "uploads/b.png"]);
        assert_eq!(item.descriptions, vec!["Small", "Large"]);
    }

    #[tokio::test]
    async fn create_service_requires_images_within_limit() {
        let (catalog, _) = catalog_with(CatalogPolicy {
            max_images_per_service: 2,
            ..Default::default()
        });
        let err = catalog.create_service(braids(&[])).await.unwrap_err();
        assert_eq!(err.to_string(), "between 1 and 2 images are required");
        let err = catalog.create_service(braids(&["a", "b", "c"])).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn failed_image_releases_earlier_ones() {
        let (catalog, images) = catalog_with(CatalogPolicy::default());
        let err = catalog.create_service(braids(&["a", "bad"])).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid base64 image");
        assert_eq!(*images.deleted.lock().unwrap(), vec!["uploads/a.png".to_string()]);
    }

    #[tokio::test]
    async fn categories_are_canonicalized_when_restricted() {
        let (catalog, _) = catalog_with(CatalogPolicy {
            allowed_categories: vec!["Hair".into(), "Nails".into()],
            ..Default::default()
        });
        let mut cmd = braids(&["a"]);
        cmd.service = Some("hair".into());
        let item = catalog.create_service(cmd).await.unwrap();
        assert_eq!(item.service, "Hair");

        let mut cmd = braids(&["a"]);
        cmd.service = Some("Massage".into());
        let err = catalog.create_service(cmd).await.unwrap_err();
        assert_eq!(err.to_string(), "unknown service category: Massage");

        let page = catalog
            .list_services(
                ServiceFilter {
                    category: Some("HAIR".into()),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn replace_keeps_images_when_absent_and_releases_replaced_ones() {
        let (catalog, images) = catalog_with(CatalogPolicy::default());
        let item = catalog.create_service(braids(&["a", "b"])).await.unwrap();

        let kept = catalog
            .replace_service(
                item.id,
                ReplaceServiceItem {
                    service: Some("Hair".into()),
                    name: Some("Box Braids".into()),
                    descriptions: vec!["Jumbo".into()],
                    images: None,
                    rating: Some(3.0),
                },
            )
            .await
            .unwrap();
        assert_eq!(kept.name, "Box Braids");
        assert_eq!(kept.images, item.images);
        assert!(images.deleted.lock().unwrap().is_empty());

        let swapped = catalog
            .replace_service(
                item.id,
                ReplaceServiceItem {
                    service: Some("Hair".into()),
                    name: Some("Box Braids".into()),
                    descriptions: vec!["Jumbo".into()],
                    images: Some(vec!["b".into(), "c".into()]),
                    rating: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(swapped.images, vec!["uploads/b.png", "uploads/c.png"]);
        assert_eq!(swapped.rating, 0.0);
        assert_eq!(*images.deleted.lock().unwrap(), vec!["uploads/a.png".to_string()]);
    }

    #[tokio::test]
    async fn failed_create_keeps_files_shared_with_other_services() {
        let (catalog, images) = catalog_with(CatalogPolicy::default());
        let first = catalog.create_service(braids(&["x"])).await.unwrap();

        let err = catalog.create_service(braids(&["x", "bad"])).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid base64 image");
        assert!(images.deleted.lock().unwrap().is_empty());
        assert_eq!(catalog.get_service(first.id).await.unwrap().images, vec!["uploads/x.png"]);
    }

    #[tokio::test]
    async fn shared_files_survive_replace_and_delete_until_unreferenced() {
        let (catalog, images) = catalog_with(CatalogPolicy::default());
        let first = catalog.create_service(braids(&["x"])).await.unwrap();
        let second = catalog.create_service(braids(&["x", "y"])).await.unwrap();

        catalog
            .replace_service(
                second.id,
                ReplaceServiceItem {
                    service: Some("Hair".into()),
                    name: Some("Box Braids".into()),
                    descriptions: vec!["Jumbo".into()],
                    images: Some(vec!["z".into()]),
                    rating: Some(4.0),
                },
            )
            .await
            .unwrap();
        assert_eq!(*images.deleted.lock().unwrap(), vec!["uploads/y.png".to_string()]);

        let err = catalog
            .replace_service(
                second.id,
                ReplaceServiceItem {
                    service: Some("Hair".into()),
                    name: Some("Box Braids".into()),
                    descriptions: vec!["Jumbo".into()],
                    images: Some(vec!["x".into(), "bad".into()]),
                    rating: Some(4.0),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(images.deleted.lock().unwrap().len(), 1);

        catalog.delete_service(second.id).await.unwrap();
        assert_eq!(
            *images.deleted.lock().unwrap(),
            vec!["uploads/y.png".to_string(), "uploads/z.png".to_string()]
        );

        catalog.delete_service(first.id).await.unwrap();
        assert_eq!(images.deleted.lock().unwrap().last().unwrap(), "uploads/x.png");
    }

    #[tokio::test]
    async fn delete_service_releases_images() {
        let (catalog, images) = catalog_with(CatalogPolicy::default());
        let item = catalog.create_service(braids(&["a"])).await.unwrap();
        catalog.delete_service(item.id).await.unwrap();
        assert_eq!(*images.deleted.lock().unwrap(), vec!["uploads/a.png".to_string()]);

        let err = catalog.delete_service(item.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn menu_item_merge_update() {
        let (catalog, _) = catalog_with(CatalogPolicy::default());
        let item = catalog
            .create_menu_item(CreateMenuItem {
                category: Some("Nails".into()),
                name: Some("Gel Polish".into()),
                currency: Some("NGN".into()),
                price_cents: Some(3500),
                duration_minutes: Some(45),
            })
            .await
            .unwrap();

        let updated = catalog
            .update_menu_item(
                item.id,
                MenuItemChanges {
                    price_cents: Some(4000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price_cents, 4000);
        assert_eq!(updated.name, "Gel Polish");
        assert_eq!(updated.currency.as_deref(), Some("NGN"));

        let err = catalog
            .update_menu_item(
                item.id,
                MenuItemChanges {
                    duration_minutes: Some(-5),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "duration_minutes must be between 1 and 1440");

        let err = catalog
            .update_menu_item(
                item.id,
                MenuItemChanges {
                    name: Some("  ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "name is required");
    }

    #[tokio::test]
    async fn menu_item_create_requires_price_and_duration() {
        let (catalog, _) = catalog_with(CatalogPolicy::default());
        let err = catalog
            .create_menu_item(CreateMenuItem {
                category: Some("Nails".into()),
                name: Some("Gel".into()),
                duration_minutes: Some(30),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "price_cents is required");
    }
}
