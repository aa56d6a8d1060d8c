//! Catalog aggregate: bookable services and the public price list.

pub mod menu_item;
pub mod repository;
pub mod service_item;

pub use menu_item::{MenuItem, MenuItemDraft, MenuItemFilter};
pub use repository::{MenuItemRepository, ServiceRepository};
pub use service_item::{ServiceFilter, ServiceItem, ServiceItemDraft};
