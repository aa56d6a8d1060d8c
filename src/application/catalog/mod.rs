pub mod service;

pub use service::{
    CatalogPolicy, CatalogService, CreateMenuItem, CreateServiceItem, MenuItemChanges,
    ReplaceServiceItem,
};
