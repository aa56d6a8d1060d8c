//! Application layer: use-case orchestration over the domain.
//!
//! Services here normalize and validate input, call the repositories and
//! hand side effects to the outbound ports.

pub mod booking;
pub mod catalog;
pub mod identity;
pub mod normalization;
pub mod notifications;
pub mod ports;

pub use booking::{AppointmentChanges, BookingService, CreateAppointment};
pub use catalog::{
    CatalogPolicy, CatalogService, CreateMenuItem, CreateServiceItem, MenuItemChanges,
    ReplaceServiceItem,
};
pub use identity::{IdentityService, IdentitySettings, Session};
pub use notifications::{Notification, NotificationDispatcher};
pub use ports::{ImageStore, ImageStoreError, Notifier, NotifyError};
