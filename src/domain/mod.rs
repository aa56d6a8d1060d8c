//! Core business entities and the repository interfaces that own them.

pub mod appointment;
pub mod catalog;

pub use appointment::{Appointment, AppointmentRepository, AppointmentStatus, NewAppointment};
pub use catalog::{
    MenuItem, MenuItemDraft, MenuItemFilter, MenuItemRepository, ServiceFilter, ServiceItem,
    ServiceItemDraft, ServiceRepository,
};
pub use crate::shared::{DomainError, DomainResult};
