//! Appointment repository interface

use async_trait::async_trait;

use super::model::{Appointment, AppointmentStatus, NewAppointment};
use crate::shared::{DomainResult, Page, PageRequest};

/// Number of `confirmed` appointments a single date may hold.
pub const DEFAULT_DAILY_CAPACITY: usize = 15;

pub const NO_SLOTS_MESSAGE: &str =
    "No slots available for the requested date. Maximum appointments reached for the day.";

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Store a new appointment under the next sequential ID.
    async fn create(&self, appointment: NewAppointment) -> DomainResult<Appointment>;

    /// Like [`create`](Self::create), but the capacity check for
    /// `appointment.date` and the insert happen under one exclusive lock.
    /// Fails with `Conflict` when the date is full.
    async fn create_if_slot_available(&self, appointment: NewAppointment)
        -> DomainResult<Appointment>;

    /// `NotFound` if absent.
    async fn get(&self, id: u64) -> DomainResult<Appointment>;

    /// Overwrite the stored record; the ID is preserved.
    async fn update(&self, id: u64, appointment: Appointment) -> DomainResult<Appointment>;

    /// Set status to `cancelled`. Idempotent.
    async fn cancel(&self, id: u64) -> DomainResult<Appointment>;

    async fn delete(&self, id: u64) -> DomainResult<()>;

    async fn count_by_date_and_status(
        &self,
        date: &str,
        status: &AppointmentStatus,
    ) -> DomainResult<usize>;

    /// Fewer `confirmed` appointments on `date` than the daily capacity.
    async fn is_slot_available(&self, date: &str) -> DomainResult<bool>;

    /// Ascending by ID. `total` counts every stored appointment.
    async fn list(&self, page: PageRequest) -> DomainResult<Page<Appointment>>;
}
