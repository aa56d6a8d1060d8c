//! In-memory appointment store

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::table::Table;
use crate::domain::appointment::{DEFAULT_DAILY_CAPACITY, NO_SLOTS_MESSAGE};
use crate::domain::{
    Appointment, AppointmentRepository, AppointmentStatus, DomainError, DomainResult,
    NewAppointment,
};
use crate::shared::{Page, PageRequest};

const ENTITY: &str = "appointment";

/// Volatile appointment store.
///
/// The whole table sits behind a single `RwLock`; reads share it, writes take
/// it exclusively and never await anything while holding it.
pub struct InMemoryAppointmentRepository {
    table: RwLock<Table<Appointment>>,
    daily_capacity: usize,
}

impl InMemoryAppointmentRepository {
    pub fn new(daily_capacity: usize) -> Self {
        Self {
            table: RwLock::new(Table::new()),
            daily_capacity,
        }
    }

    pub fn daily_capacity(&self) -> usize {
        self.daily_capacity
    }
}

impl Default for InMemoryAppointmentRepository {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_CAPACITY)
    }
}

fn count_matching(table: &Table<Appointment>, date: &str, status: &AppointmentStatus) -> usize {
    table
        .rows
        .values()
        .filter(|a| a.matches(date, status))
        .count()
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn create(&self, appointment: NewAppointment) -> DomainResult<Appointment> {
        let mut table = self.table.write().await;
        Ok(table
            .insert_with(|id| Appointment::from_new(id, appointment))
            .clone())
    }

    async fn create_if_slot_available(
        &self,
        appointment: NewAppointment,
    ) -> DomainResult<Appointment> {
        let mut table = self.table.write().await;
        let confirmed = count_matching(&table, &appointment.date, &AppointmentStatus::Confirmed);
        if confirmed >= self.daily_capacity {
            return Err(DomainError::Conflict(NO_SLOTS_MESSAGE.to_string()));
        }
        Ok(table
            .insert_with(|id| Appointment::from_new(id, appointment))
            .clone())
    }

    async fn get(&self, id: u64) -> DomainResult<Appointment> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    async fn update(&self, id: u64, mut appointment: Appointment) -> DomainResult<Appointment> {
        let mut table = self.table.write().await;
        let slot = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;
        appointment.id = id;
        appointment.created_at = slot.created_at;
        *slot = appointment;
        Ok(slot.clone())
    }

    async fn cancel(&self, id: u64) -> DomainResult<Appointment> {
        let mut table = self.table.write().await;
        let slot = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;
        slot.cancel();
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

    async fn count_by_date_and_status(
        &self,
        date: &str,
        status: &AppointmentStatus,
    ) -> DomainResult<usize> {
        let table = self.table.read().await;
        Ok(count_matching(&table, date, status))
    }

    async fn is_slot_available(&self, date: &str) -> DomainResult<bool> {
        let confirmed = self
            .count_by_date_and_status(date, &AppointmentStatus::Confirmed)
            .await?;
        Ok(confirmed < self.daily_capacity)
    }

    async fn list(&self, page: PageRequest) -> DomainResult<Page<Appointment>> {
        let table = self.table.read().await;
        Ok(page.slice(table.rows.values()).map(Appointment::clone))
    }
}
