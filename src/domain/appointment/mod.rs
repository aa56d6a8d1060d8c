//! Appointment aggregate
//!
//! Contains the Appointment entity, its status and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Appointment, AppointmentStatus, NewAppointment};
pub use repository::{AppointmentRepository, DEFAULT_DAILY_CAPACITY, NO_SLOTS_MESSAGE};
