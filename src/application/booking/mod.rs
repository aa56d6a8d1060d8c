//! Appointment booking use cases

pub mod service;
pub mod validation;

pub use service::{AppointmentChanges, BookingService, CreateAppointment};
