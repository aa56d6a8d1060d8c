//! Appointments: public booking and admin management

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
