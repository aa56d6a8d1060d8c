//! Admin session: login, refresh, logout and password reset

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
