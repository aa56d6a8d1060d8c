//! Public price list and its admin CRUD

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
