pub mod appointments;
pub mod auth;
pub mod health;
pub mod menu_items;
pub mod metrics;
pub mod request_id;
pub mod services;
