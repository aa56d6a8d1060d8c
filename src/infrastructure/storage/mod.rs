//! Volatile in-memory repositories

mod table;

pub mod appointments;
pub mod menu_items;
pub mod seed;
pub mod services;
pub mod tokens;

pub use appointments::InMemoryAppointmentRepository;
pub use menu_items::InMemoryMenuItemRepository;
pub use seed::seed_services;
pub use services::InMemoryServiceRepository;
pub use tokens::{RefreshTokenStore, ResetTokenStore};
