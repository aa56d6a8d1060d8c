//! # Salon Booking
//!
//! Backend for a beauty salon: public appointment booking, a public
//! service catalog and price list, and a JWT-protected admin API.
//!
//! ## Architecture
//!
//! - **domain**: entities (appointments, services, menu items) and repository traits
//! - **application**: booking, catalog and identity use cases plus outbound ports
//! - **infrastructure**: in-memory stores, crypto, image files and email delivery
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use interfaces::http::{create_api_router, AppState, RouterOptions};
pub use server::{init_tracing, ServerHandle, ServerOptions};
