//! HTTP REST API interfaces
//!
//! - `common`: error mapping, extractors and query parsing
//! - `middleware`: admin JWT authentication
//! - `modules`: one folder per resource (DTOs + handlers)
//! - `router`: route table, OpenAPI document and layers

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState, RouterOptions};
