pub mod service;

pub use service::{IdentityService, IdentitySettings, Session, FORGOT_PASSWORD_MESSAGE};
