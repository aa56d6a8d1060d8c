//! Outbound ports: the side effects the application needs but does not own.
//!
//! [`Notifier`] delivers customer/admin messages (SMTP in production,
//! a logging sink otherwise). [`ImageStore`] persists uploaded service
//! images and releases them when a service is replaced or deleted.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Appointment;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address {address}: {reason}")]
    Address { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_admin_new_appointment(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError>;

    async fn notify_customer_confirmed(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError>;

    async fn notify_customer_updated(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError>;

    async fn notify_customer_cancelled(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError>;

    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), NotifyError>;

    async fn send_password_changed(&self, email: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Error)]
pub enum ImageStoreError {
    /// The payload is not acceptable (bad base64, too large, ...).
    #[error("{0}")]
    Invalid(String),

    #[error("image storage I/O: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Decode a base64 (optionally data-URI) image, persist it and return
    /// the stored reference.
    async fn save_base64(&self, encoded: &str) -> Result<String, ImageStoreError>;

    /// Release a stored reference. Missing files are not an error.
    async fn delete(&self, reference: &str) -> Result<(), ImageStoreError>;
}
