pub mod log_notifier;
pub mod smtp;
pub mod templates;

pub use log_notifier::LogNotifier;
pub use smtp::SmtpNotifier;
pub use templates::{EmailContent, MailTemplates};
