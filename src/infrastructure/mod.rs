//! Infrastructure layer - external concerns

pub mod crypto;
pub mod email;
pub mod files;
pub mod storage;

pub use email::{LogNotifier, MailTemplates, SmtpNotifier};
pub use files::LocalImageStore;
pub use storage::{
    InMemoryAppointmentRepository, InMemoryMenuItemRepository, InMemoryServiceRepository,
    RefreshTokenStore, ResetTokenStore,
};
