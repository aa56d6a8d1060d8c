pub mod errors;
pub mod pagination;
pub mod shutdown;

pub use errors::{DomainError, DomainResult};
pub use pagination::{Page, PageRequest};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
