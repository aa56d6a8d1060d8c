pub mod dispatcher;

pub use dispatcher::{Notification, NotificationDispatcher};
