//! Fire-and-forget notification dispatch.
//!
//! Callers enqueue a [`Notification`] after a store mutation has committed and
//! return immediately. A single background worker drains the queue and hands
//! each message to the configured [`Notifier`]. Delivery failures are logged
//! and counted, never reported back to the caller.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::ports::Notifier;
use crate::domain::Appointment;
use crate::shared::ShutdownSignal;

#[derive(Debug, Clone)]
pub enum Notification {
    AdminNewAppointment {
        appointment: Appointment,
        service_name: String,
    },
    CustomerConfirmed {
        appointment: Appointment,
        service_name: String,
    },
    CustomerUpdated {
        appointment: Appointment,
        service_name: String,
    },
    CustomerCancelled {
        appointment: Appointment,
        service_name: String,
    },
    PasswordReset {
        email: String,
        token: String,
    },
    PasswordChanged {
        email: String,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AdminNewAppointment { .. } => "admin_new_appointment",
            Self::CustomerConfirmed { .. } => "customer_confirmed",
            Self::CustomerUpdated { .. } => "customer_updated",
            Self::CustomerCancelled { .. } => "customer_cancelled",
            Self::PasswordReset { .. } => "password_reset",
            Self::PasswordChanged { .. } => "password_changed",
        }
    }
}

/// Cheap cloneable handle used by the application services.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::UnboundedSender<Notification>,
}

impl NotificationDispatcher {
    /// Spawn the delivery worker and return a handle to its queue.
    /// The worker drains what is already queued once `shutdown` fires.
    pub fn start(notifier: Arc<dyn Notifier>, shutdown: ShutdownSignal) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(notifier, receiver, shutdown));
        Self { sender }
    }

    /// Enqueue without waiting. Never fails the caller.
    pub fn dispatch(&self, notification: Notification) {
        let kind = notification.kind();
        if self.sender.send(notification).is_err() {
            warn!(kind, "Notification worker is gone, dropping notification");
        } else {
            debug!(kind, "Notification queued");
        }
    }
}

async fn run_worker(
    notifier: Arc<dyn Notifier>,
    mut receiver: mpsc::UnboundedReceiver<Notification>,
    shutdown: ShutdownSignal,
) {
    info!("Notification worker started");

    loop {
        tokio::select! {
            next = receiver.recv() => match next {
                Some(notification) => deliver(notifier.as_ref(), notification).await,
                None => break,
            },
            _ = shutdown.notified().wait() => {
                receiver.close();
                while let Some(notification) = receiver.recv().await {
                    deliver(notifier.as_ref(), notification).await;
                }
                break;
            }
        }
    }

    info!("Notification worker stopped");
}

async fn deliver(notifier: &dyn Notifier, notification: Notification) {
    let kind = notification.kind();
    let result = match &notification {
        Notification::AdminNewAppointment {
            appointment,
            service_name,
        } => {
            notifier
                .notify_admin_new_appointment(appointment, service_name)
                .await
        }
        Notification::CustomerConfirmed {
            appointment,
            service_name,
        } => notifier.notify_customer_confirmed(appointment, service_name).await,
        Notification::CustomerUpdated {
            appointment,
            service_name,
        } => notifier.notify_customer_updated(appointment, service_name).await,
        Notification::CustomerCancelled {
            appointment,
            service_name,
        } => notifier.notify_customer_cancelled(appointment, service_name).await,
        Notification::PasswordReset { email, token } => {
            notifier.send_password_reset(email, token).await
        }
        Notification::PasswordChanged { email } => notifier.send_password_changed(email).await,
    };

    match result {
        Ok(()) => debug!(kind, "Notification delivered"),
        Err(e) => {
            metrics::counter!("notifications_failed_total", "kind" => kind).increment(1);
            warn!(kind, error = %e, "Notification delivery failed");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn dispatch_reaches_notifier() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = NotificationDispatcher::start(notifier.clone(), ShutdownSignal::new());

        dispatcher.dispatch(Notification::PasswordChanged {
            email: "admin@example.com".into(),
        });

        let sent = wait_for(&notifier, 1).await;
        assert_eq!(sent, vec!["changed:admin@example.com".to_string()]);
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_worker() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let dispatcher = NotificationDispatcher::start(notifier.clone(), ShutdownSignal::new());

        for i in 0..3 {
            dispatcher.dispatch(Notification::PasswordReset {
                email: format!("user{}@example.com", i),
                token: "t".into(),
            });
        }

        assert_eq!(wait_for(&notifier, 3).await.len(), 3);
    }

    #[tokio::test]
    async fn dispatch_after_shutdown_does_not_panic() {
        let notifier = Arc::new(RecordingNotifier::default());
        let shutdown = ShutdownSignal::new();
        let dispatcher = NotificationDispatcher::start(notifier.clone(), shutdown.clone());
        shutdown.trigger();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        dispatcher.dispatch(Notification::PasswordChanged {
            email: "late@example.com".into(),
        });
    }
}
