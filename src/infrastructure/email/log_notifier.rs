//! Notifier used when SMTP is not configured: messages are only logged.

use async_trait::async_trait;
use tracing::info;

use super::templates::MailTemplates;
use crate::application::ports::{NotifyError, Notifier};
use crate::domain::Appointment;

pub struct LogNotifier {
    templates: MailTemplates,
}

impl LogNotifier {
    pub fn new(templates: MailTemplates) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_admin_new_appointment(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError> {
        let mail = self.templates.admin_new_appointment(appointment, service_name);
        info!(to = "admin", subject = %mail.subject, "Email delivery disabled, logging only");
        Ok(())
    }

    async fn notify_customer_confirmed(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError> {
        let mail = self.templates.customer_confirmed(appointment, service_name);
        info!(to = %appointment.customer_email, subject = %mail.subject, "Email delivery disabled, logging only");
        Ok(())
    }

    async fn notify_customer_updated(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError> {
        let mail = self.templates.customer_updated(appointment, service_name);
        info!(to = %appointment.customer_email, subject = %mail.subject, "Email delivery disabled, logging only");
        Ok(())
    }

    async fn notify_customer_cancelled(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError> {
        let mail = self.templates.customer_cancelled(appointment, service_name);
        info!(to = %appointment.customer_email, subject = %mail.subject, "Email delivery disabled, logging only");
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, _token: &str) -> Result<(), NotifyError> {
        // token stays out of the logs
        info!(to = %email, subject = %self.templates.password_reset("").subject, "Email delivery disabled, logging only");
        Ok(())
    }

    async fn send_password_changed(&self, email: &str) -> Result<(), NotifyError> {
        info!(to = %email, subject = %self.templates.password_changed().subject, "Email delivery disabled, logging only");
        Ok(())
    }
}
