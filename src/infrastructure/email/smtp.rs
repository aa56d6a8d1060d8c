//! SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use super::templates::{EmailContent, MailTemplates};
use crate::application::ports::{NotifyError, Notifier};
use crate::config::SmtpConfig;
use crate::domain::Appointment;

#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    admin_recipient: String,
    templates: MailTemplates,
}

impl SmtpNotifier {
    pub fn new(
        config: &SmtpConfig,
        admin_recipient: impl Into<String>,
        templates: MailTemplates,
    ) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            sender: parse_mailbox(&config.sender)?,
            admin_recipient: admin_recipient.into(),
            templates,
        })
    }

    async fn send(&self, to: &str, content: EmailContent) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(parse_mailbox(to)?)
            .subject(content.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(content.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(content.html),
                    ),
            )
            .map_err(|e| NotifyError::Message(e.to_string()))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        info!(to = %to, subject = %content.subject, "Email sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| NotifyError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify_admin_new_appointment(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError> {
        let content = self.templates.admin_new_appointment(appointment, service_name);
        self.send(&self.admin_recipient, content).await
    }

    async fn notify_customer_confirmed(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError> {
        let content = self.templates.customer_confirmed(appointment, service_name);
        self.send(&appointment.customer_email, content).await
    }

    async fn notify_customer_updated(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError> {
        let content = self.templates.customer_updated(appointment, service_name);
        self.send(&appointment.customer_email, content).await
    }

    async fn notify_customer_cancelled(
        &self,
        appointment: &Appointment,
        service_name: &str,
    ) -> Result<(), NotifyError> {
        let content = self.templates.customer_cancelled(appointment, service_name);
        self.send(&appointment.customer_email, content).await
    }

    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), NotifyError> {
        self.send(email, self.templates.password_reset(token)).await
    }

    async fn send_password_changed(&self, email: &str) -> Result<(), NotifyError> {
        self.send(email, self.templates.password_changed()).await
    }
}
