//! SMTP email sender using Lettre.
//!
//! Credentials come from the tenant's configuration on every call; a fresh
//! transport is built per message, so one tenant's broken SMTP account
//! cannot poison another's deliveries.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

use crate::ports::{EmailSender, NotifyError, SmtpSettings};

/// SMTP implementation of the EmailSender port.
#[derive(Default)]
pub struct SmtpEmailSender;

impl SmtpEmailSender {
    pub fn new() -> Self {
        Self
    }

    fn build_transport(
        smtp: &SmtpSettings,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let credentials = Credentials::new(
            smtp.username.clone(),
            smtp.password.expose_secret().to_string(),
        );
        Ok(AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .map_err(|e| NotifyError::Delivery(format!("SMTP relay error: {e}")))?
            .port(smtp.port)
            .credentials(credentials)
            .build())
    }

    fn sender_mailbox(smtp: &SmtpSettings) -> Result<lettre::message::Mailbox, NotifyError> {
        let formatted = if smtp.from_name.is_empty() {
            smtp.from_email.clone()
        } else {
            format!("{} <{}>", smtp.from_name, smtp.from_email)
        };
        formatted
            .parse()
            .map_err(|e| NotifyError::Delivery(format!("Invalid sender address: {e}")))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(
        &self,
        smtp: &SmtpSettings,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(Self::sender_mailbox(smtp)?)
            .to(to
                .parse()
                .map_err(|e| NotifyError::Delivery(format!("Invalid recipient: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Delivery(format!("Message build error: {e}")))?;

        let transport = Self::build_transport(smtp)?;
        transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Delivery(format!("SMTP send error: {e}")))?;

        Ok(())
    }
}
