//! SMTP mail sender
//!
//! Implements the `MailSender` port with lettre over STARTTLS. Messages
//! are HTML with an optional single PDF attachment.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, instrument};

use desk_common::config::SmtpConfig;
use desk_common::error::AppError;
use desk_core::error::DomainError;
use desk_core::traits::MailSender;

/// Lettre-backed SMTP mail sender
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailSender {
    /// Create a sender from SMTP configuration
    ///
    /// # Errors
    /// Returns an error if the relay host or sender address is invalid
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Config(format!("Invalid SMTP relay: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let sender = config
            .sender
            .parse::<Mailbox>()
            .map_err(|e| AppError::Config(format!("Invalid SMTP sender address: {e}")))?;

        Ok(Self { transport, sender })
    }

    fn recipient(to: &str) -> Result<Mailbox, DomainError> {
        to.parse::<Mailbox>()
            .map_err(|e| DomainError::MailError(format!("Invalid recipient {to}: {e}")))
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    #[instrument(skip(self, html_body))]
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), DomainError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(Self::recipient(to)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| DomainError::MailError(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DomainError::MailError(e.to_string()))?;

        info!(to, subject, "Email sent");
        Ok(())
    }

    #[instrument(skip(self, html_body, attachment))]
    async fn send_with_attachment(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        attachment: Vec<u8>,
        filename: &str,
    ) -> Result<(), DomainError> {
        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| DomainError::MailError(e.to_string()))?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(Self::recipient(to)?)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(html_body.to_string()))
                    .singlepart(Attachment::new(filename.to_string()).body(attachment, pdf_type)),
            )
            .map_err(|e| DomainError::MailError(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DomainError::MailError(e.to_string()))?;

        info!(to, subject, filename, "Email with attachment sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_recipient() {
        let err = SmtpMailSender::recipient("not-an-address").unwrap_err();
        assert!(matches!(err, DomainError::MailError(_)));
    }

    #[test]
    fn test_parses_valid_recipient() {
        assert!(SmtpMailSender::recipient("asha@corp.example").is_ok());
    }
}
