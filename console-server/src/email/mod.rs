//! Outbound mail
//!
//! Templates for the account links plus a [`Mailer`] seam: SES in
//! deployments, a logging mailer when no sender address is configured.

use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct MailError(pub String);

/// A rendered mail ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), MailError>;
}

/// Amazon SES v2 mailer
pub struct SesMailer {
    client: SesClient,
    from: String,
}

impl SesMailer {
    pub fn new(client: SesClient, from: impl Into<String>) -> Self {
        Self {
            client,
            from: from.into(),
        }
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        let content = |data: String| {
            Content::builder()
                .data(data)
                .charset("UTF-8")
                .build()
                .map_err(|e| MailError(e.to_string()))
        };

        let body = Body::builder()
            .html(content(email.html)?)
            .text(content(email.text)?)
            .build();
        let message = Message::builder()
            .subject(content(email.subject)?)
            .body(body)
            .build();

        self.client
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(&email.to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| MailError(format!("Email could not be sent: {e}")))?;

        tracing::info!(to = %email.to, "Email sent");
        Ok(())
    }
}

/// Writes mails to the log instead of sending them
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, body = %email.text, "Email (not sent)");
        Ok(())
    }
}

/// Keeps every mail in memory; used by tests to read the emailed links
#[derive(Debug, Default, Clone)]
pub struct RecordingMailer {
    sent: std::sync::Arc<std::sync::Mutex<Vec<Email>>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(email);
        Ok(())
    }
}

pub fn verification_email(to: &str, name: &str, link: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Confirm your email".to_string(),
        html: format!(
            "<p>Hello {name},</p>\
             <p>Please confirm your email address to activate your admin account.</p>\
             <p><a href=\"{link}\">Confirm email</a></p>\
             <p>This link expires in 12 hours.</p>"
        ),
        text: format!(
            "Hello {name},\n\n\
             Please confirm your email address to activate your admin account:\n\
             {link}\n\n\
             This link expires in 12 hours."
        ),
    }
}

pub fn password_reset_email(to: &str, name: &str, link: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        html: format!(
            "<p>Hello {name},</p>\
             <p>A password reset was requested for your admin account.</p>\
             <p><a href=\"{link}\">Choose a new password</a></p>\
             <p>This link expires in 12 hours. Ignore this mail if you did not ask for it.</p>"
        ),
        text: format!(
            "Hello {name},\n\n\
             A password reset was requested for your admin account:\n\
             {link}\n\n\
             This link expires in 12 hours. Ignore this mail if you did not ask for it."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_email_carries_link() {
        let email = verification_email(
            "jane.doe@shop.test",
            "jane doe",
            "http://localhost:3000/pages/confirm/email/?token=abc",
        );
        assert_eq!(email.to, "jane.doe@shop.test");
        assert!(email.text.contains("?token=abc"));
        assert!(email.html.contains("href=\"http://localhost:3000/pages/confirm/email/?token=abc\""));
    }
}
