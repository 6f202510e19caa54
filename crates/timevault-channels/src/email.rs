//! SMTP email transport — async lettre over STARTTLS.
//!
//! Every unlock mail carries an explicit Reply-To and a deterministic
//! Message-ID supplied by the dispatcher, plus text and HTML alternatives.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use timevault_core::config::EmailConfig;
use timevault_core::{EmailMessage, EmailTransport, Result, TimeVaultError};

/// SMTP-backed `EmailTransport`.
pub struct SmtpEmailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailTransport {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let creds = Credentials::new(config.address.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| TimeVaultError::Email(format!("SMTP relay: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();
        Ok(Self { mailer })
    }
}

#[async_trait]
impl EmailTransport for SmtpEmailTransport {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let mime = build_mime(message)?;
        self.mailer
            .send(mime)
            .await
            .map_err(|e| TimeVaultError::Email(format!("SMTP send: {e}")))?;
        tracing::info!("📧 Email sent to: {}", message.to);
        Ok(())
    }
}

/// Build the MIME message: headers from the composed `EmailMessage`, body
/// as multipart/alternative with plain text first.
fn build_mime(message: &EmailMessage) -> Result<Message> {
    let from: Mailbox = message
        .from
        .parse()
        .map_err(|e| TimeVaultError::Email(format!("Invalid from: {e}")))?;
    let reply_to: Mailbox = message
        .reply_to
        .parse()
        .map_err(|e| TimeVaultError::Email(format!("Invalid reply-to: {e}")))?;
    let to: Mailbox = message
        .to
        .parse()
        .map_err(|e| TimeVaultError::Email(format!("Invalid to: {e}")))?;

    Message::builder()
        .from(from)
        .reply_to(reply_to)
        .to(to)
        .subject(message.subject.clone())
        .message_id(Some(message.message_id.clone()))
        .multipart(MultiPart::alternative_plain_html(
            message.text.clone(),
            message.html.clone(),
        ))
        .map_err(|e| TimeVaultError::Email(format!("Build email: {e}")))
}
