pub mod queue;

pub use queue::{EmailJob, EmailQueue};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::MailConfig;

pub const VERIFY_EMAIL_TEMPLATE: &str = "verify_email.html";
pub const WELCOME_EMAIL_TEMPLATE: &str = "welcome_email.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub name: String,
    pub email: String,
}

/// Template variables handed to the mail provider.
#[derive(Debug, Clone, Serialize)]
pub struct MailData {
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail provider rejected the message with status {0}")]
    Rejected(u16),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Delivery capability consumed by the identity flows.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipients: &[Address], template: &str, data: &MailData)
        -> Result<(), MailError>;
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    from: Address,
    to: &'a [Address],
    template: &'a str,
    data: &'a MailData,
}

/// Posts templated messages to a transactional mail API.
pub struct HttpMailer {
    client: Client,
    config: MailConfig,
}

impl HttpMailer {
    /// Fails if the TLS backend cannot be initialised. A client without the
    /// request timeout is never substituted.
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(
        &self,
        recipients: &[Address],
        template: &str,
        data: &MailData,
    ) -> Result<(), MailError> {
        let message = OutboundMessage {
            from: Address {
                name: self.config.sender_name.clone(),
                email: self.config.sender_email.clone(),
            },
            to: recipients,
            template,
            data,
        };

        let response = self
            .client
            .post(&self.config.host)
            .bearer_auth(&self.config.token)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}

/// Development mailer: records the message in the log instead of sending it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(
        &self,
        recipients: &[Address],
        template: &str,
        _data: &MailData,
    ) -> Result<(), MailError> {
        for recipient in recipients {
            tracing::info!(to = %recipient.email, template, "mail delivery disabled, message logged");
        }
        Ok(())
    }
}
