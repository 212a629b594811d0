//! Outbound notification mail.
//!
//! The service never speaks SMTP itself; [`HttpMailer`] posts messages to a
//! transactional-mail HTTP API. [`LogMailer`] is used when mail is disabled.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MailConfig;
use crate::observability::metrics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail API rejected message with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Posts each message as JSON with a bearer credential.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await;

        let outcome = match response {
            Ok(res) if res.status().is_success() => Ok(()),
            Ok(res) => Err(MailError::Rejected(res.status().as_u16())),
            Err(e) => Err(MailError::Transport(e)),
        };

        metrics::record_notification(if outcome.is_ok() { "sent" } else { "failed" });
        if outcome.is_ok() {
            tracing::info!(to = %message.to, subject = %message.subject, "Notification sent");
        }
        outcome
    }
}

/// Logs messages instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Mail disabled, notification logged only"
        );
        metrics::record_notification("logged");
        Ok(())
    }
}

/// Build the mailer selected by config.
pub fn from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    if config.enabled {
        let mailer = HttpMailer::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Arc::new(mailer))
    } else {
        Ok(Arc::new(LogMailer))
    }
}
