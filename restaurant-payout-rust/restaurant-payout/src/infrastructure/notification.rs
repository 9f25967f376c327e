//! Outbound email.
//!
//! Delivery is best-effort: callers log failures and carry on.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::infrastructure::config::NotificationConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Posts messages as JSON to an HTTP mail API.
pub struct MailApiNotifier {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

#[derive(Serialize)]
struct MailApiPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl MailApiNotifier {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, from: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| anyhow!("Failed to build mail client: {}", e))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            from: from.into(),
        })
    }
}

#[async_trait]
impl Notifier for MailApiNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let payload = MailApiPayload {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                anyhow!("Cannot connect to mail API at {}", self.endpoint)
            } else {
                anyhow!("Mail API request failed: {}", e)
            }
        })?;

        if !response.status().is_success() {
            return Err(anyhow!("Mail API responded with {}", response.status()));
        }
        Ok(())
    }
}

/// Writes messages to the log instead of sending them.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        tracing::info!(to = %message.to, subject = %message.subject, "Email (not sent, no mail API configured)");
        Ok(())
    }
}

/// Picks the mail API when one is configured, the log sink otherwise.
pub fn notifier_from_config(config: &NotificationConfig) -> Result<Box<dyn Notifier>> {
    match (&config.mail_api_url, config.enabled) {
        (Some(url), true) => Ok(Box::new(MailApiNotifier::new(
            url.clone(),
            config.mail_api_key.clone(),
            config.from_address.clone(),
            Duration::from_secs(config.timeout_secs),
        )?)),
        _ => Ok(Box::new(LogNotifier)),
    }
}
