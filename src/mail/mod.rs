pub mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::config::{optional_var, var_or};
use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct SendGridConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub from_email: String,
    pub from_name: String,
}

impl SendGridConfig {
    pub fn new_from_env() -> Self {
        Self {
            api_key: optional_var("SENDGRID_API_KEY"),
            base_url: var_or("SENDGRID_BASE_URL", "https://api.sendgrid.com"),
            from_email: var_or("REMINDER_FROM_EMAIL", "reminders@collegetracker.app"),
            from_name: var_or("REMINDER_FROM_NAME", "College Tracker"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    Sent,
    /// No transport credential is configured; nothing left the process.
    Skipped,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<DispatchOutcome, AppError>;
}

pub struct SendGridTransport {
    client: Client,
    config: SendGridConfig,
}

impl SendGridTransport {
    pub fn new(config: SendGridConfig, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MailTransport for SendGridTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<DispatchOutcome, AppError> {
        let Some(api_key) = &self.config.api_key else {
            info!(
                "SENDGRID_API_KEY not set, skipping email to {} ({})",
                email.to, email.subject
            );
            return Ok(DispatchOutcome::Skipped);
        };

        let url = format!("{}/v3/mail/send", self.config.base_url);
        let request_body = dto::SendMailRequest {
            personalizations: vec![dto::Personalization {
                to: vec![dto::EmailAddress { email: email.to.clone(), name: None }],
            }],
            from: dto::EmailAddress {
                email: self.config.from_email.clone(),
                name: Some(self.config.from_name.clone()),
            },
            subject: email.subject.clone(),
            content: vec![dto::Content {
                content_type: "text/plain".to_string(),
                value: email.body_text.clone(),
            }],
        };

        let response = self.client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("mail send failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("mail API error {}: {}", status, body)));
        }

        Ok(DispatchOutcome::Sent)
    }
}

pub struct NoopMailTransport;

#[async_trait]
impl MailTransport for NoopMailTransport {
    async fn send(&self, _email: &OutgoingEmail) -> Result<DispatchOutcome, AppError> {
        Ok(DispatchOutcome::Skipped)
    }
}
