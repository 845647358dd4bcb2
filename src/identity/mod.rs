pub mod dto;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::{optional_var, var_or};
use crate::db::{DocumentStore, repository::USERS};
use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct FirebaseIdentityConfig {
    pub base_url: String,
    pub project_id: Option<String>,
    pub access_token: Option<String>,
}

impl FirebaseIdentityConfig {
    pub fn new_from_env() -> Self {
        Self {
            base_url: var_or("IDENTITY_BASE_URL", "https://identitytoolkit.googleapis.com/v1"),
            project_id: optional_var("FIREBASE_PROJECT_ID"),
            access_token: optional_var("IDENTITY_ACCESS_TOKEN"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.project_id.is_some() && self.access_token.is_some()
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn user_email(&self, user_id: &str) -> Result<Option<String>, AppError>;
}

/// Primary source: the auth provider's admin account lookup.
pub struct FirebaseIdentityProvider {
    client: Client,
    config: FirebaseIdentityConfig,
}

impl FirebaseIdentityProvider {
    pub fn new(config: FirebaseIdentityConfig, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn user_email(&self, user_id: &str) -> Result<Option<String>, AppError> {
        let (Some(project_id), Some(token)) = (&self.config.project_id, &self.config.access_token) else {
            return Err(AppError::Config("Identity provider credentials are not set".to_string()));
        };

        let url = format!("{}/projects/{}/accounts:lookup", self.config.base_url, project_id);
        let request_body = dto::LookupRequest { local_id: vec![user_id.to_string()] };

        let response = self.client
            .post(&url)
            .bearer_auth(token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("identity lookup failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("identity API error {}: {}", status, body)));
        }

        let parsed: dto::LookupResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse identity response: {}", e)))?;

        Ok(parsed
            .users
            .into_iter()
            .find(|u| u.local_id == user_id)
            .and_then(|u| u.email))
    }
}

/// Fallback source: the `email` field of the `users/<id>` profile document.
pub struct ProfileIdentityProvider {
    store: Arc<dyn DocumentStore>,
}

impl ProfileIdentityProvider {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IdentityProvider for ProfileIdentityProvider {
    fn name(&self) -> &'static str {
        "profile"
    }

    async fn user_email(&self, user_id: &str) -> Result<Option<String>, AppError> {
        let doc = self.store.get_by_id(USERS, user_id).await?;
        Ok(doc.and_then(|d| d.body.get("email").and_then(|v| v.as_str()).map(str::to_string)))
    }
}

/// Tries each provider in order; the first non-empty email wins.
#[derive(Clone)]
pub struct EmailResolver {
    providers: Vec<Arc<dyn IdentityProvider>>,
    timeout: Duration,
}

impl EmailResolver {
    pub fn new(providers: Vec<Arc<dyn IdentityProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    pub async fn resolve(&self, user_id: &str) -> Option<String> {
        for provider in &self.providers {
            match tokio::time::timeout(self.timeout, provider.user_email(user_id)).await {
                Ok(Ok(Some(email))) if !email.trim().is_empty() => {
                    return Some(email.trim().to_string());
                }
                Ok(Ok(_)) => {
                    debug!("No email for user {} from {} lookup", user_id, provider.name());
                }
                Ok(Err(e)) => {
                    warn!("{} lookup failed for user {}: {}", provider.name(), user_id, e);
                }
                Err(_) => {
                    warn!("{} lookup timed out for user {}", provider.name(), user_id);
                }
            }
        }
        None
    }
}
