//! Computational answers via the Wolfram|Alpha short answers API

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use super::{CapabilityError, KnowledgeEngine};

const DEFAULT_BASE_URL: &str = "https://api.wolframalpha.com";

/// Wolfram|Alpha client
pub struct WolframAlpha {
    client: reqwest::Client,
    app_id: SecretString,
    base_url: String,
}

impl WolframAlpha {
    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(app_id: &SecretString) -> crate::Result<Self> {
        Self::with_base_url(app_id, DEFAULT_BASE_URL)
    }

    /// Create a client against a different API endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn with_base_url(app_id: &SecretString, base_url: &str) -> crate::Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            app_id: SecretString::from(app_id.expose_secret()),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait(?Send)]
impl KnowledgeEngine for WolframAlpha {
    async fn compute(&self, query: &str) -> Result<String, CapabilityError> {
        tracing::debug!(query, "wolfram query");

        let response = self
            .client
            .get(format!("{}/v1/result", self.base_url))
            .query(&[("appid", self.app_id.expose_secret()), ("i", query)])
            .send()
            .await?;

        let status = response.status();
        // 501: the input was understood but has no short answer
        if status == StatusCode::NOT_IMPLEMENTED {
            return Err(CapabilityError::NoAnswer);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "wolfram API error");
            return Err(CapabilityError::Unavailable(format!("wolfram returned {status}")));
        }

        let answer = response.text().await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(CapabilityError::NoAnswer);
        }
        Ok(answer.to_string())
    }
}
