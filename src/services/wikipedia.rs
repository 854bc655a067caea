//! Encyclopedia lookups via the Wikipedia REST summary API

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{CapabilityError, Encyclopedia};

const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/api/rest_v1";

/// Page summary response
#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Wikipedia page summary client
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaClient {
    /// Create a client for English Wikipedia
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new() -> crate::Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a different REST endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn with_base_url(base_url: &str) -> crate::Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait(?Send)]
impl Encyclopedia for WikipediaClient {
    async fn summarize(
        &self,
        topic: &str,
        max_sentences: usize,
    ) -> Result<String, CapabilityError> {
        let title = topic.trim().replace(' ', "_");
        if title.is_empty() {
            return Err(CapabilityError::NotFound);
        }

        let url = format!(
            "{}/page/summary/{}",
            self.base_url,
            urlencoding::encode(&title)
        );
        tracing::debug!(topic, %url, "wikipedia summary request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CapabilityError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "wikipedia API error");
            return Err(CapabilityError::Unavailable(format!("wikipedia returned {status}")));
        }

        let summary: SummaryResponse = response.json().await?;
        if summary.kind == "disambiguation" {
            return Err(CapabilityError::Ambiguous);
        }

        let text = first_sentences(&summary.extract, max_sentences);
        if text.is_empty() {
            return Err(CapabilityError::NotFound);
        }
        Ok(text)
    }
}

/// The first `n` sentences of `text`
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or end of text.
#[must_use]
pub fn first_sentences(text: &str, n: usize) -> String {
    let text = text.trim();
    if n == 0 {
        return String::new();
    }

    let mut count = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                count += 1;
                if count == n {
                    return text[..i + c.len_utf8()].to_string();
                }
            }
        }
    }
    text.to_string()
}
