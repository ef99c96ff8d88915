//! Gemini client
//!
//! This module provides the async HTTP client for the Google
//! generative-language generateContent endpoint. One request in, one
//! response out; no retries and no streaming.

use crate::core::upstream::{Upstream, UpstreamError};
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::error;

/// Gemini async client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key
    /// * `base_url` - API base URL (e.g. https://generativelanguage.googleapis.com/v1beta)
    /// * `model` - Model name (e.g. gemini-2.0-flash)
    /// * `timeout` - Request timeout in seconds
    pub fn new(api_key: String, base_url: String, model: String, timeout: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url,
            model,
        }
    }

    /// Build the generateContent URL with the credential as a query parameter
    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

#[async_trait]
impl Upstream for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, UpstreamError> {
        let response = self
            .client
            .post(self.endpoint_url())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Gemini response: {} (body: {})", e, body);
            UpstreamError::MalformedBody
        })
    }

    fn upstream_name(&self) -> &str {
        "gemini"
    }
}
