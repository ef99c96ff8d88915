//! Upstream abstraction for the generative-language API
//!
//! This module defines the trait the broadcast handler calls through, so the
//! real Gemini client and test stubs are interchangeable at the seam.

use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Error types for upstream operations
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },

    #[error("upstream response missing expected text field")]
    MalformedBody,

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Trait for the generative-language upstream
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Send a single synchronous generateContent request
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, UpstreamError>;

    /// Get the upstream name for diagnostics
    fn upstream_name(&self) -> &str;
}
