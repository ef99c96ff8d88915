//! Broadcast endpoint data models
//!
//! Request and response bodies for the relay's own HTTP surface.

use serde::{Deserialize, Serialize};

/// Request body for POST /api/v1/broadcast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastRequest {
    pub prompt: String,
}

/// Response body for POST /api/v1/broadcast
///
/// Carries either the relayed upstream text or one of the fixed error
/// messages; the HTTP status distinguishes the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub response: String,
}

impl BroadcastResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}
