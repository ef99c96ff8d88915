//! Gemini API data models
//!
//! This module defines the request and response structures for the Google
//! generative-language REST API (generateContent), covering only the fields
//! the relay reads and writes.

use serde::{Deserialize, Serialize};

/// A single part of a content block. Only text parts are exchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Content block containing one or more parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Request body for the generateContent endpoint
///
/// Serializes to `{"contents":[{"parts":[{"text":<prompt>}]}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Wrap a single user prompt in the envelope the API expects
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

/// A single generated candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

/// Response body for the generateContent endpoint
///
/// Upstream sends more fields (usage metadata, safety ratings); everything
/// beyond the candidate text path is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Extract the text at `candidates[0].content.parts[0].text`
    ///
    /// Returns `None` when any element along the path is absent, which the
    /// caller must treat as a malformed upstream body.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .first()
            .map(|part| part.text.as_str())
    }
}
