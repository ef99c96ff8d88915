//! API data models
//!
//! This module contains data structures for the broadcast endpoint and the
//! Gemini generateContent API.

pub mod api;
pub mod gemini;
