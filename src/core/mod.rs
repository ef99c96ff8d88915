//! Core application modules
//!
//! This module contains configuration, logging, and upstream client
//! functionality.

pub mod client;
pub mod config;
pub mod logging;
pub mod upstream;
