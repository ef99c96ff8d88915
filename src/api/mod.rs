//! HTTP API modules

pub mod endpoints;
