//! Gemini prompt relay
//!
//! This application exposes a single broadcast endpoint that forwards a
//! user-supplied text prompt to the Google generative-language API and
//! relays the text response back to the caller.

mod api;
mod core;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::core::client::GeminiClient;
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::upstream::Upstream;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    print_startup_banner(&config);

    if !config.api_key_configured() {
        // Not fatal: the broadcast endpoint answers with the fixed
        // not-configured message until the key is set.
        warn!("Gemini API key is not configured; broadcasts will fail until it is set");
    }

    let upstream: Arc<dyn Upstream> = Arc::new(GeminiClient::new(
        config.api_key().unwrap_or_default().to_string(),
        config.base_url.clone(),
        config.model.clone(),
        config.request_timeout,
    ));

    let app_state = AppState {
        config: config.clone(),
        upstream,
    };

    let app = create_router(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("🚀 Gemini Relay v0.1.0");
    println!("✅ Configuration loaded successfully");
    println!("   Model: {}", config.model);
    println!("   Base URL: {}", config.base_url);
    println!("   Request Timeout: {}s", config.request_timeout);
    println!("   Server: {}:{}", config.host, config.port);
    println!(
        "   API Key: {}",
        if config.api_key_configured() {
            "Configured"
        } else {
            "Not configured"
        }
    );
    println!();
}

/// Print help message
fn print_help() {
    println!("Gemini Relay v0.1.0");
    println!();
    println!("Usage: gemini-relay [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Environment variables:");
    println!("  CONFIG_PATH - Path to TOML configuration (default: config.toml)");
    println!("  RUST_LOG    - Overrides the configured log level");
    println!();
    println!("Configuration file keys:");
    println!("  [gemini]");
    println!("  api_key         - Gemini API key (broadcasts fail until set)");
    println!("  model           - Model name (default: gemini-2.0-flash)");
    println!("  base_url        - API base URL (default: generativelanguage.googleapis.com/v1beta)");
    println!("  request_timeout - Request timeout in seconds (default: 90)");
    println!();
    println!("  [server]");
    println!("  host      - Server host (default: 0.0.0.0)");
    println!("  port      - Server port (default: 8080)");
    println!("  log_level - Logging level (default: info)");
}
