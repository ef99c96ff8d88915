//! API endpoint handlers
//!
//! This module implements the HTTP endpoints for the Gemini prompt relay:
//! the broadcast endpoint, the front-end entry page, and a health check.

use crate::core::config::Config;
use crate::core::upstream::{Upstream, UpstreamError};
use crate::models::api::{BroadcastRequest, BroadcastResponse};
use crate::models::gemini::GenerateContentRequest;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Fixed user-facing message when no API key is configured
const MSG_NOT_CONFIGURED: &str =
    "ERROR: Gemini API key is not configured. Please ask the server administrator to set it.";

/// Fixed user-facing message when the upstream body lacks the expected text
const MSG_UNREADABLE: &str = "ERROR: The upstream response was unreadable.";

/// Fixed user-facing message for transport-level failures
const MSG_TRANSPORT: &str = "ERROR: A critical error occurred while communicating with the \
     upstream service. Check the server log for details.";

/// Front-end entry template with the fixed asset bundle names
const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Broadcast</title>
    <link rel="stylesheet" href="/assets/main.css">
    <script src="/assets/broadcast-main.js" defer></script>
</head>
<body>
    <div id="broadcast-app"></div>
</body>
</html>
"#;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<dyn Upstream>,
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/v1/broadcast", post(broadcast))
        .route("/health", get(health_check))
        .with_state(state)
}

/// POST /api/v1/broadcast - Relay a prompt to the upstream API
///
/// Every failure category is converted to HTTP 500 with one of the fixed
/// messages in the response body; nothing upstream-specific leaks to the
/// caller beyond the numeric status code.
async fn broadcast(
    State(state): State<AppState>,
    Json(request): Json<BroadcastRequest>,
) -> (StatusCode, Json<BroadcastResponse>) {
    if state.config.api_key().is_none() {
        error!("Gemini API key is not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(BroadcastResponse::new(MSG_NOT_CONFIGURED)),
        );
    }

    debug!(
        "Relaying prompt ({} chars) to {}",
        request.prompt.len(),
        state.upstream.upstream_name()
    );

    let upstream_request = GenerateContentRequest::from_prompt(request.prompt);

    match state.upstream.generate_content(&upstream_request).await {
        Ok(response) => match response.first_text() {
            Some(text) => (StatusCode::OK, Json(BroadcastResponse::new(text))),
            None => {
                error!("Unexpected response structure from upstream: {:?}", response);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(BroadcastResponse::new(MSG_UNREADABLE)),
                )
            }
        },
        Err(UpstreamError::Status { status, body }) => {
            error!("Upstream returned non-200 status {}: {}", status, body);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BroadcastResponse::new(format!(
                    "ERROR: The upstream service is not responding correctly. Status code: {}",
                    status
                ))),
            )
        }
        Err(UpstreamError::MalformedBody) => {
            error!("Upstream response body could not be parsed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BroadcastResponse::new(MSG_UNREADABLE)),
            )
        }
        Err(UpstreamError::Transport(e)) => {
            error!("Transport failure while calling upstream: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BroadcastResponse::new(MSG_TRANSPORT)),
            )
        }
    }
}

/// GET / - Front-end entry page
///
/// Serves the template that loads the script and stylesheet bundles.
async fn index() -> Html<&'static str> {
    Html(INDEX_TEMPLATE)
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "api_key_configured": state.config.api_key_configured(),
        "upstream": state.upstream.upstream_name(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gemini::GenerateContentResponse;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// What the stubbed upstream should do on each call
    enum StubBehavior {
        Text(&'static str),
        EmptyCandidates,
        Status(u16),
        MalformedBody,
        Transport,
    }

    struct StubUpstream {
        behavior: StubBehavior,
        calls: AtomicUsize,
    }

    impl StubUpstream {
        fn new(behavior: StubBehavior) -> Self {
            Self {
                behavior,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Upstream for StubUpstream {
        async fn generate_content(
            &self,
            _request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                StubBehavior::Text(text) => {
                    let body = format!(
                        r#"{{"candidates":[{{"content":{{"parts":[{{"text":"{}"}}]}}}}]}}"#,
                        text
                    );
                    Ok(serde_json::from_str(&body).unwrap())
                }
                StubBehavior::EmptyCandidates => Ok(serde_json::from_str("{}").unwrap()),
                StubBehavior::Status(status) => Err(UpstreamError::Status {
                    status,
                    body: "upstream error body".to_string(),
                }),
                StubBehavior::MalformedBody => Err(UpstreamError::MalformedBody),
                StubBehavior::Transport => Err(UpstreamError::Transport(
                    "connection refused".to_string(),
                )),
            }
        }

        fn upstream_name(&self) -> &str {
            "stub"
        }
    }

    fn test_config(api_key: Option<&str>) -> Config {
        Config {
            api_key: api_key.map(str::to_string),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            request_timeout: 90,
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "error".to_string(),
        }
    }

    fn test_state(api_key: Option<&str>, upstream: Arc<StubUpstream>) -> AppState {
        AppState {
            config: Arc::new(test_config(api_key)),
            upstream,
        }
    }

    fn broadcast_request(prompt: &str) -> Request<Body> {
        Request::builder()
            .uri("/api/v1/broadcast")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&json!({"prompt": prompt})).unwrap(),
            ))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_missing_credential_returns_500_without_outbound_call() {
        let upstream = Arc::new(StubUpstream::new(StubBehavior::Text("unreached")));
        let app = create_router(test_state(None, upstream.clone()));

        let response = app.oneshot(broadcast_request("hello")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response_json(response).await;
        assert_eq!(body["response"], MSG_NOT_CONFIGURED);
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_credential_returns_500_without_outbound_call() {
        let upstream = Arc::new(StubUpstream::new(StubBehavior::Text("unreached")));
        let app = create_router(test_state(Some("  "), upstream.clone()));

        let response = app.oneshot(broadcast_request("hello")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_broadcast_relays_text() {
        let upstream = Arc::new(StubUpstream::new(StubBehavior::Text("X")));
        let app = create_router(test_state(Some("key"), upstream));

        let response = app.oneshot(broadcast_request("any prompt")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body, json!({"response": "X"}));
    }

    #[tokio::test]
    async fn test_upstream_503_returns_500_with_status_message() {
        let upstream = Arc::new(StubUpstream::new(StubBehavior::Status(503)));
        let app = create_router(test_state(Some("key"), upstream));

        let response = app.oneshot(broadcast_request("hello")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response_json(response).await;
        let message = body["response"].as_str().unwrap();
        assert!(message.contains("Status code: 503"), "message: {}", message);
    }

    #[tokio::test]
    async fn test_missing_candidates_returns_unreadable_message() {
        let upstream = Arc::new(StubUpstream::new(StubBehavior::EmptyCandidates));
        let app = create_router(test_state(Some("key"), upstream));

        let response = app.oneshot(broadcast_request("hello")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response_json(response).await;
        assert_eq!(body["response"], MSG_UNREADABLE);
    }

    #[tokio::test]
    async fn test_unparseable_body_returns_unreadable_message() {
        let upstream = Arc::new(StubUpstream::new(StubBehavior::MalformedBody));
        let app = create_router(test_state(Some("key"), upstream));

        let response = app.oneshot(broadcast_request("hello")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response_json(response).await;
        assert_eq!(body["response"], MSG_UNREADABLE);
    }

    #[tokio::test]
    async fn test_transport_failure_returns_500_without_raw_error() {
        let upstream = Arc::new(StubUpstream::new(StubBehavior::Transport));
        let app = create_router(test_state(Some("key"), upstream));

        let response = app.oneshot(broadcast_request("hello")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response_json(response).await;
        assert_eq!(body["response"], MSG_TRANSPORT);
        assert!(!body["response"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_repeated_prompt_yields_identical_payload() {
        let upstream = Arc::new(StubUpstream::new(StubBehavior::Text("same answer")));
        let state = test_state(Some("key"), upstream);

        let first = create_router(state.clone())
            .oneshot(broadcast_request("repeat me"))
            .await
            .unwrap();
        let second = create_router(state)
            .oneshot(broadcast_request("repeat me"))
            .await
            .unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(response_json(first).await, response_json(second).await);
    }

    #[tokio::test]
    async fn test_index_serves_asset_bundles() {
        let upstream = Arc::new(StubUpstream::new(StubBehavior::Text("unused")));
        let app = create_router(test_state(Some("key"), upstream));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/assets/broadcast-main.js"));
        assert!(html.contains("/assets/main.css"));
    }

    #[tokio::test]
    async fn test_health_reports_credential_state() {
        let upstream = Arc::new(StubUpstream::new(StubBehavior::Text("unused")));
        let app = create_router(test_state(None, upstream));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["api_key_configured"], false);
    }
}
