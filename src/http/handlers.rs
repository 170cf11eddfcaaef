//! Route handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Instant;

use crate::http::request::McpRequest;
use crate::http::response::error_response;
use crate::http::server::AppState;
use crate::observability::metrics;

/// `POST /mcp`: decode the envelope and dispatch it.
pub async fn mcp_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let start = Instant::now();

    let request = match McpRequest::from_body(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid MCP request body");
            metrics::record_request("invalid", 400, start);
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e));
        }
    };

    let (intent, response) = state.dispatcher.dispatch(&request).await;
    metrics::record_request(intent.as_str(), 200, start);

    response.into_response()
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub api_spec_loaded: bool,
}

/// `GET /health`: unauthenticated liveness probe.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "operational",
        version: env!("CARGO_PKG_VERSION"),
        api_spec_loaded: state.dispatcher.api_spec_loaded(),
    })
}
