//! Shared-secret authentication for `/mcp`.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use subtle::ConstantTimeEq;

use crate::http::request::request_id_of;
use crate::http::response::unauthorized;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Reject requests whose key header is missing or wrong.
///
/// Runs before the body is read, so rejected requests never reach dispatch.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let provided = request
        .headers()
        .get(state.config.auth.header.as_str())
        .map(|v| v.as_bytes());
    let header_present = provided.is_some();
    let authorized = provided
        .map(|key| keys_match(key, state.config.auth.api_key.as_bytes()))
        .unwrap_or(false);

    if authorized {
        return next.run(request).await;
    }

    tracing::warn!(
        request_id = %request_id_of(&request),
        header_present,
        "Rejected request with invalid API key"
    );
    metrics::record_request("unauthorized", 401, start);
    unauthorized()
}

/// Constant-time key comparison.
pub fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    provided.ct_eq(expected).into()
}
