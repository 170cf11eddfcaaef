//! Response envelope.
//!
//! # Responsibilities
//! - Define the `/mcp` JSON response shape
//! - Map pre-dispatch failures (auth, malformed envelope) to status codes
//!
//! # Design Decisions
//! - Optional fields are omitted, never `null`
//! - Dispatch outcomes are always 200; only auth (401) and envelope
//!   decoding (400) fail at the HTTP level

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::client::ApiOutcome;

pub const DEFAULT_RESULT: &str = "MCP processed your request.";

/// Outbound `/mcp` envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McpResponse {
    pub result: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_spec: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_response: Option<ApiOutcome>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for McpResponse {
    fn default() -> Self {
        Self {
            result: DEFAULT_RESULT.to_string(),
            api_spec: None,
            api_response: None,
            analysis: None,
            error: None,
        }
    }
}

impl IntoResponse for McpResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// `{"error": message}` with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, Json(json!({ "error": message }))).into_response()
}

pub fn unauthorized() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
}
