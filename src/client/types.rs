//! Request and outcome types for downstream calls.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Header or query-parameter mapping.
pub type Pairs = BTreeMap<String, String>;

/// Body attached to an outbound request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Sent verbatim.
    Raw(String),
    /// Serialized as JSON.
    Json(Value),
}

/// A single call against the downstream base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Appended verbatim to the base URL.
    pub endpoint: String,
    pub headers: Pairs,
    pub params: Pairs,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            headers: Pairs::new(),
            params: Pairs::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn headers(mut self, headers: Pairs) -> Self {
        self.headers = headers;
        self
    }

    pub fn params(mut self, params: Pairs) -> Self {
        self.params = params;
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

/// Response payload, parsed only when the upstream declares JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

/// Normalized result of a downstream call.
///
/// Serializes to the flat `{status_code, headers, body, error}` shape; fields
/// that do not apply to a variant are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiOutcome {
    /// 1xx-3xx response.
    Success {
        status_code: u16,
        headers: Pairs,
        body: ResponseBody,
    },
    /// 4xx/5xx response, recovered. The body is always raw text.
    HttpError {
        status_code: u16,
        headers: Pairs,
        body: String,
        error: String,
    },
    /// Connection refused, DNS failure, timeout.
    Transport { error: String },
    /// Anything else (invalid URL, undecodable body, ...).
    Unexpected { error: String },
}

impl ApiOutcome {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiOutcome::Success { status_code, .. } | ApiOutcome::HttpError { status_code, .. } => {
                Some(*status_code)
            }
            ApiOutcome::Transport { .. } | ApiOutcome::Unexpected { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ApiOutcome::Success { .. } => None,
            ApiOutcome::HttpError { error, .. }
            | ApiOutcome::Transport { error }
            | ApiOutcome::Unexpected { error } => Some(error),
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiOutcome::Success { .. } => "success",
            ApiOutcome::HttpError { .. } => "http_error",
            ApiOutcome::Transport { .. } => "transport_error",
            ApiOutcome::Unexpected { .. } => "unexpected_error",
        }
    }

    /// Status code as text, or `N/A` when no response was received.
    pub fn status_label(&self) -> String {
        self.status_code()
            .map(|code| code.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_outcome_serializes_error_only() {
        let outcome = ApiOutcome::Transport {
            error: "Connection Error: refused".into(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "Connection Error: refused"})
        );
        assert_eq!(outcome.status_label(), "N/A");
    }

    #[test]
    fn test_http_error_keeps_status_and_body() {
        let outcome = ApiOutcome::HttpError {
            status_code: 404,
            headers: Pairs::from([("content-type".into(), "text/plain".into())]),
            body: "missing".into(),
            error: "404 Client Error: Not Found for url: http://x/y".into(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status_code"], 404);
        assert_eq!(value["body"], "missing");
        assert_eq!(value["headers"]["content-type"], "text/plain");
        assert!(value["error"].as_str().unwrap().starts_with("404 Client Error"));
        assert_eq!(outcome.status_label(), "404");
    }

    #[test]
    fn test_success_has_no_error_field() {
        let outcome = ApiOutcome::Success {
            status_code: 200,
            headers: Pairs::new(),
            body: ResponseBody::Json(json!({"id": 1})),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("error").is_none());
        assert_eq!(value["body"], json!({"id": 1}));
        assert_eq!(outcome.error(), None);
    }
}
