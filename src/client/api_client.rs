//! Downstream API client.
//!
//! # Responsibilities
//! - Issue GET/POST/PUT/DELETE calls against one base URL
//! - Log every request and its outcome, headers and bodies included
//! - Fold HTTP errors and transport failures into an `ApiOutcome`
//!
//! # Design Decisions
//! - No retries and no client-side timeout; each call is independent
//! - The endpoint is appended to the base URL as-is (no normalization)
//! - Nothing is returned as `Err`: every failure becomes data

use std::time::Instant;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};

use crate::client::types::{ApiOutcome, ApiRequest, Pairs, RequestBody, ResponseBody};
use crate::observability::metrics;

/// Thin wrapper over `reqwest::Client` bound to a base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub async fn get(&self, endpoint: &str, headers: Pairs, params: Pairs) -> ApiOutcome {
        self.request(ApiRequest::new(Method::GET, endpoint).headers(headers).params(params))
            .await
    }

    pub async fn post(&self, endpoint: &str, headers: Pairs, body: RequestBody) -> ApiOutcome {
        self.request(ApiRequest::new(Method::POST, endpoint).headers(headers).body(body))
            .await
    }

    pub async fn put(&self, endpoint: &str, headers: Pairs, body: RequestBody) -> ApiOutcome {
        self.request(ApiRequest::new(Method::PUT, endpoint).headers(headers).body(body))
            .await
    }

    pub async fn delete(&self, endpoint: &str, headers: Pairs, params: Pairs) -> ApiOutcome {
        self.request(ApiRequest::new(Method::DELETE, endpoint).headers(headers).params(params))
            .await
    }

    /// Perform the call and normalize its result.
    pub async fn request(&self, req: ApiRequest) -> ApiOutcome {
        let start = Instant::now();
        let url = format!("{}{}", self.base_url, req.endpoint);

        tracing::info!(
            method = %req.method,
            url = %url,
            headers = ?req.headers,
            params = ?req.params,
            body = ?req.body,
            "Sending downstream request"
        );

        let mut builder = self.http.request(req.method.clone(), &url);
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !req.params.is_empty() {
            builder = builder.query(&req.params);
        }
        builder = match req.body {
            RequestBody::Empty => builder,
            RequestBody::Raw(text) => builder.body(text),
            RequestBody::Json(value) => builder.json(&value),
        };

        let outcome = match builder.send().await {
            Ok(response) => read_response(response).await,
            Err(e) => classify_error(e),
        };

        match &outcome {
            ApiOutcome::Success { status_code, body, .. } => {
                tracing::info!(status = status_code, body = ?body, "Downstream response received");
            }
            ApiOutcome::HttpError { status_code, body, .. } => {
                tracing::warn!(status = status_code, body = %body, "Downstream HTTP error");
            }
            ApiOutcome::Transport { error } | ApiOutcome::Unexpected { error } => {
                tracing::error!(error = %error, "Downstream request failed");
            }
        }
        metrics::record_downstream_call(req.method.as_str(), outcome.kind(), start);

        outcome
    }
}

async fn read_response(response: Response) -> ApiOutcome {
    let status = response.status();
    let url = response.url().to_string();
    let headers = collect_headers(response.headers());
    let declares_json = headers
        .get(CONTENT_TYPE.as_str())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return unexpected(e),
    };

    if status.is_client_error() || status.is_server_error() {
        return ApiOutcome::HttpError {
            status_code: status.as_u16(),
            headers,
            body: text,
            error: http_error_message(status, &url),
        };
    }

    let body = if declares_json {
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => return unexpected(e),
        }
    } else {
        ResponseBody::Text(text)
    };

    ApiOutcome::Success {
        status_code: status.as_u16(),
        headers,
        body,
    }
}

/// Header names are lowercase; repeated headers are joined with ", ".
fn collect_headers(headers: &HeaderMap) -> Pairs {
    let mut out = Pairs::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        out.entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    out
}

fn http_error_message(status: StatusCode, url: &str) -> String {
    let class = if status.is_client_error() { "Client" } else { "Server" };
    format!(
        "{} {} Error: {} for url: {}",
        status.as_u16(),
        class,
        status.canonical_reason().unwrap_or("Unknown"),
        url
    )
}

fn classify_error(e: reqwest::Error) -> ApiOutcome {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        ApiOutcome::Transport {
            error: format!("Connection Error: {}", e),
        }
    } else {
        unexpected(e)
    }
}

fn unexpected(e: impl std::fmt::Display) -> ApiOutcome {
    ApiOutcome::Unexpected {
        error: format!("An unexpected error occurred: {}", e),
    }
}
