//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

use mcp_relay::config::RelayConfig;
use mcp_relay::http::HttpServer;
use mcp_relay::lifecycle::Shutdown;
use mcp_relay::spec::ApiSpec;

pub const API_KEY: &str = "test-key";

pub const SLOW_RESPONSE_DELAY: Duration = Duration::from_millis(1500);

/// A call received by the mock downstream API.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

/// A mock downstream API that records every call it receives.
///
/// - `/users`: GET → 200 JSON list, POST → 201 JSON echo
/// - `/text`: 200 plain text
/// - `/missing`: 404 plain text
/// - `/broken`: 500 plain text
/// - `/bad-json`: 200 declaring JSON but sending garbage
/// - `/slow`: 200 JSON after `SLOW_RESPONSE_DELAY`
#[derive(Clone)]
pub struct MockDownstream {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockDownstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

pub async fn start_mock_downstream() -> MockDownstream {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record).with_state(calls.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockDownstream { addr, calls }
}

async fn record(
    State(calls): State<Arc<Mutex<Vec<RecordedCall>>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = String::from_utf8_lossy(&body).into_owned();
    calls.lock().unwrap().push(RecordedCall {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: body.clone(),
    });

    let json = [(header::CONTENT_TYPE, "application/json")];
    let text = [(header::CONTENT_TYPE, "text/plain")];
    match (method, uri.path()) {
        (Method::GET, "/users") => {
            (StatusCode::OK, json, r#"[{"id":1,"name":"Leanne Graham"}]"#.to_string())
                .into_response()
        }
        (Method::POST, "/users") | (Method::PUT, "/users") => {
            let echoed: serde_json::Value =
                serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
            let reply = serde_json::json!({"id": 11, "received": echoed});
            (StatusCode::CREATED, json, reply.to_string()).into_response()
        }
        (Method::DELETE, "/users") => StatusCode::NO_CONTENT.into_response(),
        (_, "/text") => (StatusCode::OK, text, "plain body".to_string()).into_response(),
        (_, "/missing") => (StatusCode::NOT_FOUND, text, "not here".to_string()).into_response(),
        (_, "/broken") => {
            (StatusCode::INTERNAL_SERVER_ERROR, text, "boom".to_string()).into_response()
        }
        (_, "/slow") => {
            tokio::time::sleep(SLOW_RESPONSE_DELAY).await;
            (StatusCode::OK, json, r#"{"slow":true}"#.to_string()).into_response()
        }
        (_, "/bad-json") => (StatusCode::OK, json, "{oops".to_string()).into_response(),
        _ => (StatusCode::NOT_FOUND, text, "no route".to_string()).into_response(),
    }
}

/// A relay running on an ephemeral port.
pub struct RelayHandle {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RelayHandle {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RelayHandle {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn test_config(base_url: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.auth.api_key = API_KEY.into();
    config.downstream.base_url = base_url.into();
    config.listener.bind_address = "127.0.0.1:0".into();
    config
}

pub async fn start_relay(config: RelayConfig, api_spec: Option<ApiSpec>) -> RelayHandle {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, api_spec);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the server a moment to start accepting.
    tokio::time::sleep(Duration::from_millis(50)).await;

    RelayHandle { addr, shutdown }
}

/// Test client without connection pooling or system proxies.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
