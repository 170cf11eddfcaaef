//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, body limit, auth)
//! - Bind server to listener
//! - Stop on the shutdown broadcast

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::client::ApiClient;
use crate::config::RelayConfig;
use crate::http::auth::api_key_middleware;
use crate::http::handlers::{health_handler, mcp_handler};
use crate::http::request::{request_id_of, UuidRequestId};
use crate::relay::Dispatcher;
use crate::spec::ApiSpec;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server.
    ///
    /// `api_spec` is the document preloaded at startup, if it could be read.
    pub fn new(config: RelayConfig, api_spec: Option<ApiSpec>) -> Self {
        let config = Arc::new(config);
        let client = ApiClient::new(config.downstream.base_url.clone());
        let dispatcher = Dispatcher::new(client, api_spec, &config.api_spec.file_name);

        let state = AppState {
            config: config.clone(),
            dispatcher: Arc::new(dispatcher),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// No inbound timeout: a slow downstream call runs to completion and the
    /// dispatch response stays a 200.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id_of(request),
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size));

        Router::new()
            .route("/mcp", post(mcp_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), api_key_middleware))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(layers)
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            downstream = %self.config.downstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
