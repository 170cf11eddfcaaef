//! Startup orchestration.
//!
//! # Responsibilities
//! - Preload the specification document
//! - Bind the listener and run the server until shutdown
//!
//! # Design Decisions
//! - A missing or unreadable spec only disables the spec-return rule
//! - The API key is never logged

use std::path::Path;

use tokio::net::TcpListener;

use crate::config::{ApiSpecConfig, RelayConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::spec::{ApiSpec, SpecError};

/// Load the document named in config, logging instead of failing.
pub fn preload_api_spec(config: &ApiSpecConfig) -> Option<ApiSpec> {
    match ApiSpec::load(Path::new(&config.path)) {
        Ok(spec) if spec.is_empty() => {
            tracing::warn!(path = %config.path, "OpenAPI spec is empty; spec requests disabled");
            None
        }
        Ok(spec) => {
            tracing::info!(path = %config.path, "OpenAPI spec loaded successfully");
            Some(spec)
        }
        Err(SpecError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                path = %config.path,
                "OpenAPI spec not found; API understanding will be limited"
            );
            None
        }
        Err(e) => {
            tracing::warn!(path = %config.path, error = %e, "Error loading OpenAPI spec");
            None
        }
    }
}

/// Bind, serve, and return once a shutdown signal has drained the server.
pub async fn run(config: RelayConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.downstream.base_url,
        spec_path = %config.api_spec.path,
        max_body_size = config.security.max_body_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            crate::observability::metrics::init_metrics(addr);
        }
    }

    let api_spec = preload_api_spec(&config.api_spec);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, api_spec);
    server.run(listener, shutdown.subscribe()).await?;

    Ok(())
}
