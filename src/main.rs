//! MCP relay server.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                  MCP RELAY                   │
//!   POST /mcp           │  ┌────────┐   ┌────────┐   ┌─────────────┐   │
//!   ────────────────────┼─▶│  http  │──▶│  auth  │──▶│   intent    │   │
//!                       │  │ server │   │  key   │   │   router    │   │
//!                       │  └────────┘   └────────┘   └──────┬──────┘   │
//!                       │                                   ▼          │
//!                       │  ┌─────────┐              ┌─────────────┐    │
//!   JSON response       │  │response │◀─────────────│ dispatcher  │    │
//!   ◀───────────────────┼──│envelope │              └──┬───────┬──┘    │
//!                       │  └─────────┘                 │       │       │
//!                       │                     ┌────────▼┐  ┌───▼────┐  │
//!                       │                     │ client  │  │  spec  │  │
//!                       │                     └────┬────┘  └────────┘  │
//!                       └──────────────────────────┼───────────────────┘
//!                                                  ▼
//!                                           Downstream API
//! ```

use std::path::PathBuf;

use clap::Parser;

use mcp_relay::config::load_config;
use mcp_relay::lifecycle::startup;
use mcp_relay::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "mcp-relay")]
#[command(about = "Relay natural-language API instructions to a REST backend", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults and environment variables apply without it
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_logging(config.observability.log_format);
    tracing::info!("mcp-relay v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
