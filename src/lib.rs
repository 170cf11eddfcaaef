//! MCP relay library.
//!
//! Accepts prompt/context/files envelopes on `POST /mcp`, recognizes a small
//! set of literal intents in the prompt, and relays them to one downstream
//! REST API or answers from a preloaded OpenAPI document.

pub mod client;
pub mod config;
pub mod http;
pub mod intent;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod spec;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
