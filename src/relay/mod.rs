//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! authenticated McpRequest
//!     → intent::IntentRouter (which rule fires)
//!     → dispatcher.rs
//!         ReturnApiSpec → preloaded document
//!         SendGet/SendPost → client::ApiClient → ApiOutcome
//!         AnalyzeSpec → spec::ApiSpec::endpoints
//!         Acknowledge → default result
//!     → McpResponse (always 200)
//! ```

pub mod dispatcher;

pub use dispatcher::Dispatcher;
