//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, envelope decoding)
//!     → auth.rs (X-Api-Key check, 401 on mismatch)
//!     → handlers.rs → relay::Dispatcher
//!     → response.rs (JSON envelope)
//!     → Send to client
//! ```

pub mod auth;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{McpRequest, UuidRequestId, X_REQUEST_ID};
pub use response::McpResponse;
pub use server::{AppState, HttpServer};
