//! Downstream HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! ApiRequest (method, endpoint, headers, params, body)
//!     → api_client.rs (base_url + endpoint, send via reqwest)
//!     → ApiOutcome::{Success, HttpError, Transport, Unexpected}
//!     → serialized as the `api_response` field of the MCP response
//! ```

pub mod api_client;
pub mod types;

pub use api_client::ApiClient;
pub use types::{ApiOutcome, ApiRequest, Pairs, RequestBody, ResponseBody};
