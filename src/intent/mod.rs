//! Intent recognition subsystem.
//!
//! # Data Flow
//! ```text
//! McpRequest (prompt, context, files)
//!     → router.rs (ordered rule lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → extract.rs (endpoint / body from the prompt text)
//!     → Return: Intent (or Acknowledge)
//!
//! Rule order (fixed at startup):
//!     1. "get_api_spec" AND a spec was preloaded
//!     2. "send get request"
//!     3. "send post request"
//!     4. files contains the configured spec file name
//!     5. fallback: Acknowledge
//! ```
//!
//! # Design Decisions
//! - Literal substring checks, not a parser; ambiguous prompts resolve by order
//! - Deterministic: same input always yields the same intent
//! - First match wins

pub mod extract;
pub mod matcher;
pub mod router;

pub use extract::{PostBody, PostTarget};
pub use router::{Intent, IntentKind, IntentRouter};
