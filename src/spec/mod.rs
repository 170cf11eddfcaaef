//! Specification document subsystem.
//!
//! Documents come from two places: the file preloaded at startup (served back
//! verbatim) and inline payloads in the request `files` mapping (scanned for
//! endpoint names). Both go through the same parser.

pub mod document;

pub use document::{ApiSpec, SpecError, SpecResult};
