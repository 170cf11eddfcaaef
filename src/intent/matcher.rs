//! Prompt matching logic.
//!
//! # Responsibilities
//! - Match literal phrases in the prompt (case-insensitive)
//! - Match an exact key in the `files` mapping
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Phrase matching is plain substring search on the lowercased prompt
//! - File matching is exact and case-sensitive
//! - No regex or tokenization; ambiguous prompts resolve by rule order

use crate::http::request::McpRequest;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &McpRequest) -> bool;
}

/// Matches a phrase anywhere in the prompt.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrase: String,
}

impl PhraseMatcher {
    /// Create a new phrase matcher.
    /// The phrase is normalized to lowercase for case-insensitive matching.
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into().to_lowercase(),
        }
    }
}

impl Matcher for PhraseMatcher {
    fn matches(&self, req: &McpRequest) -> bool {
        req.prompt.to_lowercase().contains(&self.phrase)
    }
}

/// Matches when the `files` mapping carries the given file name.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    file_name: String,
}

impl FileMatcher {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl Matcher for FileMatcher {
    fn matches(&self, req: &McpRequest) -> bool {
        req.files.contains_key(&self.file_name)
    }
}

/// Fixed at construction; used to switch a rule off.
#[derive(Debug, Clone, Copy)]
pub struct Toggle(pub bool);

impl Matcher for Toggle {
    fn matches(&self, _req: &McpRequest) -> bool {
        self.0
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, req: &McpRequest) -> bool {
        // All matchers must pass (AND)
        self.matchers.iter().all(|m| m.matches(req))
    }
}
