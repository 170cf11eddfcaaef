//! Intent lookup.
//!
//! # Responsibilities
//! - Store the ordered rule list
//! - Return the first rule matching a request
//! - Turn the matched rule into an `Intent` carrying extracted arguments
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - First match wins; rules are evaluated in a fixed order
//! - Explicit fallback (`Acknowledge`) rather than a silent no-op

use std::fmt;

use serde_json::Value;

use crate::http::request::McpRequest;
use crate::intent::extract::{get_endpoint, post_target, PostTarget};
use crate::intent::matcher::{AndMatcher, FileMatcher, Matcher, PhraseMatcher, Toggle};

pub const GET_API_SPEC_PHRASE: &str = "get_api_spec";
pub const SEND_GET_PHRASE: &str = "send get request";
pub const SEND_POST_PHRASE: &str = "send post request";

/// Which dispatch rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    ReturnApiSpec,
    SendGet,
    SendPost,
    AnalyzeSpec,
    Acknowledge,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::ReturnApiSpec => "return_api_spec",
            IntentKind::SendGet => "send_get",
            IntentKind::SendPost => "send_post",
            IntentKind::AnalyzeSpec => "analyze_spec",
            IntentKind::Acknowledge => "acknowledge",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified request with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ReturnApiSpec,
    SendGet { endpoint: String },
    /// `None` when the prompt has no `"to "` to split on.
    SendPost(Option<PostTarget>),
    /// Raw `files` entry; not necessarily text.
    AnalyzeSpec { content: Value },
    Acknowledge,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::ReturnApiSpec => IntentKind::ReturnApiSpec,
            Intent::SendGet { .. } => IntentKind::SendGet,
            Intent::SendPost(_) => IntentKind::SendPost,
            Intent::AnalyzeSpec { .. } => IntentKind::AnalyzeSpec,
            Intent::Acknowledge => IntentKind::Acknowledge,
        }
    }
}

#[derive(Debug)]
struct Rule {
    kind: IntentKind,
    matcher: Box<dyn Matcher>,
}

/// Ordered dispatch rules.
#[derive(Debug)]
pub struct IntentRouter {
    rules: Vec<Rule>,
    spec_file_name: String,
}

impl IntentRouter {
    /// Build the rule list.
    ///
    /// The spec-return rule only fires when a document was preloaded.
    pub fn new(spec_file_name: impl Into<String>, api_spec_loaded: bool) -> Self {
        let spec_file_name = spec_file_name.into();
        let rules = vec![
            Rule {
                kind: IntentKind::ReturnApiSpec,
                matcher: Box::new(AndMatcher::new(vec![
                    Box::new(Toggle(api_spec_loaded)),
                    Box::new(PhraseMatcher::new(GET_API_SPEC_PHRASE)),
                ])),
            },
            Rule {
                kind: IntentKind::SendGet,
                matcher: Box::new(PhraseMatcher::new(SEND_GET_PHRASE)),
            },
            Rule {
                kind: IntentKind::SendPost,
                matcher: Box::new(PhraseMatcher::new(SEND_POST_PHRASE)),
            },
            Rule {
                kind: IntentKind::AnalyzeSpec,
                matcher: Box::new(FileMatcher::new(spec_file_name.clone())),
            },
        ];

        Self {
            rules,
            spec_file_name,
        }
    }

    /// First matching rule, or `Acknowledge`.
    pub fn classify(&self, req: &McpRequest) -> IntentKind {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(req))
            .map(|rule| rule.kind)
            .unwrap_or(IntentKind::Acknowledge)
    }

    /// Classify and extract arguments.
    pub fn resolve(&self, req: &McpRequest) -> Intent {
        match self.classify(req) {
            IntentKind::ReturnApiSpec => Intent::ReturnApiSpec,
            IntentKind::SendGet => Intent::SendGet {
                endpoint: get_endpoint(&req.prompt),
            },
            IntentKind::SendPost => Intent::SendPost(post_target(&req.prompt)),
            IntentKind::AnalyzeSpec => match req.files.get(&self.spec_file_name) {
                Some(content) => Intent::AnalyzeSpec {
                    content: content.clone(),
                },
                None => Intent::Acknowledge,
            },
            IntentKind::Acknowledge => Intent::Acknowledge,
        }
    }

    pub fn spec_file_name(&self) -> &str {
        &self.spec_file_name
    }
}
