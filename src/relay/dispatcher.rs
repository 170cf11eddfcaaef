//! Intent execution.
//!
//! # Responsibilities
//! - Resolve the intent of an authenticated request
//! - Call the downstream API for GET/POST intents
//! - Serve or analyze specification documents
//! - Fold every failure into the response `error` field
//!
//! # Design Decisions
//! - Stateless across calls; the preloaded document is read-only
//! - At most one downstream call per request

use std::collections::BTreeMap;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::client::{ApiClient, Pairs, RequestBody};
use crate::http::request::McpRequest;
use crate::http::response::McpResponse;
use crate::intent::{Intent, IntentKind, IntentRouter, PostTarget};
use crate::spec::{ApiSpec, SpecError};

pub const SPEC_RESULT: &str = "Here is the OpenAPI specification.";
pub const ANALYSIS_RESULT: &str = "API specification analyzed successfully.";
pub const INVALID_BODY_ERROR: &str = "Could not parse JSON body.";
pub const MISSING_ENDPOINT_ERROR: &str = "Could not determine endpoint from prompt.";

/// Executes intents against the downstream API and the loaded document.
#[derive(Debug)]
pub struct Dispatcher {
    client: ApiClient,
    api_spec: Option<Value>,
    intents: IntentRouter,
}

impl Dispatcher {
    /// Create a dispatcher.
    ///
    /// `api_spec` is the document preloaded at startup, if any; an empty
    /// document counts as not loaded.
    pub fn new(client: ApiClient, api_spec: Option<ApiSpec>, spec_file_name: &str) -> Self {
        let api_spec = api_spec.filter(|spec| !spec.is_empty()).map(|spec| spec.to_json());
        let intents = IntentRouter::new(spec_file_name, api_spec.is_some());
        Self {
            client,
            api_spec,
            intents,
        }
    }

    pub fn api_spec_loaded(&self) -> bool {
        self.api_spec.is_some()
    }

    /// Handle one request. Never fails; errors land in the response.
    pub async fn dispatch(&self, req: &McpRequest) -> (IntentKind, McpResponse) {
        tracing::info!(prompt = %req.prompt, "Received prompt");
        tracing::debug!(
            context = ?req.context,
            files = ?req.files.keys().collect::<Vec<_>>(),
            "Received context and files"
        );

        let intent = self.intents.resolve(req);
        let kind = intent.kind();
        tracing::debug!(intent = %kind, "Intent resolved");

        let response = match intent {
            Intent::ReturnApiSpec => McpResponse {
                result: SPEC_RESULT.to_string(),
                api_spec: self.api_spec.clone(),
                ..McpResponse::default()
            },
            Intent::SendGet { endpoint } => self.send_get(&endpoint).await,
            Intent::SendPost(Some(target)) => self.send_post(target).await,
            Intent::SendPost(None) => {
                tracing::warn!(prompt = %req.prompt, "POST intent without endpoint");
                McpResponse {
                    result: "POST request not sent.".to_string(),
                    error: Some(MISSING_ENDPOINT_ERROR.to_string()),
                    ..McpResponse::default()
                }
            }
            Intent::AnalyzeSpec { content } => self.analyze(&content),
            Intent::Acknowledge => McpResponse::default(),
        };

        (kind, response)
    }

    async fn send_get(&self, endpoint: &str) -> McpResponse {
        let outcome = self.client.get(endpoint, Pairs::new(), Pairs::new()).await;
        McpResponse {
            result: format!(
                "GET request to {} completed. Status: {}",
                endpoint,
                outcome.status_label()
            ),
            api_response: Some(outcome),
            ..McpResponse::default()
        }
    }

    async fn send_post(&self, target: PostTarget) -> McpResponse {
        let error = if target.body.is_invalid() {
            tracing::warn!(body = ?target.body, "Could not parse POST body, sending empty object");
            Some(INVALID_BODY_ERROR.to_string())
        } else {
            None
        };

        let headers = BTreeMap::from([(
            CONTENT_TYPE.as_str().to_string(),
            "application/json".to_string(),
        )]);
        let outcome = self
            .client
            .post(&target.endpoint, headers, RequestBody::Json(target.body.value()))
            .await;

        McpResponse {
            result: format!(
                "POST request to {} completed. Status: {}",
                target.endpoint,
                outcome.status_label()
            ),
            api_response: Some(outcome),
            error,
            ..McpResponse::default()
        }
    }

    fn analyze(&self, content: &Value) -> McpResponse {
        let file_name = self.intents.spec_file_name();
        let endpoints = content
            .as_str()
            .ok_or(SpecError::NotText)
            .and_then(ApiSpec::parse)
            .and_then(|spec| spec.endpoints());
        match endpoints {
            Ok(endpoints) => {
                tracing::info!(file = %file_name, count = endpoints.len(), "Analyzed uploaded spec");
                McpResponse {
                    result: ANALYSIS_RESULT.to_string(),
                    analysis: Some(format!(
                        "Analyzed API spec. Found endpoints: {}",
                        endpoints.join(", ")
                    )),
                    ..McpResponse::default()
                }
            }
            Err(e) => {
                tracing::warn!(file = %file_name, error = %e, "Uploaded spec could not be parsed");
                McpResponse {
                    error: Some(format!("Failed to parse {}: {}", file_name, e)),
                    ..McpResponse::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::DEFAULT_RESULT;

    const SPEC: &str = "openapi: 3.0.0\npaths:\n  /users: {}\n  /posts: {}\n";

    // Points at a port that was just released, so nothing is listening.
    fn offline_client() -> ApiClient {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        ApiClient::new(format!("http://{}", addr))
    }

    fn request(prompt: &str) -> McpRequest {
        McpRequest {
            prompt: prompt.into(),
            ..McpRequest::default()
        }
    }

    #[tokio::test]
    async fn test_default_acknowledgment() {
        let dispatcher = Dispatcher::new(offline_client(), None, "example_api.yaml");
        let (kind, response) = dispatcher.dispatch(&request("what can you do?")).await;

        assert_eq!(kind, IntentKind::Acknowledge);
        assert_eq!(response, McpResponse::default());
        assert_eq!(response.result, DEFAULT_RESULT);
    }

    #[tokio::test]
    async fn test_returns_preloaded_spec_verbatim() {
        let spec = ApiSpec::parse(SPEC).unwrap();
        let expected = spec.to_json();
        let dispatcher = Dispatcher::new(offline_client(), Some(spec), "example_api.yaml");

        let (kind, response) = dispatcher.dispatch(&request("Please GET_API_SPEC")).await;
        assert_eq!(kind, IntentKind::ReturnApiSpec);
        assert_eq!(response.result, SPEC_RESULT);
        assert_eq!(response.api_spec, Some(expected));
    }

    #[tokio::test]
    async fn test_empty_spec_counts_as_missing() {
        let dispatcher =
            Dispatcher::new(offline_client(), Some(ApiSpec::parse("").unwrap()), "example_api.yaml");
        assert!(!dispatcher.api_spec_loaded());

        let (kind, _) = dispatcher.dispatch(&request("get_api_spec")).await;
        assert_eq!(kind, IntentKind::Acknowledge);
    }

    #[tokio::test]
    async fn test_analyzes_uploaded_spec() {
        let dispatcher = Dispatcher::new(offline_client(), None, "example_api.yaml");
        let mut req = request("look at this");
        req.files.insert("example_api.yaml".into(), SPEC.into());

        let (kind, response) = dispatcher.dispatch(&req).await;
        assert_eq!(kind, IntentKind::AnalyzeSpec);
        assert_eq!(response.result, ANALYSIS_RESULT);
        assert_eq!(
            response.analysis.as_deref(),
            Some("Analyzed API spec. Found endpoints: /users, /posts")
        );
        assert_eq!(response.error, None);
    }

    #[tokio::test]
    async fn test_unparseable_upload_reports_error() {
        let dispatcher = Dispatcher::new(offline_client(), None, "example_api.yaml");
        let mut req = request("");
        req.files.insert("example_api.yaml".into(), "- just\n- a list\n".into());

        let (_, response) = dispatcher.dispatch(&req).await;
        assert_eq!(response.result, DEFAULT_RESULT);
        assert_eq!(response.analysis, None);
        assert_eq!(
            response.error.as_deref(),
            Some("Failed to parse example_api.yaml: document root is not a mapping")
        );
    }

    #[tokio::test]
    async fn test_non_text_upload_reports_error() {
        let dispatcher = Dispatcher::new(offline_client(), None, "example_api.yaml");
        let mut req = request("");
        req.files.insert("example_api.yaml".into(), serde_json::json!({"paths": {}}));

        let (kind, response) = dispatcher.dispatch(&req).await;
        assert_eq!(kind, IntentKind::AnalyzeSpec);
        assert_eq!(
            response.error.as_deref(),
            Some("Failed to parse example_api.yaml: file content is not text")
        );
    }

    #[tokio::test]
    async fn test_post_without_endpoint_makes_no_call() {
        let dispatcher = Dispatcher::new(offline_client(), None, "example_api.yaml");
        let (kind, response) = dispatcher.dispatch(&request("send post request")).await;

        assert_eq!(kind, IntentKind::SendPost);
        assert_eq!(response.api_response, None);
        assert_eq!(response.error.as_deref(), Some(MISSING_ENDPOINT_ERROR));
    }

    #[tokio::test]
    async fn test_get_against_dead_downstream_is_recovered() {
        let dispatcher = Dispatcher::new(offline_client(), None, "example_api.yaml");
        let (_, response) = dispatcher.dispatch(&request("send get request to /users")).await;

        assert_eq!(response.result, "GET request to /users completed. Status: N/A");
        let body = serde_json::to_value(response.api_response.unwrap()).unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Connection Error"));
        assert!(body.get("status_code").is_none());
    }
}
