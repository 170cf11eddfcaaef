//! Specification document loading and inspection.
//!
//! # Responsibilities
//! - Parse a document from text or from a file (YAML, so JSON works too)
//! - List the top-level `paths` keys in document order
//! - Render the document as JSON for the `api_spec` response field

use std::fs;
use std::path::Path;

use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::Value as YamlValue;
use thiserror::Error;

/// Errors that can occur while loading or inspecting a document.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("failed to read spec file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("document root is not a mapping")]
    NotAMapping,

    #[error("'paths' is not a mapping")]
    PathsNotAMapping,

    #[error("file content is not text")]
    NotText,
}

/// Result type for specification operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// A parsed specification document.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSpec {
    document: YamlValue,
}

impl ApiSpec {
    /// Parse a document from text, resolving `<<` merge keys.
    pub fn parse(content: &str) -> SpecResult<Self> {
        let mut document: YamlValue = serde_yaml::from_str(content)?;
        document.apply_merge()?;
        Ok(Self { document })
    }

    /// Read and parse a document from disk.
    pub fn load(path: &Path) -> SpecResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| SpecError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// True for an empty or null document.
    pub fn is_empty(&self) -> bool {
        match &self.document {
            YamlValue::Null => true,
            YamlValue::Mapping(m) => m.is_empty(),
            YamlValue::Sequence(s) => s.is_empty(),
            YamlValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Top-level keys of the `paths` mapping, in document order.
    ///
    /// A document without `paths` has no endpoints.
    pub fn endpoints(&self) -> SpecResult<Vec<String>> {
        let root = self.document.as_mapping().ok_or(SpecError::NotAMapping)?;
        let paths = match root.get("paths") {
            None => return Ok(Vec::new()),
            Some(paths) => paths.as_mapping().ok_or(SpecError::PathsNotAMapping)?,
        };
        Ok(paths.keys().map(key_to_string).collect())
    }

    /// The whole document as JSON.
    pub fn to_json(&self) -> JsonValue {
        yaml_to_json(&self.document)
    }
}

fn yaml_to_json(value: &YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null)
            }
        }
        YamlValue::String(s) => JsonValue::String(s.clone()),
        YamlValue::Sequence(items) => JsonValue::Array(items.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                map.insert(key_to_string(k), yaml_to_json(v));
            }
            JsonValue::Object(map)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

// OpenAPI uses non-string keys such as `200:` under `responses`.
fn key_to_string(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PETSTORE: &str = r#"
openapi: 3.0.0
info:
  title: Users
  version: "1.0"
paths:
  /users:
    get:
      responses:
        200:
          description: ok
  /users/{id}:
    delete:
      responses:
        '204':
          description: gone
  /admin:
    get: {}
"#;

    #[test]
    fn test_endpoints_in_document_order() {
        let spec = ApiSpec::parse(PETSTORE).unwrap();
        assert_eq!(
            spec.endpoints().unwrap(),
            vec!["/users", "/users/{id}", "/admin"]
        );
    }

    #[test]
    fn test_json_document_is_accepted() {
        let spec = ApiSpec::parse(r#"{"paths": {"/b": {}, "/a": {}}}"#).unwrap();
        assert_eq!(spec.endpoints().unwrap(), vec!["/b", "/a"]);
    }

    #[test]
    fn test_missing_paths_yields_no_endpoints() {
        let spec = ApiSpec::parse("openapi: 3.0.0\n").unwrap();
        assert!(spec.endpoints().unwrap().is_empty());
    }

    #[test]
    fn test_non_mapping_documents_are_rejected() {
        let scalar = ApiSpec::parse("just text").unwrap();
        assert!(matches!(scalar.endpoints(), Err(SpecError::NotAMapping)));

        let bad_paths = ApiSpec::parse("paths:\n  - /users\n").unwrap();
        assert!(matches!(bad_paths.endpoints(), Err(SpecError::PathsNotAMapping)));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = ApiSpec::parse("paths: {unclosed").unwrap_err();
        assert!(matches!(err, SpecError::Parse(_)));
    }

    #[test]
    fn test_to_json_preserves_content() {
        let spec = ApiSpec::parse(PETSTORE).unwrap();
        let doc = spec.to_json();
        assert_eq!(doc["openapi"], "3.0.0");
        assert_eq!(doc["info"]["version"], "1.0");
        assert_eq!(
            doc["paths"]["/users"]["get"]["responses"]["200"],
            json!({"description": "ok"})
        );
        let keys: Vec<&String> = doc["paths"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["/users", "/users/{id}", "/admin"]);
    }

    #[test]
    fn test_merge_keys_are_resolved() {
        let spec = ApiSpec::parse(
            "base: &b {x: 1}\npaths:\n  /a:\n    <<: *b\n    y: 2\n",
        )
        .unwrap();
        assert_eq!(spec.to_json()["paths"], json!({"/a": {"x": 1, "y": 2}}));
        assert_eq!(spec.endpoints().unwrap(), vec!["/a"]);
    }

    #[test]
    fn test_non_string_path_keys_are_listed() {
        let spec = ApiSpec::parse("paths:\n  1: {}\n  /b: {}\n").unwrap();
        assert_eq!(spec.endpoints().unwrap(), vec!["1", "/b"]);
    }

    #[test]
    fn test_emptiness() {
        assert!(ApiSpec::parse("").unwrap().is_empty());
        assert!(ApiSpec::parse("{}").unwrap().is_empty());
        assert!(!ApiSpec::parse(PETSTORE).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ApiSpec::load(Path::new("/no/such/spec.yaml")).unwrap_err();
        assert!(matches!(err, SpecError::Read { .. }));
        assert!(err.to_string().contains("/no/such/spec.yaml"));
    }
}
