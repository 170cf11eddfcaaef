//! Endpoint and body extraction from prompt text.
//!
//! Segmentation is literal string splitting on `"to "` and `" with body"`.
//! Endpoints containing `"to "` or bodies containing `" with body"` split in
//! the wrong place; that behaviour is kept as-is.

use serde_json::{Map, Value};

const TO_MARKER: &str = "to ";
const BODY_MARKER: &str = " with body";

/// Target of a GET intent: the text after the last `"to "`, trimmed.
///
/// Without any `"to "` the whole prompt is used.
pub fn get_endpoint(prompt: &str) -> String {
    prompt
        .rsplit(TO_MARKER)
        .next()
        .unwrap_or(prompt)
        .trim()
        .to_string()
}

/// Parsed target of a POST intent.
#[derive(Debug, Clone, PartialEq)]
pub struct PostTarget {
    pub endpoint: String,
    pub body: PostBody,
}

/// JSON body of a POST intent.
#[derive(Debug, Clone, PartialEq)]
pub enum PostBody {
    Parsed(Value),
    /// The body text was not JSON even after quote normalization.
    Invalid { raw: String },
}

impl PostBody {
    /// The value to send: the parsed body, or an empty object.
    pub fn value(&self) -> Value {
        match self {
            PostBody::Parsed(value) => value.clone(),
            PostBody::Invalid { .. } => Value::Object(Map::new()),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, PostBody::Invalid { .. })
    }
}

/// Split a POST prompt into endpoint and body.
///
/// The remainder is the segment between the first and second `"to "`. Returns
/// `None` when the prompt has no `"to "` at all.
pub fn post_target(prompt: &str) -> Option<PostTarget> {
    let remainder = prompt.split(TO_MARKER).nth(1)?;

    let endpoint = remainder
        .split(BODY_MARKER)
        .next()
        .unwrap_or(remainder)
        .trim()
        .to_string();

    let body_text = match remainder.split_once(BODY_MARKER) {
        Some((_, after)) => after.trim(),
        None => "{}",
    };

    Some(PostTarget {
        endpoint,
        body: parse_body(body_text),
    })
}

/// Naive single-to-double quote conversion, then JSON parsing.
fn parse_body(text: &str) -> PostBody {
    match serde_json::from_str(&text.replace('\'', "\"")) {
        Ok(value) => PostBody::Parsed(value),
        Err(_) => PostBody::Invalid {
            raw: text.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_endpoint_uses_last_marker() {
        assert_eq!(get_endpoint("send get request to /users"), "/users");
        assert_eq!(get_endpoint("go to the page and send get request to  /posts/1 "), "/posts/1");
        assert_eq!(get_endpoint("send get request"), "send get request");
    }

    #[test]
    fn test_get_endpoint_keeps_original_case() {
        assert_eq!(get_endpoint("SEND GET REQUEST to /Users/ABC"), "/Users/ABC");
    }

    #[test]
    fn test_post_target_with_single_quoted_body() {
        let target = post_target("send post request to /users with body {'name': 'John'}").unwrap();
        assert_eq!(target.endpoint, "/users");
        assert_eq!(target.body, PostBody::Parsed(json!({"name": "John"})));
    }

    #[test]
    fn test_post_target_without_body_marker() {
        let target = post_target("send post request to /users").unwrap();
        assert_eq!(target.endpoint, "/users");
        assert_eq!(target.body.value(), json!({}));
        assert!(!target.body.is_invalid());
    }

    #[test]
    fn test_post_target_invalid_body() {
        let target = post_target("send post request to /users with body not-json").unwrap();
        assert_eq!(target.endpoint, "/users");
        assert!(target.body.is_invalid());
        assert_eq!(target.body.value(), json!({}));
    }

    #[test]
    fn test_post_target_empty_body_is_invalid() {
        let target = post_target("send post request to /users with body").unwrap();
        assert!(target.body.is_invalid());
    }

    #[test]
    fn test_post_target_truncates_at_second_marker() {
        // "to " inside the body ends the remainder.
        let target =
            post_target("send post request to /notes with body {'text': 'go to bed'}").unwrap();
        assert_eq!(target.endpoint, "/notes");
        assert_eq!(
            target.body,
            PostBody::Invalid {
                raw: "{'text': 'go".into()
            }
        );
    }

    #[test]
    fn test_post_target_requires_marker() {
        assert_eq!(post_target("send post request"), None);
    }
}
