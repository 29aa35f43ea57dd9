//! Boundary types shared with the HTTP transport collaborator.
//!
//! This crate does not execute requests; it defines the payload shapes so
//! the transport, the decoder, and the synthesis pass agree on one seam.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsValue;

use crate::error::Result;

/// One GraphQL request as handed to a transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub server_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<JsValue>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_headers: HashMap<String, String>,
}

impl Request {
    pub fn new(server_url: impl Into<String>, query: impl Into<String>) -> Self {
        Request {
            server_url: server_url.into(),
            operation_name: None,
            query: query.into(),
            variables: None,
            custom_headers: HashMap::new(),
        }
    }
}

/// Executes a request and returns the raw response body text. Retries,
/// authentication, and connection pooling live behind implementations of
/// this trait, never in this crate.
pub trait Transport {
    fn execute(&self, request: &Request) -> Result<String>;
}

/// The standard GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    pub data: Option<JsValue>,
    #[serde(default)]
    pub errors: Vec<ResponseError>,
}

/// One entry of the response `errors` array. Locations and extensions are
/// passed through untyped.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseError {
    pub message: String,
    #[serde(default)]
    pub path: Option<JsValue>,
    #[serde(default)]
    pub extensions: Option<JsValue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn envelope_with_errors() {
        let body = indoc! {r#"
            {
              "data": null,
              "errors": [
                { "message": "Cannot query field \"powers\" on type \"Character\"." }
              ]
            }
        "#};
        let envelope: ResponseEnvelope = serde_json::from_str(body).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.errors.len(), 1);
        assert!(envelope.errors[0].message.contains("powers"));
    }

    #[test]
    fn request_serialization_skips_empty_extras() {
        let request = Request::new("https://example.com/graphql", "{ hero { name } }");
        let serialized = serde_json::to_value(&request).unwrap();
        assert_eq!(serialized["query"], "{ hero { name } }");
        assert!(serialized.get("operationName").is_none());
        assert!(serialized.get("variables").is_none());
    }
}
