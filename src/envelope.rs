//! Gateway wire types.
//!
//! # Responsibilities
//! - Decode the inbound invocation event (API Gateway REST proxy shape)
//! - Encode the outbound response envelope
//!
//! # Design Decisions
//! - Every mapping field tolerates both absence and JSON `null`
//! - Unknown event fields are ignored
//! - Ordered maps so serialized envelopes are deterministic

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Inbound event describing one HTTP-triggered request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvocationEnvelope {
    /// HTTP method as sent by the gateway (e.g. "GET").
    #[serde(deserialize_with = "null_as_default")]
    pub http_method: String,

    /// Request path, without the stage prefix.
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,

    /// Resource template the gateway matched (e.g. "/users/{user_id}").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(deserialize_with = "present_values")]
    pub headers: BTreeMap<String, String>,

    #[serde(deserialize_with = "present_values", skip_serializing_if = "BTreeMap::is_empty")]
    pub multi_value_headers: BTreeMap<String, Vec<String>>,

    #[serde(deserialize_with = "present_values")]
    pub query_string_parameters: BTreeMap<String, String>,

    #[serde(deserialize_with = "present_values", skip_serializing_if = "BTreeMap::is_empty")]
    pub multi_value_query_string_parameters: BTreeMap<String, Vec<String>>,

    #[serde(deserialize_with = "present_values")]
    pub path_parameters: BTreeMap<String, String>,

    /// Raw body; `None` is treated as empty.
    pub body: Option<String>,

    /// Whether `body` carries base64 rather than text.
    #[serde(deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_context: Option<GatewayContext>,
}

/// Subset of the gateway's `requestContext` block the adapter cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayContext {
    pub request_id: Option<String>,
    pub stage: Option<String>,
}

impl InvocationEnvelope {
    /// Minimal envelope with only method and path set.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_path_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Request id assigned by the gateway, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.request_id.as_deref())
    }
}

/// Outbound reply for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ResponseEnvelope {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as JSON.
    pub fn json_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// API Gateway sends `null` rather than `{}` for empty mappings.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Mapping that may itself be `null` and may hold `null` values.
/// Entries whose value is `null` are dropped.
fn present_values<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw: Option<BTreeMap<String, Option<V>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_rest_proxy_event() {
        let event = json!({
            "resource": "/users/{user_id}",
            "path": "/users/42",
            "httpMethod": "GET",
            "headers": {"Accept": "application/json"},
            "multiValueHeaders": {"Accept": ["application/json"]},
            "queryStringParameters": {"verbose": "1"},
            "pathParameters": {"user_id": "42"},
            "requestContext": {"requestId": "abc-123", "stage": "api", "accountId": "000000000000"},
            "body": null,
            "isBase64Encoded": false,
            "stageVariables": null
        });

        let envelope: InvocationEnvelope = serde_json::from_value(event).unwrap();
        assert_eq!(envelope.http_method, "GET");
        assert_eq!(envelope.path, "/users/42");
        assert_eq!(envelope.resource.as_deref(), Some("/users/{user_id}"));
        assert_eq!(envelope.path_parameters.get("user_id").map(String::as_str), Some("42"));
        assert_eq!(envelope.query_string_parameters.get("verbose").map(String::as_str), Some("1"));
        assert_eq!(envelope.request_id(), Some("abc-123"));
        assert!(envelope.body.is_none());
    }

    #[test]
    fn test_null_and_missing_mappings_default_to_empty() {
        let event = json!({
            "httpMethod": "GET",
            "path": "/",
            "headers": null,
            "queryStringParameters": null,
            "pathParameters": null,
            "multiValueQueryStringParameters": null
        });

        let envelope: InvocationEnvelope = serde_json::from_value(event).unwrap();
        assert!(envelope.headers.is_empty());
        assert!(envelope.query_string_parameters.is_empty());
        assert!(envelope.path_parameters.is_empty());
        assert!(envelope.multi_value_query_string_parameters.is_empty());

        let bare: InvocationEnvelope = serde_json::from_value(json!({})).unwrap();
        assert_eq!(bare, InvocationEnvelope::default());
    }

    #[test]
    fn test_null_method_defaults_to_empty() {
        let envelope: InvocationEnvelope =
            serde_json::from_value(json!({ "httpMethod": null, "path": "/users" })).unwrap();
        assert_eq!(envelope.http_method, "");
        assert_eq!(envelope.path, "/users");
    }

    #[test]
    fn test_null_path_defaults_to_empty() {
        let envelope: InvocationEnvelope =
            serde_json::from_value(json!({ "httpMethod": "GET", "path": null })).unwrap();
        assert_eq!(envelope.http_method, "GET");
        assert_eq!(envelope.path, "");
    }

    #[test]
    fn test_null_base64_flag_is_false() {
        let envelope: InvocationEnvelope = serde_json::from_value(json!({
            "httpMethod": "GET",
            "path": "/users",
            "isBase64Encoded": null
        }))
        .unwrap();
        assert!(!envelope.is_base64_encoded);
    }

    #[test]
    fn test_null_map_values_are_dropped() {
        let envelope: InvocationEnvelope = serde_json::from_value(json!({
            "httpMethod": "GET",
            "path": "/users",
            "headers": { "X-Opt": null, "Accept": "application/json" },
            "multiValueHeaders": { "X-Opt": null },
            "queryStringParameters": { "page": null },
            "multiValueQueryStringParameters": { "page": null, "tag": ["a"] },
            "pathParameters": { "user_id": null }
        }))
        .unwrap();
        assert_eq!(envelope.headers.len(), 1);
        assert_eq!(envelope.headers.get("Accept").map(String::as_str), Some("application/json"));
        assert!(envelope.multi_value_headers.is_empty());
        assert!(envelope.query_string_parameters.is_empty());
        assert_eq!(
            envelope.multi_value_query_string_parameters.get("tag"),
            Some(&vec!["a".to_string()])
        );
        assert!(envelope.path_parameters.is_empty());
    }

    #[test]
    fn test_response_envelope_wire_names() {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let response = ResponseEnvelope {
            status_code: 200,
            headers,
            body: "{}".to_string(),
            is_base64_encoded: false,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["headers"]["Content-Type"], "application/json");
        assert_eq!(value["body"], "{}");
        assert_eq!(value["isBase64Encoded"], false);
        assert_eq!(response.header("content-type"), Some("application/json"));
    }
}
