//! Decoded response bodies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CliError;

/// Pagination block of an Outline response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// A successful response. The body is kept verbatim, key order included, so
/// JSON output is exactly what the server sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    /// Always a JSON object.
    body: Value,
}

impl ResultEnvelope {
    /// Decode a 2xx body. The top level must be an object whose `data` is an
    /// object or an array; a body with `success: true` and no `data` is also
    /// accepted (some mutations answer that way).
    pub fn from_body(text: &str) -> Result<Self, CliError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| CliError::unknown_api(None, format!("malformed response: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, CliError> {
        let Value::Object(body) = value else {
            return Err(CliError::unknown_api(
                None,
                "malformed response: expected a JSON object",
            ));
        };
        match body.get("data") {
            Some(Value::Object(_) | Value::Array(_)) => Ok(ResultEnvelope {
                body: Value::Object(body),
            }),
            None if body.get("success") == Some(&Value::Bool(true)) => Ok(ResultEnvelope {
                body: Value::Object(body),
            }),
            None => Err(CliError::unknown_api(
                None,
                "malformed response: missing `data`",
            )),
            Some(other) => Err(CliError::unknown_api(
                None,
                format!(
                    "malformed response: `data` is {}, expected an object or array",
                    kind_of(other)
                ),
            )),
        }
    }

    /// Envelope for an `--all` result: every page's items plus one
    /// pagination block describing the whole set.
    pub fn collected(data: Value, info: PageInfo) -> Self {
        let mut body = Map::new();
        body.insert("data".to_string(), data);
        if let Ok(pagination) = serde_json::to_value(info) {
            body.insert("pagination".to_string(), pagination);
        }
        ResultEnvelope {
            body: Value::Object(body),
        }
    }

    /// Envelope for a 3xx answer from a redirect-style endpoint.
    pub fn redirect(location: &str) -> Self {
        let mut data = Map::new();
        data.insert("url".to_string(), Value::String(location.to_string()));
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(true));
        body.insert("location".to_string(), Value::String(location.to_string()));
        body.insert("data".to_string(), Value::Object(data));
        ResultEnvelope {
            body: Value::Object(body),
        }
    }

    /// The `data` field, or the whole body for bare acknowledgements.
    pub fn data(&self) -> &Value {
        self.body.get("data").unwrap_or(&self.body)
    }

    /// Lenient: a missing or oddly shaped block yields `None`.
    pub fn pagination(&self) -> Option<PageInfo> {
        self.body
            .get("pagination")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
