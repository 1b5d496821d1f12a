use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One datum extracted from an uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedField {
    pub field_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parsed_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

impl ParsedField {
    pub fn new(field_name: impl Into<String>, parsed_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            parsed_value: parsed_value.into(),
            confidence_score: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifier of a server-side operation holding staged results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawOperationId", into = "String")]
pub struct OperationId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOperationId {
    Number(i64),
    Text(String),
}

impl From<RawOperationId> for OperationId {
    fn from(raw: RawOperationId) -> Self {
        match raw {
            RawOperationId::Number(n) => OperationId(n.to_string()),
            RawOperationId::Text(s) => OperationId(s),
        }
    }
}

impl From<OperationId> for String {
    fn from(id: OperationId) -> Self {
        id.0
    }
}

impl OperationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a successful parse or staging response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParseResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub operation_id: Option<OperationId>,
    pub parsed_data: Vec<ParsedField>,
}

impl ParseResponse {
    pub fn from_fields(parsed_data: Vec<ParsedField>) -> Self {
        Self {
            message: None,
            operation_id: None,
            parsed_data,
        }
    }
}

/// Body of a non-2xx response. `detail` is a plain message for handled
/// failures and a list of `{loc, msg, type}` entries for rejected requests.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    detail: serde_json::Value,
}

impl ErrorBody {
    pub(crate) fn into_detail(self) -> Option<String> {
        match self.detail {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Array(items) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(s) => Some(s.clone()),
                        other => other.get("msg").and_then(|m| m.as_str()).map(str::to_string),
                    })
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
