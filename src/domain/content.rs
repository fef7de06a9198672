//! Raw content as supplied by callers, before format detection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content handed to the renderer.
///
/// Mirrors what a backend typically stores for a rich-text field: either an
/// already-decoded document object, a string (JSON-encoded document or
/// legacy HTML), or nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<Value>", into = "Option<Value>")]
pub enum RawContent {
    /// Object-shaped input, treated as a structured document candidate.
    Structured(Value),
    /// String-shaped input: JSON-encoded document or legacy markup.
    Text(String),
    #[default]
    Missing,
}

impl From<Value> for RawContent {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawContent::Missing,
            Value::String(text) => RawContent::Text(text),
            Value::Bool(_) | Value::Number(_) => RawContent::Text(value.to_string()),
            structured @ (Value::Object(_) | Value::Array(_)) => RawContent::Structured(structured),
        }
    }
}

impl From<Option<Value>> for RawContent {
    fn from(value: Option<Value>) -> Self {
        value.map(RawContent::from).unwrap_or_default()
    }
}

impl From<RawContent> for Option<Value> {
    fn from(content: RawContent) -> Self {
        match content {
            RawContent::Structured(value) => Some(value),
            RawContent::Text(text) => Some(Value::String(text)),
            RawContent::Missing => None,
        }
    }
}

impl From<String> for RawContent {
    fn from(text: String) -> Self {
        RawContent::Text(text)
    }
}

impl From<&str> for RawContent {
    fn from(text: &str) -> Self {
        RawContent::Text(text.to_string())
    }
}
