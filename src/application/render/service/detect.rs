use std::borrow::Cow;

use serde_json::Value;
use tracing::{debug, trace};

use crate::domain::content::RawContent;

/// Classification of raw content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentFormat<'a> {
    /// A structured document candidate (decoded lazily by the renderer).
    Document(Cow<'a, Value>),
    /// A JSON object nested deeper than the parser accepts. Rendered as a
    /// document that exceeds the depth cap.
    Overnested(&'a str),
    /// Legacy markup, embedded as-is.
    Markup(&'a str),
    Empty,
}

impl ContentFormat<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            ContentFormat::Document(_) | ContentFormat::Overnested(_) => "document",
            ContentFormat::Markup(_) => "markup",
            ContentFormat::Empty => "empty",
        }
    }
}

/// Decide how raw content should be rendered.
///
/// Strings are tried as JSON first and only count as documents when the
/// parsed root is a `doc` node. Anything else, including JSON that fails to
/// parse, is treated as markup so legacy HTML keeps rendering alongside newer
/// structured content.
pub fn detect(content: &RawContent) -> ContentFormat<'_> {
    match content {
        RawContent::Missing => ContentFormat::Empty,
        RawContent::Structured(value) => ContentFormat::Document(Cow::Borrowed(value)),
        RawContent::Text(text) if text.trim().is_empty() => ContentFormat::Empty,
        RawContent::Text(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) if is_document_root(&value) => ContentFormat::Document(Cow::Owned(value)),
            Ok(_) => ContentFormat::Markup(text),
            Err(err) if is_recursion_limit(&err) && text.trim_start().starts_with('{') => {
                debug!(
                    target = "application::render::detect",
                    error = %err,
                    "JSON content exceeds the parser nesting limit"
                );
                ContentFormat::Overnested(text)
            }
            Err(err) => {
                trace!(
                    target = "application::render::detect",
                    error = %err,
                    "content is not JSON; treating as markup"
                );
                ContentFormat::Markup(text)
            }
        },
    }
}

fn is_document_root(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("doc")
}

fn is_recursion_limit(err: &serde_json::Error) -> bool {
    err.is_syntax() && err.to_string().starts_with("recursion limit exceeded")
}
