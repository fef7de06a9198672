//! Structured rich-text document model.
//!
//! Documents arrive as JSON trees of typed nodes in the shape produced by
//! ProseMirror-style editors: `{ type, attrs?, content?, text?, marks? }`.
//! Node and mark kinds form a closed vocabulary with an explicit catch-all
//! variant, so unknown kinds decode successfully and can be handled by the
//! renderer's fallback path instead of failing the whole document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::error::DomainError;

/// Discriminant of a document node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Doc,
    Paragraph,
    Heading,
    Text,
    Image,
    BulletList,
    OrderedList,
    ListItem,
    Blockquote,
    CodeBlock,
    HardBreak,
    HorizontalRule,
    /// Any node type outside the known vocabulary, carrying the raw tag.
    Unknown(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Text => "text",
            NodeKind::Image => "image",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::Blockquote => "blockquote",
            NodeKind::CodeBlock => "codeBlock",
            NodeKind::HardBreak => "hardBreak",
            NodeKind::HorizontalRule => "horizontalRule",
            NodeKind::Unknown(other) => other.as_str(),
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "doc" => NodeKind::Doc,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "text" => NodeKind::Text,
            "image" => NodeKind::Image,
            "bulletList" => NodeKind::BulletList,
            "orderedList" => NodeKind::OrderedList,
            "listItem" => NodeKind::ListItem,
            "blockquote" => NodeKind::Blockquote,
            "codeBlock" => NodeKind::CodeBlock,
            "hardBreak" => NodeKind::HardBreak,
            "horizontalRule" => NodeKind::HorizontalRule,
            _ => NodeKind::Unknown(value),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Unknown(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// Discriminant of a formatting mark.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarkKind {
    Bold,
    Italic,
    Code,
    Link,
    Strike,
    Underline,
    Other(String),
}

impl MarkKind {
    pub fn as_str(&self) -> &str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Code => "code",
            MarkKind::Link => "link",
            MarkKind::Strike => "strike",
            MarkKind::Underline => "underline",
            MarkKind::Other(other) => other.as_str(),
        }
    }
}

impl From<String> for MarkKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bold" => MarkKind::Bold,
            "italic" => MarkKind::Italic,
            "code" => MarkKind::Code,
            "link" => MarkKind::Link,
            "strike" => MarkKind::Strike,
            "underline" => MarkKind::Underline,
            _ => MarkKind::Other(value),
        }
    }
}

impl From<MarkKind> for String {
    fn from(kind: MarkKind) -> Self {
        match kind {
            MarkKind::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// Loosely-typed attribute bag attached to nodes and marks.
///
/// Authoring tools are inconsistent about attribute types (`"2"` vs `2`,
/// `null` vs absent), so the accessors normalise those differences and
/// return `None` for anything unusable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attrs(Map<String, Value>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// Returns the trimmed string value for `key`, skipping blank strings.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::String(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Returns an integer attribute, accepting JSON numbers and numeric strings.
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns a dimension attribute (`width`/`height`) as its textual form.
    pub fn get_dimension(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::Number(number) => Some(number.to_string()),
            Value::String(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Formatting annotation on a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            attrs: Attrs::default(),
        }
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }
}

/// One node of a document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attrs: Attrs,
    /// Child nodes in document order; `None` when the node carries no
    /// `content` key at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub marks: Vec<Mark>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: Attrs::default(),
            content: None,
            text: None,
            marks: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(NodeKind::Text)
        }
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_content(mut self, content: Vec<Node>) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = marks;
        self
    }

    /// Decode a node tree from an already-parsed JSON value.
    ///
    /// Decoding recurses per level; check [`nesting_depth`] first for untrusted input.
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        Node::deserialize(value).map_err(|err| DomainError::decode(err.to_string()))
    }

    /// Children in document order; empty when the node has no `content`.
    pub fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or_default()
    }

    /// Concatenate the text of every descendant text node, joining siblings
    /// with a single space. Structural nodes, attributes and marks contribute
    /// nothing of their own.
    pub fn plain_text(&self) -> String {
        if self.kind == NodeKind::Text {
            return self.text.clone().unwrap_or_default();
        }

        self.children()
            .iter()
            .map(Node::plain_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Deepest array/object nesting in `value`, counted the way the JSON parser
/// counts it: a scalar root is 0, an object root is 1.
///
/// Walks with an explicit stack so arbitrarily deep input cannot exhaust the
/// call stack. Run it before decoding or formatting untrusted values.
pub fn nesting_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(value, 1usize)];

    while let Some((value, depth)) = pending.pop() {
        match value {
            Value::Array(items) => {
                deepest = deepest.max(depth);
                pending.extend(items.iter().map(|item| (item, depth + 1)));
            }
            Value::Object(fields) => {
                deepest = deepest.max(depth);
                pending.extend(fields.values().map(|field| (field, depth + 1)));
            }
            _ => {}
        }
    }

    deepest
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_known_and_unknown_kinds() {
        let value = json!({
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "hi" }] },
                { "type": "customBlock" }
            ]
        });

        let node = Node::from_value(&value).expect("valid document");
        assert_eq!(node.kind, NodeKind::Doc);
        assert_eq!(node.children()[0].kind, NodeKind::Paragraph);
        assert_eq!(
            node.children()[1].kind,
            NodeKind::Unknown("customBlock".to_string())
        );
        assert!(node.children()[1].content.is_none());
    }

    #[test]
    fn null_attrs_and_marks_decode_as_empty() {
        let value = json!({ "type": "text", "text": "x", "attrs": null, "marks": null });
        let node = Node::from_value(&value).expect("valid node");
        assert!(node.attrs.is_empty());
        assert!(node.marks.is_empty());
    }

    #[test]
    fn missing_type_is_a_decode_error() {
        let value = json!({ "content": [] });
        assert!(matches!(
            Node::from_value(&value),
            Err(DomainError::Decode { .. })
        ));
    }

    #[test]
    fn attribute_accessors_normalise_types() {
        let attrs = Attrs::new()
            .with("level", "3")
            .with("start", 5)
            .with("width", 640)
            .with("blank", "   ")
            .with("nothing", Value::Null);

        assert_eq!(attrs.get_integer("level"), Some(3));
        assert_eq!(attrs.get_integer("start"), Some(5));
        assert_eq!(attrs.get_dimension("width").as_deref(), Some("640"));
        assert_eq!(attrs.get_str("blank"), None);
        assert!(attrs.get("nothing").is_none());
    }

    #[test]
    fn plain_text_joins_siblings_with_spaces() {
        let doc = Node::new(NodeKind::Doc).with_content(vec![
            Node::new(NodeKind::Paragraph)
                .with_content(vec![Node::text("Hello"), Node::text("world")]),
            Node::new(NodeKind::HorizontalRule),
            Node::new(NodeKind::Paragraph).with_content(vec![Node::text("again")]),
        ]);

        assert_eq!(doc.plain_text(), "Hello world again");
    }

    #[test]
    fn structural_leaves_add_no_separators() {
        let paragraph = Node::new(NodeKind::Paragraph).with_content(vec![
            Node::text("Note"),
            Node::new(NodeKind::HardBreak),
            Node::new(NodeKind::Image),
            Node::text("line two"),
        ]);

        assert_eq!(paragraph.plain_text(), "Note line two");
    }

    #[test]
    fn nesting_depth_counts_containers() {
        assert_eq!(nesting_depth(&json!("text")), 0);
        assert_eq!(nesting_depth(&json!({})), 1);
        assert_eq!(
            nesting_depth(&json!({ "type": "doc", "content": [{ "type": "paragraph" }] })),
            3
        );
        assert_eq!(nesting_depth(&json!({ "a": 1, "b": [[], [[1]]] })), 4);
    }

    #[test]
    fn nesting_depth_handles_very_deep_values() {
        let mut value = Value::Null;
        for _ in 0..100_000 {
            value = Value::Array(vec![value]);
        }

        assert_eq!(nesting_depth(&value), 100_000);

        // Unwind by hand; dropping the chain recursively would overflow.
        while let Value::Array(mut items) = value {
            value = items.pop().unwrap_or(Value::Null);
        }
    }

    #[test]
    fn kinds_round_trip_through_strings() {
        assert_eq!(String::from(NodeKind::BulletList), "bulletList");
        assert_eq!(
            NodeKind::from("table".to_string()),
            NodeKind::Unknown("table".into())
        );
        assert_eq!(MarkKind::from("strike".to_string()), MarkKind::Strike);
    }
}
