//! Presentational output tree produced by the renderer.
//!
//! The tree is small: elements with ordered attributes, escaped
//! text, trusted markup, and transparent fragments. Child identity is the
//! child's index within its parent, which keeps serialisation stable across
//! runs.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    Element(Element),
    /// Plain text, escaped when serialised.
    Text(String),
    /// Trusted markup emitted verbatim.
    Markup(String),
    /// Children rendered in place without a wrapper.
    Fragment(Vec<RenderNode>),
}

impl RenderNode {
    pub fn text(value: impl Into<String>) -> Self {
        RenderNode::Text(value.into())
    }

    /// Serialise the tree into an HTML string.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html);
        html
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            RenderNode::Element(element) => element.write_html(out),
            RenderNode::Text(text) => escape_text_into(text, out),
            RenderNode::Markup(markup) => out.push_str(markup),
            RenderNode::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            RenderNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for RenderNode {
    fn from(element: Element) -> Self {
        RenderNode::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<RenderNode>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<RenderNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RenderNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_void(&self) -> bool {
        matches!(self.tag, "br" | "hr" | "img")
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
        }
        out.push('>');

        if self.is_void() {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn escape_text_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_nested_elements_in_order() {
        let tree = Element::new("p")
            .attr("class", "doc-paragraph")
            .child(RenderNode::text("a < b & c"))
            .child(Element::new("br"))
            .child(Element::new("em").child(RenderNode::text("d")));

        assert_eq!(
            RenderNode::from(tree).to_html(),
            "<p class=\"doc-paragraph\">a &lt; b &amp; c<br><em>d</em></p>"
        );
    }

    #[test]
    fn escapes_attribute_values() {
        let link = Element::new("a").attr("href", "https://x/?a=1&b=\"2\"");
        assert_eq!(
            RenderNode::from(link).to_html(),
            "<a href=\"https://x/?a=1&amp;b=&quot;2&quot;\"></a>"
        );
    }

    #[test]
    fn markup_and_fragments_pass_through() {
        let tree = RenderNode::Fragment(vec![
            RenderNode::Markup("<b>raw</b>".into()),
            RenderNode::text("!"),
        ]);
        assert_eq!(tree.to_html(), "<b>raw</b>!");
    }
}
