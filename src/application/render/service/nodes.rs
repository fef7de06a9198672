use metrics::counter;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::render::tree::{Element, RenderNode};
use crate::application::render::types::RenderError;
use crate::domain::document::{Node, NodeKind, nesting_depth};

use super::assets::{AssetOrigin, resolve_src};
use super::marks;

pub(crate) const DEFAULT_HEADING_LEVEL: u8 = 1;
const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];
const TEXT_ALIGNMENTS: [&str; 4] = ["left", "center", "right", "justify"];
const DEFAULT_IMAGE_STYLE: &str = "max-width: 100%; height: auto;";

/// Decode a document tree, rejecting values nested past what `max_depth`
/// node levels can produce.
///
/// Decoding and text extraction recurse, so the check runs on the raw value
/// first. A node at depth `n` sits at JSON nesting `2n + 1`; its marks and
/// their attributes add up to three more levels.
pub(crate) fn decode_document(value: &Value, max_depth: usize) -> Result<Node, RenderError> {
    let limit = max_depth.saturating_mul(2).saturating_add(4);
    if nesting_depth(value) > limit {
        return Err(RenderError::DepthExceeded { limit: max_depth });
    }

    Ok(Node::from_value(value)?)
}

/// Where a node sits relative to its parent, for parent-sensitive styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Flow,
    /// Direct child of a list item.
    ListItem,
}

/// Depth-first, pre-order renderer over a decoded document tree.
pub(crate) struct TreeRenderer<'a> {
    asset_origin: Option<&'a AssetOrigin>,
    max_depth: usize,
}

impl<'a> TreeRenderer<'a> {
    pub(crate) fn new(asset_origin: Option<&'a AssetOrigin>, max_depth: usize) -> Self {
        Self {
            asset_origin,
            max_depth,
        }
    }

    pub(crate) fn render(&self, root: &Node) -> Result<RenderNode, RenderError> {
        let mut out = Vec::new();
        self.render_node(root, 0, Placement::Flow, &mut out)?;
        Ok(RenderNode::Fragment(out))
    }

    fn render_node(
        &self,
        node: &Node,
        depth: usize,
        placement: Placement,
        out: &mut Vec<RenderNode>,
    ) -> Result<(), RenderError> {
        if depth > self.max_depth {
            return Err(RenderError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        match &node.kind {
            NodeKind::Doc => self.render_children(node, depth, out)?,
            NodeKind::Paragraph => out.push(self.paragraph(node, depth, placement)?),
            NodeKind::Heading => out.push(self.heading(node, depth)?),
            NodeKind::Text => out.push(marks::compose(
                node.text.as_deref().unwrap_or_default(),
                &node.marks,
            )),
            NodeKind::Image => {
                if let Some(figure) = self.image(node) {
                    out.push(figure);
                }
            }
            NodeKind::BulletList => out.push(self.container(
                Element::new("ul").attr("class", "doc-list doc-list--bullet"),
                node,
                depth,
            )?),
            NodeKind::OrderedList => out.push(self.ordered_list(node, depth)?),
            NodeKind::ListItem => out.push(self.list_item(node, depth)?),
            NodeKind::Blockquote => out.push(self.container(
                Element::new("blockquote").attr("class", "doc-blockquote"),
                node,
                depth,
            )?),
            NodeKind::CodeBlock => out.push(code_block(node)),
            NodeKind::HardBreak => out.push(Element::new("br").into()),
            NodeKind::HorizontalRule => {
                out.push(Element::new("hr").attr("class", "doc-rule").into())
            }
            NodeKind::Unknown(kind) => {
                warn!(
                    target = "application::render::nodes",
                    kind = kind.as_str(),
                    has_content = node.content.is_some(),
                    "unknown document node type"
                );
                counter!("richdoc_unknown_node_total").increment(1);
                if node.content.is_some() {
                    self.render_children(node, depth, out)?;
                }
            }
        }

        Ok(())
    }

    fn render_children(
        &self,
        node: &Node,
        depth: usize,
        out: &mut Vec<RenderNode>,
    ) -> Result<(), RenderError> {
        for child in node.children() {
            self.render_node(child, depth + 1, Placement::Flow, out)?;
        }
        Ok(())
    }

    fn collect_children(&self, node: &Node, depth: usize) -> Result<Vec<RenderNode>, RenderError> {
        let mut children = Vec::with_capacity(node.children().len());
        self.render_children(node, depth, &mut children)?;
        Ok(children)
    }

    fn container(
        &self,
        element: Element,
        node: &Node,
        depth: usize,
    ) -> Result<RenderNode, RenderError> {
        Ok(element
            .with_children(self.collect_children(node, depth)?)
            .into())
    }

    fn paragraph(
        &self,
        node: &Node,
        depth: usize,
        placement: Placement,
    ) -> Result<RenderNode, RenderError> {
        let class = match placement {
            Placement::Flow => "doc-paragraph",
            Placement::ListItem => "doc-paragraph doc-paragraph--tight",
        };
        let element = with_alignment(Element::new("p").attr("class", class), node);
        self.container(element, node, depth)
    }

    fn heading(&self, node: &Node, depth: usize) -> Result<RenderNode, RenderError> {
        let level = heading_level(node);
        let tag = HEADING_TAGS[usize::from(level - 1)];
        let element = with_alignment(
            Element::new(tag).attr("class", format!("doc-heading doc-heading--{level}")),
            node,
        );
        self.container(element, node, depth)
    }

    fn ordered_list(&self, node: &Node, depth: usize) -> Result<RenderNode, RenderError> {
        let mut element = Element::new("ol").attr("class", "doc-list doc-list--ordered");
        let start = list_start(node);
        if start != 1 {
            element = element.attr("start", start.to_string());
        }
        self.container(element, node, depth)
    }

    fn list_item(&self, node: &Node, depth: usize) -> Result<RenderNode, RenderError> {
        let mut children = Vec::with_capacity(node.children().len());
        for child in node.children() {
            self.render_node(child, depth + 1, Placement::ListItem, &mut children)?;
        }
        Ok(Element::new("li")
            .attr("class", "doc-list-item")
            .with_children(children)
            .into())
    }

    fn image(&self, node: &Node) -> Option<RenderNode> {
        let Some(src) = node.attrs.get_str("src") else {
            debug!(
                target = "application::render::nodes",
                "skipping image without a source"
            );
            return None;
        };

        let alt = node.attrs.get_str("alt");
        let title = node.attrs.get_str("title");
        let width = node.attrs.get_dimension("width");
        let height = node.attrs.get_dimension("height");

        let mut img = Element::new("img")
            .attr("class", "doc-image")
            .attr("src", resolve_src(self.asset_origin, src))
            .attr("alt", alt.unwrap_or_default());
        if let Some(title) = title {
            img = img.attr("title", title);
        }
        if width.is_none() && height.is_none() {
            img = img.attr("style", DEFAULT_IMAGE_STYLE);
        }
        if let Some(width) = width {
            img = img.attr("width", width);
        }
        if let Some(height) = height {
            img = img.attr("height", height);
        }
        img = img.attr("loading", "lazy").attr("decoding", "async");

        let mut figure = Element::new("figure").attr("class", "doc-figure").child(img);
        if let Some(caption) = alt.or(title) {
            figure = figure.child(
                Element::new("figcaption")
                    .attr("class", "doc-caption")
                    .child(RenderNode::text(caption)),
            );
        }

        Some(figure.into())
    }
}

/// Resolve the heading level, falling back to the default for missing or
/// out-of-range values.
pub(crate) fn heading_level(node: &Node) -> u8 {
    match node.attrs.get_integer("level") {
        Some(level @ 1..=6) => level as u8,
        Some(other) => {
            debug!(
                target = "application::render::nodes",
                level = other,
                "heading level out of range; using default"
            );
            DEFAULT_HEADING_LEVEL
        }
        None => DEFAULT_HEADING_LEVEL,
    }
}

fn list_start(node: &Node) -> i64 {
    node.attrs
        .get_integer("start")
        .filter(|start| *start >= 1)
        .unwrap_or(1)
}

fn with_alignment(element: Element, node: &Node) -> Element {
    match node.attrs.get_str("textAlign") {
        Some(align) if TEXT_ALIGNMENTS.contains(&align) => {
            element.attr("style", format!("text-align: {align}"))
        }
        _ => element,
    }
}

fn code_block(node: &Node) -> RenderNode {
    let code: String = node
        .children()
        .iter()
        .filter(|child| child.kind == NodeKind::Text)
        .filter_map(|child| child.text.as_deref())
        .collect();

    let language = node
        .attrs
        .get_str("language")
        .map(sanitize_language)
        .filter(|language| !language.is_empty());

    let mut pre = Element::new("pre").attr("class", "doc-code-block");
    let mut code_element = Element::new("code");
    if let Some(language) = language {
        pre = pre.attr("data-language", language.clone());
        code_element = code_element.attr("class", format!("language-{language}"));
    }

    pre.child(code_element.child(RenderNode::text(code))).into()
}

fn sanitize_language(language: &str) -> String {
    language
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '#' | '.' | '-'))
        .collect::<String>()
        .to_ascii_lowercase()
}
