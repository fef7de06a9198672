use tracing::debug;

use crate::application::render::tree::{Element, RenderNode};
use crate::domain::document::{Attrs, Mark, MarkKind};

const DEFAULT_HREF: &str = "#";
const DEFAULT_LINK_TARGET: &str = "_blank";
const LINK_REL: &str = "noopener noreferrer";

/// Wrap a text run in its marks.
///
/// Marks are folded in authored order: the first mark becomes the innermost
/// wrapper and every following mark wraps the previous result. Unsupported
/// mark kinds contribute no wrapper. Repeated marks are applied repeatedly.
pub(crate) fn compose(text: &str, marks: &[Mark]) -> RenderNode {
    marks.iter().fold(RenderNode::text(text), wrap)
}

fn wrap(inner: RenderNode, mark: &Mark) -> RenderNode {
    let wrapper = match &mark.kind {
        MarkKind::Bold => Element::new("strong"),
        MarkKind::Italic => Element::new("em"),
        MarkKind::Code => Element::new("code").attr("class", "doc-inline-code"),
        MarkKind::Link => link(&mark.attrs),
        MarkKind::Strike => Element::new("s"),
        MarkKind::Underline => Element::new("u"),
        MarkKind::Other(kind) => {
            debug!(
                target = "application::render::marks",
                mark = kind.as_str(),
                "ignoring unsupported mark"
            );
            return inner;
        }
    };

    wrapper.child(inner).into()
}

fn link(attrs: &Attrs) -> Element {
    let href = match attrs.get_str("href") {
        Some(href) if !is_unsafe_href(href) => href,
        Some(href) => {
            debug!(
                target = "application::render::marks",
                href, "replacing unsafe link target"
            );
            DEFAULT_HREF
        }
        None => DEFAULT_HREF,
    };
    let target = attrs.get_str("target").unwrap_or(DEFAULT_LINK_TARGET);

    Element::new("a")
        .attr("class", "doc-link")
        .attr("href", href)
        .attr("target", target)
        .attr("rel", LINK_REL)
}

fn is_unsafe_href(href: &str) -> bool {
    let normalized: String = href
        .chars()
        .filter(|ch| !ch.is_whitespace() && !ch.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    normalized.starts_with("javascript:")
        || normalized.starts_with("vbscript:")
        || normalized.starts_with("data:")
}
