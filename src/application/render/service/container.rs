use crate::application::render::tree::{Element, RenderNode};
use crate::application::render::types::PresentationOptions;

const END_OF_CONTENT: &str = "End of content";
const EMPTY_PLACEHOLDER: &str = "No content available.";
const FAILURE_NOTICE: &str = "Content failed to render.";

/// Wrap a rendered body in the outer container.
///
/// With scrolling enabled the body is clamped to the configured height and
/// an end-of-content marker follows it inside the scrollable region.
/// Otherwise the body flows without a height limit.
pub(crate) fn present(body: RenderNode, options: &PresentationOptions) -> RenderNode {
    if !options.enable_scroll {
        return Element::new("div")
            .attr("class", "rich-content")
            .child(body)
            .into();
    }

    Element::new("div")
        .attr("class", "rich-content rich-content--scroll")
        .attr(
            "style",
            format!("max-height: {}; overflow-y: auto;", options.max_height),
        )
        .attr("tabindex", "0")
        .child(body)
        .child(end_marker())
        .into()
}

fn end_marker() -> Element {
    Element::new("div")
        .attr("class", "rich-content__end")
        .attr("role", "note")
        .child(RenderNode::text(END_OF_CONTENT))
}

pub(crate) fn empty_placeholder() -> RenderNode {
    Element::new("p")
        .attr("class", "rich-content__empty")
        .child(RenderNode::text(EMPTY_PLACEHOLDER))
        .into()
}

pub(crate) fn failure_notice() -> RenderNode {
    Element::new("div")
        .attr("class", "rich-content__error")
        .attr("role", "alert")
        .child(RenderNode::text(FAILURE_NOTICE))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render::types::MaxHeight;

    #[test]
    fn unscrolled_content_flows_normally() {
        let html = present(RenderNode::text("body"), &PresentationOptions::default()).to_html();
        assert_eq!(html, "<div class=\"rich-content\">body</div>");
    }

    #[test]
    fn scrolled_content_is_clamped_with_end_marker() {
        let max_height: MaxHeight = "300px".parse().expect("valid height");
        let html = present(
            RenderNode::text("body"),
            &PresentationOptions::scrolling(max_height),
        )
        .to_html();
        assert_eq!(
            html,
            "<div class=\"rich-content rich-content--scroll\" style=\"max-height: 300px; overflow-y: auto;\" tabindex=\"0\">body<div class=\"rich-content__end\" role=\"note\">End of content</div></div>"
        );
    }

    #[test]
    fn placeholders_are_marked() {
        assert_eq!(
            empty_placeholder().to_html(),
            "<p class=\"rich-content__empty\">No content available.</p>"
        );
        assert_eq!(
            failure_notice().to_html(),
            "<div class=\"rich-content__error\" role=\"alert\">Content failed to render.</div>"
        );
    }
}
