use std::{borrow::Cow, collections::HashSet};

use ammonia::Builder as AmmoniaBuilder;

/// Allow-list sanitiser for legacy markup, used only when trusted rendering
/// of legacy content is switched off.
pub(crate) fn build_legacy_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "abbr",
        "b",
        "blockquote",
        "br",
        "code",
        "del",
        "div",
        "em",
        "figcaption",
        "figure",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "i",
        "img",
        "li",
        "mark",
        "ol",
        "p",
        "pre",
        "s",
        "span",
        "strong",
        "sub",
        "sup",
        "table",
        "tbody",
        "td",
        "th",
        "thead",
        "tr",
        "u",
        "ul",
    ]);
    builder.tags(tags);

    let generic: HashSet<&'static str> =
        HashSet::from(["class", "id", "title", "lang", "dir", "style"]);
    builder.generic_attributes(generic);

    builder.add_tag_attributes("a", &["target"]);
    builder.add_tag_attributes(
        "img",
        &["title", "width", "height", "alt", "loading", "decoding"],
    );
    builder.add_tag_attributes("ol", &["start"]);
    builder.add_tag_attributes("pre", &["data-language"]);
    builder.add_tag_attributes("th", &["align", "colspan", "rowspan", "scope"]);
    builder.add_tag_attributes("td", &["align", "colspan", "rowspan"]);

    builder.add_url_schemes(["http", "https", "mailto", "tel"].iter().copied());

    builder.attribute_filter(|_element, attribute, value| {
        if attribute.eq_ignore_ascii_case("style") {
            sanitize_style_attribute(value).map(Cow::Owned)
        } else {
            Some(Cow::Borrowed(value))
        }
    });

    builder
}

fn sanitize_style_attribute(value: &str) -> Option<String> {
    let sanitized: Vec<&str> = value
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty() && is_safe_style_declaration(decl))
        .collect();

    (!sanitized.is_empty()).then(|| sanitized.join("; "))
}

fn is_safe_style_declaration(decl: &str) -> bool {
    const FORBIDDEN_SUBSTRINGS: [&str; 8] = [
        "expression(",
        "javascript:",
        "vbscript:",
        "-moz-binding",
        "behavior:",
        "behaviour:",
        "@import",
        "url(",
    ];

    let lower = decl.to_ascii_lowercase();
    !FORBIDDEN_SUBSTRINGS
        .iter()
        .any(|needle| lower.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_editor_formatting() {
        let html = build_legacy_sanitizer()
            .clean("<p style=\"text-align: center\"><strong>Bold</strong> <u>under</u></p>")
            .to_string();
        assert_eq!(
            html,
            "<p style=\"text-align: center\"><strong>Bold</strong> <u>under</u></p>"
        );
    }

    #[test]
    fn drops_scripts_and_handlers() {
        let html = build_legacy_sanitizer()
            .clean("<p onclick=\"steal()\">Hi</p><script>alert(1)</script>")
            .to_string();
        assert_eq!(html, "<p>Hi</p>");
    }

    #[test]
    fn style_filter_drops_unsafe_declarations() {
        assert_eq!(
            sanitize_style_attribute("color: red; background: url('javascript:alert(1)');")
                .as_deref(),
            Some("color: red")
        );
        assert!(sanitize_style_attribute("width: expression(alert(1))").is_none());
    }
}
