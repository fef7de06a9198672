use std::{cell::RefCell, rc::Rc};

use lol_html::{RewriteStrSettings, doc_text, rewrite_str};
use tracing::{debug, warn};

use crate::application::render::types::ContentLength;
use crate::domain::content::RawContent;

use super::detect::{ContentFormat, detect};
use super::nodes::decode_document;

pub(crate) const DEFAULT_LONG_CONTENT_THRESHOLD: usize = 5000;

/// Measure the visible text of raw content and classify it as long when it
/// exceeds `threshold` characters. Documents that cannot be decoded within
/// `max_depth` node levels count as empty.
pub(crate) fn analyze(content: &RawContent, threshold: usize, max_depth: usize) -> ContentLength {
    let text = match detect(content) {
        ContentFormat::Empty | ContentFormat::Overnested(_) => String::new(),
        ContentFormat::Document(value) => match decode_document(&value, max_depth) {
            Ok(root) => root.plain_text(),
            Err(err) => {
                debug!(
                    target = "application::render::length",
                    error = %err,
                    "undecodable document counts as empty"
                );
                String::new()
            }
        },
        ContentFormat::Markup(markup) => strip_markup(markup),
    };

    let characters = text.trim().chars().count();
    ContentLength {
        characters,
        is_long: characters > threshold,
    }
}

/// Approximate the visible text of a markup string by dropping every tag.
fn strip_markup(markup: &str) -> String {
    let buffer = Rc::new(RefCell::new(String::with_capacity(markup.len())));

    let result = rewrite_str(
        markup,
        RewriteStrSettings {
            document_content_handlers: vec![doc_text!({
                let buffer = Rc::clone(&buffer);
                move |chunk| {
                    buffer.borrow_mut().push_str(chunk.as_str());
                    Ok(())
                }
            })],
            ..RewriteStrSettings::default()
        },
    );

    if let Err(err) = result {
        warn!(
            target = "application::render::length",
            error = %err,
            "markup text extraction failed; measuring raw markup"
        );
        return markup.to_string();
    }

    buffer.take()
}
