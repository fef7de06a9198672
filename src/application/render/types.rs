use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::domain::{content::RawContent, error::DomainError};

use super::tree::RenderNode;

const DEFAULT_MAX_HEIGHT: &str = "480px";
const MAX_HEIGHT_UNITS: [&str; 5] = ["px", "rem", "em", "vh", "%"];

/// Height limit applied by the scroll container, restricted to a plain CSS
/// length so it can be embedded in a `style` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxHeight(String);

impl MaxHeight {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MaxHeight {
    fn default() -> Self {
        Self(DEFAULT_MAX_HEIGHT.to_string())
    }
}

impl FromStr for MaxHeight {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let unit = MAX_HEIGHT_UNITS
            .iter()
            .find(|unit| trimmed.ends_with(*unit))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "max height `{trimmed}` must end with one of px, rem, em, vh, %"
                ))
            })?;

        let number = &trimmed[..trimmed.len() - unit.len()];
        let valid_number = !number.is_empty()
            && number.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
            && number.chars().filter(|ch| *ch == '.').count() <= 1
            && number.chars().any(|ch| ch.is_ascii_digit());
        if !valid_number {
            return Err(DomainError::validation(format!(
                "max height `{trimmed}` is not a positive CSS length"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for MaxHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller-controlled presentation flags for the outer container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationOptions {
    pub enable_scroll: bool,
    pub max_height: MaxHeight,
}

impl PresentationOptions {
    pub fn scrolling(max_height: MaxHeight) -> Self {
        Self {
            enable_scroll: true,
            max_height,
        }
    }
}

/// Rendering request passed into the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderRequest {
    pub content: RawContent,
    pub presentation: PresentationOptions,
}

impl RenderRequest {
    pub fn new(content: impl Into<RawContent>) -> Self {
        Self {
            content: content.into(),
            presentation: PresentationOptions::default(),
        }
    }

    pub fn with_presentation(mut self, presentation: PresentationOptions) -> Self {
        self.presentation = presentation;
        self
    }
}

/// Which path produced the rendered body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A structured document was rendered node by node.
    Document,
    /// Legacy markup was embedded.
    Markup,
    /// No content; the placeholder was rendered.
    Empty,
    /// Rendering failed and the degraded view was produced.
    Fallback,
}

impl RenderOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderOutcome::Document => "document",
            RenderOutcome::Markup => "markup",
            RenderOutcome::Empty => "empty",
            RenderOutcome::Fallback => "fallback",
        }
    }
}

/// Plain-text length verdict for a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLength {
    /// Visible characters after trimming.
    pub characters: usize,
    pub is_long: bool,
}

/// Deterministic rendering result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Container element wrapping the rendered body.
    pub root: RenderNode,
    pub outcome: RenderOutcome,
    /// Derived from the raw content; does not influence the container.
    pub is_long: bool,
}

impl RenderOutput {
    pub fn html(&self) -> String {
        self.root.to_html()
    }
}

/// Failures inside the rendering pipeline. These never reach callers of
/// [`RenderService::render`]; they select the degraded view instead.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("document decoding failed: {message}")]
    Decode { message: String },
    #[error("document nesting exceeds the limit of {limit} levels")]
    DepthExceeded { limit: usize },
}

impl From<DomainError> for RenderError {
    fn from(err: DomainError) -> Self {
        RenderError::Decode {
            message: err.to_string(),
        }
    }
}

/// Trait exposed by the rendering pipeline. Implementations must be pure and
/// deterministic, and must always produce output.
pub trait RenderService: Send + Sync {
    fn render(&self, request: &RenderRequest) -> RenderOutput;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_height_accepts_css_lengths() {
        for value in ["480px", "30rem", "2.5em", "60vh", "100%"] {
            let parsed: MaxHeight = value.parse().expect("valid length");
            assert_eq!(parsed.as_str(), value);
        }
    }

    #[test]
    fn max_height_rejects_other_values() {
        for value in ["", "px", "10", "10pt", "1.2.3px", "10px; color: red"] {
            assert!(value.parse::<MaxHeight>().is_err(), "{value} should fail");
        }
    }
}
