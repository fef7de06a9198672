//! Rich-text rendering pipeline.
//!
//! The pipeline is pure: it accepts raw content (a structured document, a
//! JSON string, legacy markup, or nothing), produces a deterministic output
//! tree, and never fails. Malformed input degrades to the legacy markup path
//! or to a fallback notice; diagnostics go to the tracing subscriber.

mod service;
mod tree;
mod types;

pub use service::{
    AssetOrigin, ContentFormat, DocumentRenderService, RenderConfigError, RenderPipelineConfig,
    configure_render_service, detect, render_service,
};
pub use tree::{Element, RenderNode};
pub use types::{
    ContentLength, MaxHeight, PresentationOptions, RenderError, RenderOutcome, RenderOutput,
    RenderRequest, RenderService,
};
