mod assets;
mod config;
mod container;
mod detect;
mod length;
mod marks;
mod nodes;

use std::{num::NonZeroUsize, sync::Arc};

use metrics::counter;
use once_cell::sync::{Lazy, OnceCell};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::application::render::tree::RenderNode;
use crate::application::render::types::{
    ContentLength, RenderError, RenderOutcome, RenderOutput, RenderRequest, RenderService,
};
use crate::domain::content::RawContent;

pub use assets::AssetOrigin;
pub use detect::{ContentFormat, detect};

use config::build_legacy_sanitizer;
use length::DEFAULT_LONG_CONTENT_THRESHOLD;
use nodes::{TreeRenderer, decode_document};

const DEFAULT_MAX_DEPTH: usize = 128;

/// Settings for the rendering pipeline, injected by the embedding program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPipelineConfig {
    /// Origin prepended to relative image sources. `None` leaves them as-is.
    pub asset_origin: Option<AssetOrigin>,
    /// Deepest node level rendered. Also bounds how deeply nested a raw
    /// value may be before it is decoded at all.
    pub max_depth: NonZeroUsize,
    pub long_content_threshold: usize,
    /// Run legacy markup through the allow-list sanitiser instead of
    /// embedding it verbatim.
    pub sanitize_legacy_markup: bool,
}

impl Default for RenderPipelineConfig {
    fn default() -> Self {
        Self {
            asset_origin: None,
            max_depth: NonZeroUsize::new(DEFAULT_MAX_DEPTH).unwrap_or(NonZeroUsize::MIN),
            long_content_threshold: DEFAULT_LONG_CONTENT_THRESHOLD,
            sanitize_legacy_markup: false,
        }
    }
}

/// Document renderer: format detection, tree rendering, length analysis and
/// presentation, with a single recovery boundary at the root.
pub struct DocumentRenderService {
    config: RenderPipelineConfig,
    legacy_sanitizer: Option<ammonia::Builder<'static>>,
}

impl DocumentRenderService {
    pub fn new(config: RenderPipelineConfig) -> Self {
        let legacy_sanitizer = config
            .sanitize_legacy_markup
            .then(build_legacy_sanitizer);
        Self {
            config,
            legacy_sanitizer,
        }
    }

    pub fn config(&self) -> &RenderPipelineConfig {
        &self.config
    }

    /// Render the body for `content` without the outer container.
    pub fn render_body(&self, content: &RawContent) -> (RenderNode, RenderOutcome) {
        match detect(content) {
            ContentFormat::Empty => (container::empty_placeholder(), RenderOutcome::Empty),
            ContentFormat::Markup(markup) => (self.legacy_markup(markup), RenderOutcome::Markup),
            ContentFormat::Overnested(_) => {
                let err = RenderError::DepthExceeded {
                    limit: self.config.max_depth.get(),
                };
                (self.recover(content, None, &err), RenderOutcome::Fallback)
            }
            ContentFormat::Document(value) => match self.render_document(&value) {
                Ok(body) => (body, RenderOutcome::Document),
                Err(err) => (
                    self.recover(content, Some(value.as_ref()), &err),
                    RenderOutcome::Fallback,
                ),
            },
        }
    }

    /// Classify `content` as long or short. Independent of rendering.
    pub fn analyze(&self, content: &RawContent) -> ContentLength {
        length::analyze(
            content,
            self.config.long_content_threshold,
            self.config.max_depth.get(),
        )
    }

    fn render_document(&self, value: &Value) -> Result<RenderNode, RenderError> {
        let max_depth = self.config.max_depth.get();
        let root = decode_document(value, max_depth)?;
        TreeRenderer::new(self.config.asset_origin.as_ref(), max_depth).render(&root)
    }

    fn legacy_markup(&self, markup: &str) -> RenderNode {
        match &self.legacy_sanitizer {
            Some(sanitizer) => RenderNode::Markup(sanitizer.clean(markup).to_string()),
            None => RenderNode::Markup(markup.to_string()),
        }
    }

    fn recover(
        &self,
        content: &RawContent,
        document: Option<&Value>,
        err: &RenderError,
    ) -> RenderNode {
        // Over-deep values are not formatted: serialising them recurses.
        match document.filter(|_| !matches!(err, RenderError::DepthExceeded { .. })) {
            Some(document) => error!(
                target = "application::render",
                error = %err,
                document = %document,
                "document rendering failed; using fallback view"
            ),
            None => error!(
                target = "application::render",
                error = %err,
                "document rendering failed; using fallback view"
            ),
        }
        counter!("richdoc_render_fallback_total").increment(1);

        match content {
            RawContent::Text(original) => self.legacy_markup(original),
            _ => container::failure_notice(),
        }
    }
}

impl Default for DocumentRenderService {
    fn default() -> Self {
        Self::new(RenderPipelineConfig::default())
    }
}

impl RenderService for DocumentRenderService {
    fn render(&self, request: &RenderRequest) -> RenderOutput {
        let (body, outcome) = self.render_body(&request.content);
        let length = self.analyze(&request.content);
        counter!("richdoc_render_total", "outcome" => outcome.as_str()).increment(1);

        RenderOutput {
            root: container::present(body, &request.presentation),
            outcome,
            is_long: length.is_long,
        }
    }
}

static RENDER_SERVICE: Lazy<Arc<DocumentRenderService>> =
    Lazy::new(|| Arc::new(DocumentRenderService::new(active_render_config())));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<DocumentRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("render service already configured")]
    AlreadyConfigured,
}

static RENDER_PIPELINE_CONFIG: OnceCell<RenderPipelineConfig> = OnceCell::new();

/// Install the configuration used by [`render_service`]. Must run before the
/// shared instance is first accessed.
pub fn configure_render_service(config: RenderPipelineConfig) -> Result<(), RenderConfigError> {
    RENDER_PIPELINE_CONFIG
        .set(config)
        .map_err(|_| RenderConfigError::AlreadyConfigured)
}

fn active_render_config() -> RenderPipelineConfig {
    RENDER_PIPELINE_CONFIG.get().cloned().unwrap_or_default()
}
