//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{num::NonZeroUsize, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::render::{
    AssetOrigin, MaxHeight, PresentationOptions, RenderPipelineConfig,
};

pub use cli::{
    AnalyzeArgs, AnalyzeOverrides, CliArgs, Command, LogOverrides, RenderArgs, RenderOverrides,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "richdoc";
const DEFAULT_MAX_DEPTH: u64 = 128;
/// Upper bound for `render.max_depth`. Decoding and rendering recurse per level.
const MAX_SUPPORTED_DEPTH: u64 = 256;
const DEFAULT_LONG_CONTENT_THRESHOLD: u64 = 5000;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub render: RenderSettings,
    pub presentation: PresentationSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub asset_origin: Option<AssetOrigin>,
    pub max_depth: NonZeroUsize,
    pub long_content_threshold: usize,
    pub sanitize_legacy_markup: bool,
}

#[derive(Debug, Clone)]
pub struct PresentationSettings {
    pub enable_scroll: bool,
    pub max_height: MaxHeight,
}

impl From<&RenderSettings> for RenderPipelineConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            asset_origin: settings.asset_origin.clone(),
            max_depth: settings.max_depth,
            long_content_threshold: settings.long_content_threshold,
            sanitize_legacy_markup: settings.sanitize_legacy_markup,
        }
    }
}

impl From<&PresentationSettings> for PresentationOptions {
    fn from(settings: &PresentationSettings) -> Self {
        Self {
            enable_scroll: settings.enable_scroll,
            max_height: settings.max_height.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("RICHDOC").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match &cli.command {
        Command::Render(args) => raw.apply_render_overrides(&args.overrides),
        Command::Analyze(args) => raw.apply_analyze_overrides(&args.overrides),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    render: RawRenderSettings,
    presentation: RawPresentationSettings,
}

impl RawSettings {
    fn apply_render_overrides(&mut self, overrides: &RenderOverrides) {
        self.apply_log_overrides(&overrides.log);

        if let Some(origin) = overrides.asset_origin.as_ref() {
            self.render.asset_origin = Some(origin.clone());
        }
        if let Some(depth) = overrides.max_depth {
            self.render.max_depth = Some(depth);
        }
        if overrides.sanitize_legacy_markup {
            self.render.sanitize_legacy_markup = Some(true);
        }
        if overrides.enable_scroll {
            self.presentation.enable_scroll = Some(true);
        }
        if let Some(height) = overrides.max_height.as_ref() {
            self.presentation.max_height = Some(height.clone());
        }
    }

    fn apply_analyze_overrides(&mut self, overrides: &AnalyzeOverrides) {
        self.apply_log_overrides(&overrides.log);

        if let Some(threshold) = overrides.long_content_threshold {
            self.render.long_content_threshold = Some(threshold);
        }
    }

    fn apply_log_overrides(&mut self, overrides: &LogOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            render,
            presentation,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            render: build_render_settings(render)?,
            presentation: build_presentation_settings(presentation)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_render_settings(render: RawRenderSettings) -> Result<RenderSettings, LoadError> {
    let asset_origin = match render.asset_origin.as_deref().map(str::trim) {
        Some(origin) if !origin.is_empty() => Some(
            AssetOrigin::parse(origin)
                .map_err(|err| LoadError::invalid("render.asset_origin", err.to_string()))?,
        ),
        _ => None,
    };

    let max_depth_value = render.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
    if max_depth_value > MAX_SUPPORTED_DEPTH {
        return Err(LoadError::invalid(
            "render.max_depth",
            format!("must be at most {MAX_SUPPORTED_DEPTH} levels"),
        ));
    }
    let max_depth = usize::try_from(max_depth_value)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| {
            LoadError::invalid("render.max_depth", "must be a positive number of levels")
        })?;

    let threshold_value = render
        .long_content_threshold
        .unwrap_or(DEFAULT_LONG_CONTENT_THRESHOLD);
    let long_content_threshold = usize::try_from(threshold_value).map_err(|_| {
        LoadError::invalid(
            "render.long_content_threshold",
            "value exceeds supported range for usize",
        )
    })?;

    Ok(RenderSettings {
        asset_origin,
        max_depth,
        long_content_threshold,
        sanitize_legacy_markup: render.sanitize_legacy_markup.unwrap_or(false),
    })
}

fn build_presentation_settings(
    presentation: RawPresentationSettings,
) -> Result<PresentationSettings, LoadError> {
    let max_height = match presentation.max_height {
        Some(value) => value
            .parse::<MaxHeight>()
            .map_err(|err| LoadError::invalid("presentation.max_height", err.to_string()))?,
        None => MaxHeight::default(),
    };

    Ok(PresentationSettings {
        enable_scroll: presentation.enable_scroll.unwrap_or(false),
        max_height,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    asset_origin: Option<String>,
    max_depth: Option<u64>,
    long_content_threshold: Option<u64>,
    sanitize_legacy_markup: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPresentationSettings {
    enable_scroll: Option<bool>,
    max_height: Option<String>,
}

#[cfg(test)]
mod tests;
