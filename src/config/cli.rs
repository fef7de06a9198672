use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the richdoc binary.
#[derive(Debug, Parser)]
#[command(name = "richdoc", version, about = "Render rich-text documents to HTML")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "RICHDOC_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render content (structured JSON document or legacy HTML) to HTML.
    Render(RenderArgs),
    /// Report the detected format and whether the content counts as long.
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub overrides: RenderOverrides,

    /// Content file to render, or `-` for standard input.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub overrides: AnalyzeOverrides,

    /// Content file to analyze, or `-` for standard input.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LogOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    #[command(flatten)]
    pub log: LogOverrides,

    /// Override the origin prepended to relative image sources.
    #[arg(long = "asset-origin", value_name = "URL")]
    pub asset_origin: Option<String>,

    /// Clamp the output to a scrollable region with an end-of-content marker.
    #[arg(long = "enable-scroll", action = clap::ArgAction::SetTrue)]
    pub enable_scroll: bool,

    /// Override the maximum height of the scrollable region (e.g. 480px, 60vh).
    #[arg(long = "max-height", value_name = "LENGTH")]
    pub max_height: Option<String>,

    /// Sanitise legacy HTML instead of embedding it verbatim.
    #[arg(long = "sanitize-legacy-markup", action = clap::ArgAction::SetTrue)]
    pub sanitize_legacy_markup: bool,

    /// Override the maximum document nesting depth.
    #[arg(long = "max-depth", value_name = "LEVELS")]
    pub max_depth: Option<u64>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct AnalyzeOverrides {
    #[command(flatten)]
    pub log: LogOverrides,

    /// Override the character count above which content counts as long.
    #[arg(long = "long-content-threshold", value_name = "CHARS")]
    pub long_content_threshold: Option<u64>,
}
