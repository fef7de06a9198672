use thiserror::Error;

use crate::{application::render::RenderConfigError, config::LoadError, infra::error::InfraError};

/// Top-level error for the command-line program. Rendering itself never
/// fails; these cover configuration, telemetry and input handling.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    RenderConfig(#[from] RenderConfigError),
}

