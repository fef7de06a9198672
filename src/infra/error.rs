use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("failed to read content from `{path}`: {source}")]
    ReadContent {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn read_content(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadContent {
            path: path.into(),
            source,
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
