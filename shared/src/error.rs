//! Error types for AppConfig Fetch.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Environment variable {0} must not be empty")]
    EmptyVar(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },

    #[error("Request to configuration sidecar failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Configuration sidecar returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("Configuration document is not a JSON object: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Configuration document has no property {0:?}")]
    MissingProperty(String),
}

impl Error {
    /// Raised while building configuration, before any request is sent.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingVar(_) | Error::EmptyVar(_) | Error::InvalidVar { .. }
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::UpstreamStatus(_))
    }
}
