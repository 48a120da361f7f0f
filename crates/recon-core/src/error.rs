//! Error types for the recon pipeline
//!
//! Chain exhaustion and run cancellation are deliberately absent here: both
//! are terminal *outcomes* (`ChainOutcome::Defaulted`, `RunStatus::Cancelled`),
//! never errors.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for recon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the recon pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// One provider attempt failed (transport, status code, parse)
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// One provider attempt exceeded its time budget
    #[error("Provider {provider} timed out after {after:?}")]
    Timeout {
        /// Provider name
        provider: String,
        /// Budget that was exceeded
        after: Duration,
    },

    /// Phone digits matched no 1-, 2- or 3-digit country calling code
    #[error("Unrecognized country code for number: {0}")]
    UnrecognizedCountryCode(String),

    /// A stage failed internally; caught at the stage boundary
    #[error("Stage {stage} failed: {message}")]
    Stage {
        /// Stage name
        stage: String,
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors (config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a provider timeout error
    pub fn timeout(provider: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            provider: provider.into(),
            after,
        }
    }

    /// Create a stage error
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether this error came from a single provider attempt
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Timeout { .. } | Self::Http(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
