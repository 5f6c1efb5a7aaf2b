//! Error types for the form core

use thiserror::Error;

/// Result type alias for form operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the form core
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to decode a query string into form values
    #[error("Failed to decode query string: {0}")]
    DecodeError(String),

    /// Failed to capture the preview image
    #[error("Image capture failed: {0}")]
    CaptureError(String),

    /// The metadata formatter rejected the submission
    #[error("Metadata formatting failed: {0}")]
    MetadataError(String),

    /// A mint dispatch call failed
    #[error("Mint dispatch failed: {0}")]
    MintError(String),

    /// No wallet account is connected
    #[error("No connected account")]
    NotConnected,

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
