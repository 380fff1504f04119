//! Error types for the rubrica signature stamping library.

use thiserror::Error;

/// Primary error type for signature stamping operations.
///
/// Every failure is fatal to the request it belongs to; there are no
/// recoverable paths and no partial output. The variants separate
/// "your files are invalid" from "your selection is invalid" from
/// "internal processing failure" without exposing file paths.
#[derive(Error, Debug)]
pub enum SignError {
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("malformed PDF document: {0}")]
    MalformedDocument(String),

    #[error("unsupported signature image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("target page {0} not found in document")]
    InvalidPageTarget(usize),

    #[error("failed to serialize output document: {0}")]
    SerializationFailure(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for SignError.
pub type Result<T> = std::result::Result<T, SignError>;
