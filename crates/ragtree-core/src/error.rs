//! Error types for the chunking pipeline.

use thiserror::Error;

/// Result type alias using ChunkError.
pub type Result<T> = std::result::Result<T, ChunkError>;

/// Errors that can occur while chunking or indexing a document.
#[derive(Error, Debug)]
pub enum ChunkError {
    /// Top-level document is neither a mapping nor text.
    #[error("Unsupported document kind: {kind}")]
    UnsupportedDocumentKind { kind: String },

    /// Configuration rejected before any splitting began.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Post-condition failure inside the pipeline.
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// Error reported by the indexing collaborator.
    #[error("Index error: {message}")]
    Index { message: String },

    /// Configuration file could not be parsed.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChunkError {
    /// Create an unsupported document kind error.
    pub fn unsupported_kind(kind: impl Into<String>) -> Self {
        Self::UnsupportedDocumentKind { kind: kind.into() }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an invariant violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create an index error.
    pub fn index(message: impl Into<String>) -> Self {
        Self::Index {
            message: message.into(),
        }
    }

    /// Get a stable error code for callers that report errors over a wire.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedDocumentKind { .. } => "UNSUPPORTED_DOCUMENT_KIND",
            Self::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            Self::InvariantViolation { .. } => "INVARIANT_VIOLATION",
            Self::Index { .. } => "INDEX_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}
