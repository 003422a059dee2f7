//! Embedding error types.

use thiserror::Error;

/// Total failure of an embedding backend.
///
/// Per-text misses are not errors; they come back as `None` entries.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Backend unreachable or timed out.
    #[error("Cannot connect to embedding service: {0}")]
    Connection(String),

    /// Backend rejected the request (non-5xx status).
    #[error("Embedding request failed: {0}")]
    Request(String),

    /// Backend answered with a body that does not match its API.
    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("Embedding configuration error: {0}")]
    Configuration(String),
}

impl EmbeddingError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Self::Connection(err.to_string())
        } else if err.is_builder() {
            Self::Configuration(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, EmbeddingError>;
