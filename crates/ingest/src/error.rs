use thiserror::Error;

/// Errors raised before or while splitting a document.
#[derive(Error, Debug)]
pub enum ChunkingError {
    #[error("chunk_size must be > 0, got {0}")]
    InvalidChunkSize(usize),

    #[error("chunk_overlap must be < chunk_size, got chunk_overlap={overlap}, chunk_size={size}")]
    InvalidOverlap { size: usize, overlap: usize },

    #[error("Failed to decode document content: {0}")]
    Decode(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChunkingError>;
