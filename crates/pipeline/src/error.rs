use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Bad input caught before any processing started.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Chunking(#[from] ingest::ChunkingError),

    #[error(transparent)]
    Extraction(#[from] extract::ExtractionError),

    #[error(transparent)]
    Embedding(#[from] embed::EmbeddingError),

    /// An extraction worker panicked or was cancelled.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
