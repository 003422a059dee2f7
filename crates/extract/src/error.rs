use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The NER engine is not loaded or cannot be reached.
    #[error("Entity model '{model}' unavailable: {reason}")]
    ModelUnavailable { model: String, reason: String },

    /// The NER engine ran but failed on this input.
    #[error("Entity model '{model}' failed: {reason}")]
    ModelFailed { model: String, reason: String },

    #[error("At least one extraction source must be provided")]
    NoSources,

    /// A pattern source produced an inconsistent match. Always a defect.
    #[error("Pattern source '{source_name}' failed: {reason}")]
    Pattern { source_name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
