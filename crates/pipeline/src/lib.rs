pub mod annotate;
pub mod config;
pub mod error;
pub mod processor;
pub mod result;

pub use annotate::EntityAnnotator;
pub use config::{ConcurrencyConfig, DedupConfig, NerConfig, PipelineConfig};
pub use error::{PipelineError, Result};
pub use processor::DocumentProcessor;
pub use result::{DocumentProcessingResult, TextProcessingResult};

pub use extract::EntityDiff;
