pub mod config;
pub mod error;
pub mod factory;
pub mod generator;
pub mod ollama;
pub mod openai_compat;
pub mod retry;

pub use config::{EmbeddingConfig, EmbeddingProvider, RetryConfig};
pub use error::{EmbeddingError, Result};
pub use factory::create_generator;
pub use generator::{EmbeddingBatch, EmbeddingGenerator};
pub use ollama::OllamaEmbeddingGenerator;
pub use openai_compat::OpenAiCompatibleGenerator;
pub use retry::RetryPolicy;
