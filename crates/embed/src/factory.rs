use std::sync::Arc;

use crate::config::{EmbeddingConfig, EmbeddingProvider};
use crate::error::Result;
use crate::generator::EmbeddingGenerator;
use crate::ollama::OllamaEmbeddingGenerator;
use crate::openai_compat::OpenAiCompatibleGenerator;

/// Build the generator selected by `config.provider`.
pub fn create_generator(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingGenerator>> {
    let generator: Arc<dyn EmbeddingGenerator> = match config.provider {
        EmbeddingProvider::Ollama => Arc::new(OllamaEmbeddingGenerator::new(config)?),
        EmbeddingProvider::OpenAiCompatible => Arc::new(OpenAiCompatibleGenerator::new(config)?),
    };
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_configured_provider() {
        let ollama = create_generator(&EmbeddingConfig::default()).unwrap();
        assert_eq!(ollama.name(), "ollama");
        assert_eq!(ollama.batch_size(), 20);

        let lm_studio = create_generator(&EmbeddingConfig::lm_studio()).unwrap();
        assert_eq!(lm_studio.name(), "openai-compatible");
    }
}
