use serde::{Deserialize, Serialize};
use std::path::Path;

use embed::{EmbeddingConfig, RetryConfig};
use extract::{DEFAULT_DEDUP_THRESHOLD, default_entity_types};
use ingest::ChunkerConfig;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub chunking: ChunkerConfig,
    pub ner: NerConfig,
    pub concurrency: ConcurrencyConfig,
    pub dedup: DedupConfig,
    pub embedding: EmbeddingConfig,
}

/// Sub-chunking applied to chunk text before it reaches the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    pub sub_chunk_size: usize,
    pub sub_chunk_overlap: usize,
    /// Labels used when a request names none.
    pub entity_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub max_concurrent_extractions: usize,
    pub max_concurrent_embedding_batches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub threshold: usize,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            sub_chunk_size: 1000,
            sub_chunk_overlap: 100,
            entity_types: default_entity_types(),
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_extractions: 4,
            max_concurrent_embedding_batches: 2,
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DEDUP_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    pub fn fast() -> Self {
        Self {
            concurrency: ConcurrencyConfig {
                max_concurrent_extractions: 16,
                max_concurrent_embedding_batches: 8,
            },
            embedding: EmbeddingConfig {
                request_timeout_secs: 30,
                retry: RetryConfig {
                    max_retries: 1,
                    initial_backoff_ms: 500,
                    max_backoff_ms: 2000,
                },
                ..EmbeddingConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn accurate() -> Self {
        Self {
            concurrency: ConcurrencyConfig {
                max_concurrent_extractions: 1,
                max_concurrent_embedding_batches: 1,
            },
            embedding: EmbeddingConfig {
                request_timeout_secs: 120,
                retry: RetryConfig {
                    max_retries: 5,
                    initial_backoff_ms: 2000,
                    max_backoff_ms: 20000,
                },
                ..EmbeddingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load overrides from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn ner_chunker_config(&self) -> ChunkerConfig {
        ChunkerConfig::new(self.ner.sub_chunk_size, self.ner.sub_chunk_overlap)
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.ner_chunker_config().validate()?;

        if self.concurrency.max_concurrent_extractions == 0
            || self.concurrency.max_concurrent_embedding_batches == 0
        {
            return Err(PipelineError::Config("concurrency limits must be > 0".to_string()));
        }
        if self.embedding.batch_size == 0 {
            return Err(PipelineError::Config("embedding batch_size must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();

        assert_eq!(config.chunking.chunk_size, 3000);
        assert_eq!(config.chunking.chunk_overlap, 300);
        assert_eq!(config.dedup.threshold, 2);
        assert_eq!(config.ner.entity_types.len(), 21);
        assert_eq!(config.embedding.batch_size, 20);
    }

    #[test]
    fn test_presets_are_valid() {
        PipelineConfig::fast().validate().unwrap();
        PipelineConfig::accurate().validate().unwrap();
        assert_eq!(PipelineConfig::accurate().concurrency.max_concurrent_extractions, 1);
    }

    #[test]
    fn test_rejects_overlap_not_below_size() {
        let mut config = PipelineConfig::default();
        config.chunking.chunk_overlap = 3000;
        assert!(matches!(config.validate(), Err(PipelineError::Chunking(_))));

        let mut config = PipelineConfig::default();
        config.ner.sub_chunk_overlap = 1000;
        assert!(matches!(config.validate(), Err(PipelineError::Chunking(_))));
    }

    #[test]
    fn test_rejects_zero_limits() {
        let mut config = PipelineConfig::default();
        config.concurrency.max_concurrent_extractions = 0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));

        let mut config = PipelineConfig::default();
        config.embedding.batch_size = 0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"chunking": {"chunk_size": 1200}, "dedup": {"threshold": 1}}"#,
        )
        .unwrap();

        assert_eq!(config.chunking.chunk_size, 1200);
        assert_eq!(config.chunking.chunk_overlap, 300);
        assert_eq!(config.dedup.threshold, 1);
        assert_eq!(config.ner.sub_chunk_size, 1000);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = PipelineConfig::from_json_file(Path::new("/nonexistent/pipeline.json"));
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
