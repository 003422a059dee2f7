use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProvider {
    #[default]
    Ollama,
    OpenAiCompatible, // LM Studio and other /v1/embeddings servers
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub base_url: String,
    pub model: String,
    /// Path appended to `base_url`; `None` uses the provider's standard path.
    pub endpoint: Option<String>,
    pub batch_size: usize,
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Ollama,
            base_url: "http://localhost:11434".to_string(),
            model: "qwen3-embedding:8b".to_string(),
            endpoint: None,
            batch_size: 20,
            request_timeout_secs: 60,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 10000,
        }
    }
}

impl EmbeddingConfig {
    pub fn endpoint_path(&self) -> &str {
        match (&self.endpoint, self.provider) {
            (Some(path), _) => path,
            (None, EmbeddingProvider::Ollama) => "/api/embed",
            (None, EmbeddingProvider::OpenAiCompatible) => "/v1/embeddings",
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint_path())
    }

    pub fn lm_studio() -> Self {
        Self {
            provider: EmbeddingProvider::OpenAiCompatible,
            base_url: "http://localhost:1234".to_string(),
            model: "text-embedding-qwen3-embedding-8b".to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        assert_eq!(EmbeddingConfig::default().url(), "http://localhost:11434/api/embed");
        assert_eq!(EmbeddingConfig::lm_studio().url(), "http://localhost:1234/v1/embeddings");
    }

    #[test]
    fn test_custom_endpoint_and_trailing_slash() {
        let config = EmbeddingConfig {
            base_url: "http://embed.local:8080/".to_string(),
            endpoint: Some("/embed".to_string()),
            ..EmbeddingConfig::default()
        };
        assert_eq!(config.url(), "http://embed.local:8080/embed");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EmbeddingConfig =
            serde_json::from_str(r#"{"provider": "open_ai_compatible", "batch_size": 5}"#).unwrap();

        assert_eq!(config.provider, EmbeddingProvider::OpenAiCompatible);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.retry.max_retries, 3);
    }
}
