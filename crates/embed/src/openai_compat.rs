//! OpenAI-compatible `/v1/embeddings` backend (LM Studio, vLLM, llama.cpp server).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, Result};
use crate::generator::{EmbeddingBatch, EmbeddingGenerator};
use crate::retry::RetryPolicy;

pub struct OpenAiCompatibleGenerator {
    url: String,
    model: String,
    batch_size: usize,
    client: reqwest::Client,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiCompatibleGenerator {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(EmbeddingError::Configuration("batch_size must be > 0".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::Configuration(e.to_string()))?;

        Ok(Self {
            url: config.url(),
            model: config.model.clone(),
            batch_size: config.batch_size,
            client,
            retry: RetryPolicy::from_config(&config.retry),
        })
    }

    async fn send_batch(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        let request = &EmbeddingsRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .retry
            .retry("openai_embeddings", EmbeddingError::is_transient, move || async move {
                self.client
                    .post(&self.url)
                    .json(request)
                    .send()
                    .await
                    .map_err(EmbeddingError::from_send)
            })
            .await?;

        let status = response.status();
        if status.is_server_error() {
            warn!(status = %status, texts = texts.len(), "Embedding server error, batch left without embeddings");
            return Ok(vec![None; texts.len()]);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Request(format!("{}: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        parse_response(&body)
    }
}

/// Parse a `/v1/embeddings` body, restoring request order from `index`.
pub(crate) fn parse_response(body: &str) -> Result<EmbeddingBatch> {
    let mut parsed: EmbeddingsResponse = serde_json::from_str(body)
        .map_err(|e| EmbeddingError::InvalidResponse(format!("Failed to parse embeddings response: {}", e)))?;

    parsed.data.sort_by_key(|item| item.index);
    Ok(parsed.data.into_iter().map(|item| Some(item.embedding)).collect())
}

#[async_trait]
impl EmbeddingGenerator for OpenAiCompatibleGenerator {
    async fn generate(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let batch_embeddings = self.send_batch(batch).await?;
            debug!(
                requested = batch.len(),
                returned = batch_embeddings.len(),
                "Embedding batch finished"
            );
            embeddings.extend(batch_embeddings);
        }

        Ok(embeddings)
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_restores_request_order() {
        let body = json!({
            "object": "list",
            "data": [
                {"object": "embedding", "index": 1, "embedding": [2.0, 2.0]},
                {"object": "embedding", "index": 0, "embedding": [1.0, 1.0]},
            ],
            "model": "text-embedding-qwen3-embedding-8b"
        })
        .to_string();

        let parsed = parse_response(&body).unwrap();
        assert_eq!(parsed, vec![Some(vec![1.0, 1.0]), Some(vec![2.0, 2.0])]);
    }

    #[test]
    fn test_missing_data_is_fatal() {
        let body = json!({"error": {"message": "no model loaded"}}).to_string();
        assert!(matches!(parse_response(&body), Err(EmbeddingError::InvalidResponse(_))));
    }

    #[test]
    fn test_item_without_embedding_is_fatal() {
        let body = json!({"data": [{"index": 0}]}).to_string();
        assert!(matches!(parse_response(&body), Err(EmbeddingError::InvalidResponse(_))));
    }
}
