use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, Result};
use crate::generator::{EmbeddingBatch, EmbeddingGenerator};
use crate::retry::RetryPolicy;

/// Embeddings from an Ollama server's `/api/embed` endpoint.
pub struct OllamaEmbeddingGenerator {
    url: String,
    model: String,
    batch_size: usize,
    client: reqwest::Client,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Option<Vec<f32>>>,
}

impl OllamaEmbeddingGenerator {
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
        let request = &EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .retry
            .retry("ollama_embed", EmbeddingError::is_transient, move || async move {
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
            warn!(status = %status, texts = texts.len(), "Ollama server error, batch left without embeddings");
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

pub(crate) fn parse_response(body: &str) -> Result<EmbeddingBatch> {
    let parsed: EmbedResponse = serde_json::from_str(body)
        .map_err(|e| EmbeddingError::InvalidResponse(format!("Failed to parse Ollama response: {}", e)))?;
    Ok(parsed.embeddings)
}

#[async_trait]
impl EmbeddingGenerator for OllamaEmbeddingGenerator {
    async fn generate(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let batch_embeddings = self.send_batch(batch).await?;
            debug!(
                requested = batch.len(),
                returned = batch_embeddings.len(),
                "Ollama embedding batch finished"
            );
            embeddings.extend(batch_embeddings);
        }

        Ok(embeddings)
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
