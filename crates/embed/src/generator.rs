use async_trait::async_trait;

use crate::error::Result;

/// A vector per input text, or `None` where the backend could not embed it.
pub type EmbeddingBatch = Vec<Option<Vec<f32>>>;

/// Turns texts into embedding vectors.
///
/// Implementations return one entry per input text in input order. An
/// entry may be `None` to signal a non-fatal miss for that text; an `Err`
/// means the backend failed as a whole and nothing in the call can be
/// trusted.
#[async_trait]
pub trait EmbeddingGenerator: Send + Sync {
    async fn generate(&self, texts: &[String]) -> Result<EmbeddingBatch>;

    /// How many texts callers should send per `generate` call.
    fn batch_size(&self) -> usize;

    /// Human-readable name for this backend.
    fn name(&self) -> &str;
}
