use ingest::TextChunk;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProcessingResult {
    pub document_id: String,
    /// Entity names deduplicated across every chunk.
    pub entities: Vec<String>,
    /// Ordered by ascending chunk id.
    pub chunks: Vec<TextChunk>,
}

impl DocumentProcessingResult {
    /// Number of chunks the embedding backend produced no vector for.
    pub fn missing_embeddings(&self) -> usize {
        self.chunks.iter().filter(|c| !c.has_embedding()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProcessingResult {
    pub text: String,
    pub entities: Vec<String>,
    pub embedding: Vec<f32>,
}
