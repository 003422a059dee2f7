use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    pub id: usize,
    pub text: String,
    /// Deduplicated entity names found in this chunk.
    pub entities: Vec<String>,
    /// `None` when the embedding backend could not produce a vector for this chunk.
    pub embedding: Option<Vec<f32>>,
    pub offset: (usize, usize), // [start, end) character positions in the document
}

impl TextChunk {
    pub fn new(id: usize, text: String, offset: (usize, usize)) -> Self {
        Self {
            id,
            text,
            entities: Vec::new(),
            embedding: None,
            offset,
        }
    }

    /// Length of the chunk in characters.
    pub fn char_len(&self) -> usize {
        self.offset.1 - self.offset.0
    }

    pub fn with_entities(mut self, entities: Vec<String>) -> Self {
        self.entities = entities;
        self
    }

    pub fn with_embedding(mut self, embedding: Option<Vec<f32>>) -> Self {
        self.embedding = embedding;
        self
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}
