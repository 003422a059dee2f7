pub mod chunk;
pub mod chunker;
pub mod error;
pub mod reader;

pub use chunk::TextChunk;
pub use chunker::{ChunkerConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, TextChunker, split_text};
pub use error::{ChunkingError, Result};
pub use reader::{FileReader, decode_base64_document};

use sha2::{Digest, Sha256};

/// Generate a stable document ID from file path
pub fn generate_doc_id(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}
