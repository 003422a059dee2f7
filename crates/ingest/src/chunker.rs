use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::chunk::TextChunk;
use crate::error::{ChunkingError, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 3000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 300;

/// Window parameters, both measured in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkerConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkingError::InvalidChunkSize(self.chunk_size));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ChunkingError::InvalidOverlap {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }

    /// Distance the window advances when no boundary adjustment happens.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

/// Splits documents into overlapping windows that prefer to end on a
/// sentence boundary, then on whitespace, and only cut mid-token as a
/// last resort.
///
/// Consecutive chunks always share exactly `chunk_overlap` characters, so
/// the first chunk followed by every later chunk minus its first
/// `chunk_overlap` characters reproduces the document.
#[derive(Debug, Clone)]
pub struct TextChunker {
    config: ChunkerConfig,
}

impl TextChunker {
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    pub fn chunk_text(&self, text: &str, start_id: usize) -> Vec<TextChunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let index = CharIndex::new(text);
        let total = index.len();
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let window_end = (start + size).min(total);
            let end = if window_end == total {
                total
            } else {
                // Anything at or before start + overlap would make the next
                // window begin where this one did.
                self.find_break(&index, start + overlap + 1, window_end)
            };

            chunks.push(TextChunk::new(
                start_id + chunks.len(),
                index.slice(text, start, end).to_string(),
                (start, end),
            ));

            if end == total {
                break;
            }
            start = end - overlap;
        }

        debug!(
            chunks = chunks.len(),
            chars = total,
            chunk_size = size,
            chunk_overlap = overlap,
            "Split document into chunks"
        );

        chunks
    }

    /// Pick the chunk end within `[min_end, window_end]`.
    fn find_break(&self, index: &CharIndex, min_end: usize, window_end: usize) -> usize {
        if let Some(end) = index.last_sentence_end(min_end, window_end) {
            return end;
        }
        if let Some(end) = index.last_word_end(min_end, window_end) {
            return end;
        }
        window_end
    }
}

/// Split `text` with the given window parameters, validating them first.
pub fn split_text(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    start_id: usize,
) -> Result<Vec<TextChunk>> {
    let chunker = TextChunker::new(ChunkerConfig::new(chunk_size, chunk_overlap))?;
    Ok(chunker.chunk_text(text, start_id))
}

/// Character-position view over a document.
struct CharIndex {
    /// Byte offset of every char, plus the total byte length at the end.
    bytes: Vec<usize>,
    chars: Vec<char>,
    /// Char positions where a sentence ends (UAX #29 sentence boundaries).
    sentence_ends: Vec<usize>,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let (mut bytes, chars): (Vec<usize>, Vec<char>) = text.char_indices().unzip();
        bytes.push(text.len());

        let sentence_ends = text
            .split_sentence_bound_indices()
            .map(|(offset, sentence)| offset + sentence.len())
            .map(|byte| bytes.binary_search(&byte).unwrap_or_else(|pos| pos))
            .collect();

        Self {
            bytes,
            chars,
            sentence_ends,
        }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn slice<'a>(&self, text: &'a str, start: usize, end: usize) -> &'a str {
        &text[self.bytes[start]..self.bytes[end]]
    }

    fn last_sentence_end(&self, min_end: usize, max_end: usize) -> Option<usize> {
        let upto = self.sentence_ends.partition_point(|&end| end <= max_end);
        self.sentence_ends[..upto]
            .last()
            .copied()
            .filter(|&end| end >= min_end)
    }

    /// Last position in range that directly follows whitespace.
    fn last_word_end(&self, min_end: usize, max_end: usize) -> Option<usize> {
        (min_end.max(1)..=max_end)
            .rev()
            .find(|&pos| self.chars[pos - 1].is_whitespace())
    }
}
