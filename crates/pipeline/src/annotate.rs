use std::sync::Arc;

use extract::{CompositeEntityExtractor, Entity, EntityDeduplicator};
use ingest::TextChunker;
use tracing::debug;

/// Runs the composite extractor over a piece of text, splitting it into
/// NER-sized sub-chunks first when it is longer than the extractor should see
/// at once.
///
/// Cheap to clone; the extractor is shared.
#[derive(Debug, Clone)]
pub struct EntityAnnotator {
    extractor: Arc<CompositeEntityExtractor>,
    sub_chunker: TextChunker,
    deduplicator: EntityDeduplicator,
}

impl EntityAnnotator {
    pub fn new(
        extractor: Arc<CompositeEntityExtractor>,
        sub_chunker: TextChunker,
        deduplicator: EntityDeduplicator,
    ) -> Self {
        Self {
            extractor,
            sub_chunker,
            deduplicator,
        }
    }

    pub fn annotate(&self, text: &str, entity_types: &[String]) -> extract::Result<Vec<String>> {
        if text.chars().count() <= self.sub_chunker.config().chunk_size {
            return self.extractor.extract(text, entity_types);
        }

        let sub_chunks = self.sub_chunker.chunk_text(text, 0);
        debug!(sub_chunks = sub_chunks.len(), "Splitting text for entity extraction");

        let mut names = Vec::new();
        for sub_chunk in &sub_chunks {
            names.extend(self.extractor.extract(&sub_chunk.text, entity_types)?);
        }

        Ok(self.deduplicator.deduplicate(names))
    }

    /// Labelled spans with char offsets into `text`, sub-chunking the same way
    /// as [`annotate`](Self::annotate). Spans found twice in an overlap are
    /// reported twice.
    pub fn spans(&self, text: &str, entity_types: &[String]) -> extract::Result<Vec<Entity>> {
        if text.chars().count() <= self.sub_chunker.config().chunk_size {
            return self.extractor.extract_spans(text, entity_types);
        }

        let mut spans = Vec::new();
        for sub_chunk in self.sub_chunker.chunk_text(text, 0) {
            let shift = sub_chunk.offset.0;
            spans.extend(
                self.extractor
                    .extract_spans(&sub_chunk.text, entity_types)?
                    .into_iter()
                    .map(|span| Entity {
                        start: span.start + shift,
                        end: span.end + shift,
                        ..span
                    }),
            );
        }
        Ok(spans)
    }
}
