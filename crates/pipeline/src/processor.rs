use std::sync::Arc;

use embed::{EmbeddingBatch, EmbeddingError, EmbeddingGenerator};
use extract::{CompositeEntityExtractor, EntityDeduplicator, EntityDiff, EntityDiffCalculator};
use futures::{StreamExt, TryStreamExt, stream};
use ingest::{TextChunk, TextChunker, decode_base64_document, split_text};
use tracing::{debug, info, warn};

use crate::annotate::EntityAnnotator;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::result::{DocumentProcessingResult, TextProcessingResult};

/// Chunks documents, annotates every chunk with entities and an embedding,
/// and aggregates a document-level entity list.
///
/// The extractor and the embedding generator are owned by the host and
/// shared with it; the processor never builds or tears them down.
pub struct DocumentProcessor {
    annotator: EntityAnnotator,
    embedder: Arc<dyn EmbeddingGenerator>,
    deduplicator: EntityDeduplicator,
    diff_calculator: EntityDiffCalculator,
    config: PipelineConfig,
}

impl DocumentProcessor {
    pub fn new(
        extractor: Arc<CompositeEntityExtractor>,
        embedder: Arc<dyn EmbeddingGenerator>,
        config: PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;

        let deduplicator = EntityDeduplicator::new(config.dedup.threshold);
        let sub_chunker = TextChunker::new(config.ner_chunker_config())?;

        // Sources stay shared; only the merge threshold is replaced.
        let extractor = if extractor.deduplicator().threshold() == deduplicator.threshold() {
            extractor
        } else {
            Arc::new(extractor.as_ref().clone().with_deduplicator(deduplicator))
        };

        Ok(Self {
            annotator: EntityAnnotator::new(extractor, sub_chunker, deduplicator),
            embedder,
            deduplicator,
            diff_calculator: EntityDiffCalculator::new(),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Deduplicated entity names found in `text`.
    pub fn extract_entities(&self, text: &str, entity_types: &[String]) -> Result<Vec<String>> {
        let labels = self.resolve_labels(entity_types);
        Ok(self.annotator.annotate(text, &labels)?)
    }

    /// Process a document with the configured chunking parameters.
    pub async fn process_document(
        &self,
        document_id: &str,
        text: &str,
        entity_types: &[String],
    ) -> Result<DocumentProcessingResult> {
        let chunking = self.config.chunking;
        self.chunk_and_process(
            document_id,
            text,
            chunking.chunk_size,
            chunking.chunk_overlap,
            entity_types,
        )
        .await
    }

    /// Process a base64-encoded UTF-8 document.
    pub async fn process_base64(
        &self,
        document_id: &str,
        encoded: &str,
        entity_types: &[String],
    ) -> Result<DocumentProcessingResult> {
        let text = decode_base64_document(encoded)?;
        self.process_document(document_id, &text, entity_types).await
    }

    pub async fn chunk_and_process(
        &self,
        document_id: &str,
        text: &str,
        chunk_size: usize,
        chunk_overlap: usize,
        entity_types: &[String],
    ) -> Result<DocumentProcessingResult> {
        let chunks = split_text(text, chunk_size, chunk_overlap, 0)?;
        self.process_chunks(document_id, chunks, entity_types).await
    }

    /// Annotate already-split chunks. Ids are kept as given and the output
    /// follows input order.
    pub async fn process_chunks(
        &self,
        document_id: &str,
        chunks: Vec<TextChunk>,
        entity_types: &[String],
    ) -> Result<DocumentProcessingResult> {
        let labels = Arc::new(self.resolve_labels(entity_types));

        let (entities, embeddings) =
            tokio::try_join!(self.annotate_chunks(&chunks, &labels), self.embed_chunks(&chunks))?;

        let chunks: Vec<TextChunk> = chunks
            .into_iter()
            .zip(entities)
            .zip(embeddings)
            .map(|((chunk, entities), embedding)| {
                if embedding.is_none() {
                    warn!(
                        document_id,
                        chunk_id = chunk.id,
                        backend = self.embedder.name(),
                        "No embedding for chunk, continuing without it"
                    );
                }
                chunk.with_entities(entities).with_embedding(embedding)
            })
            .collect();

        let entities = self
            .deduplicator
            .deduplicate(chunks.iter().flat_map(|c| c.entities.iter()));

        let result = DocumentProcessingResult {
            document_id: document_id.to_string(),
            entities,
            chunks,
        };

        info!(
            document_id,
            chunks = result.chunks.len(),
            entities = result.entities.len(),
            missing_embeddings = result.missing_embeddings(),
            "Processed document"
        );

        Ok(result)
    }

    /// Extract entities from and embed a single piece of text. Unlike
    /// document processing, a missing embedding is an error here.
    pub async fn process_text(
        &self,
        text: &str,
        entity_types: &[String],
    ) -> Result<TextProcessingResult> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::Validation("text must not be empty".to_string()));
        }

        let annotator = self.annotator.clone();
        let labels = self.resolve_labels(entity_types);
        let owned = text.to_string();
        let entities =
            tokio::task::spawn_blocking(move || annotator.annotate(&owned, &labels)).await??;

        let embedding = self
            .embedder
            .generate(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| {
                EmbeddingError::InvalidResponse(format!(
                    "{} returned no embedding for the text",
                    self.embedder.name()
                ))
            })?;

        Ok(TextProcessingResult {
            text: text.to_string(),
            entities,
            embedding,
        })
    }

    /// Compare the entities of an LLM request with those of its response.
    ///
    /// Response-only entities are potential hallucinations; request-only
    /// entities are missing from the response.
    pub async fn check_hallucinations(
        &self,
        request: &str,
        response: &str,
        entity_types: &[String],
    ) -> Result<EntityDiff> {
        let annotator = self.annotator.clone();
        let labels = self.resolve_labels(entity_types);
        let (request, response) = (request.to_string(), response.to_string());

        let (request_spans, response_spans) = tokio::task::spawn_blocking(move || {
            Ok::<_, extract::ExtractionError>((
                annotator.spans(&request, &labels)?,
                annotator.spans(&response, &labels)?,
            ))
        })
        .await??;

        let diff = self.diff_calculator.calculate(&request_spans, &response_spans);
        info!(
            potential_hallucinations = diff.potential_hallucinations.len(),
            missing_entities = diff.missing_entities.len(),
            "Checked response entities"
        );

        Ok(diff)
    }

    fn resolve_labels(&self, entity_types: &[String]) -> Vec<String> {
        if entity_types.is_empty() {
            self.config.ner.entity_types.clone()
        } else {
            entity_types.to_vec()
        }
    }

    async fn annotate_chunks(
        &self,
        chunks: &[TextChunk],
        labels: &Arc<Vec<String>>,
    ) -> Result<Vec<Vec<String>>> {
        stream::iter(chunks.iter().map(|chunk| {
            let annotator = self.annotator.clone();
            let labels = Arc::clone(labels);
            let text = chunk.text.clone();
            let chunk_id = chunk.id;

            async move {
                let entities =
                    tokio::task::spawn_blocking(move || annotator.annotate(&text, &labels))
                        .await??;
                debug!(chunk_id, entities = entities.len(), "Extracted chunk entities");
                Ok::<_, PipelineError>(entities)
            }
        }))
        .buffered(self.config.concurrency.max_concurrent_extractions)
        .try_collect()
        .await
    }

    /// One entry per chunk, in chunk order.
    async fn embed_chunks(&self, chunks: &[TextChunk]) -> Result<EmbeddingBatch> {
        let batch_size = self.embedder.batch_size().max(1);
        let batches: Vec<Vec<String>> = chunks
            .chunks(batch_size)
            .map(|batch| batch.iter().map(|c| c.text.clone()).collect())
            .collect();

        let embedded: Vec<EmbeddingBatch> = stream::iter(batches.into_iter().enumerate().map(
            |(batch_index, texts)| async move {
                let embeddings = self.embedder.generate(&texts).await?;
                debug!(batch_index, texts = texts.len(), "Embedded batch");
                Ok::<_, PipelineError>(align_batch(batch_index, texts.len(), embeddings))
            },
        ))
        .buffered(self.config.concurrency.max_concurrent_embedding_batches)
        .try_collect()
        .await?;

        Ok(embedded.into_iter().flatten().collect())
    }
}

/// A batch whose length does not match the request cannot be mapped back to
/// its texts, so every entry in it is treated as missing.
fn align_batch(batch_index: usize, expected: usize, embeddings: EmbeddingBatch) -> EmbeddingBatch {
    if embeddings.len() == expected {
        return embeddings;
    }

    warn!(
        batch_index,
        expected,
        received = embeddings.len(),
        "Embedding batch length mismatch, dropping the whole batch"
    );
    vec![None; expected]
}
