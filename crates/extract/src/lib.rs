pub mod dedup;
pub mod diff;
pub mod error;
pub mod labels;
pub mod levenshtein;
pub mod regex_source;
pub mod schema;
pub mod source;

pub use dedup::{DEFAULT_DEDUP_THRESHOLD, EntityDeduplicator, deduplicate_entities, fold_case};
pub use diff::{EntityDiff, EntityDiffCalculator};
pub use error::{ExtractionError, Result};
pub use labels::{DEFAULT_ENTITY_TYPES, default_entity_types, resolve_entity_types};
pub use levenshtein::{levenshtein_distance, levenshtein_similarity};
pub use regex_source::{API_ENDPOINT_LABEL, ApiEndpointExtractor};
pub use schema::Entity;
pub use source::{EntityModel, ExtractionSource};

use std::sync::Arc;
use tracing::debug;

/// Runs extraction sources in order and fuses their output into one
/// deduplicated list of entity names.
///
/// Sources listed first seed the canonical forms, so higher-precision
/// sources (the learned model) go before pattern sources. Any source error
/// aborts the whole extraction.
#[derive(Debug, Clone)]
pub struct CompositeEntityExtractor {
    sources: Vec<ExtractionSource>,
    deduplicator: EntityDeduplicator,
}

impl CompositeEntityExtractor {
    pub fn new(sources: Vec<ExtractionSource>) -> Result<Self> {
        if sources.is_empty() {
            return Err(ExtractionError::NoSources);
        }

        Ok(Self {
            sources,
            deduplicator: EntityDeduplicator::default(),
        })
    }

    /// The standard pairing: the model first, then API endpoint patterns.
    pub fn with_model(model: Arc<dyn EntityModel>) -> Self {
        Self {
            sources: vec![
                ExtractionSource::model(model),
                ExtractionSource::api_endpoints(),
            ],
            deduplicator: EntityDeduplicator::default(),
        }
    }

    /// Pattern sources only, for hosts that run without a model.
    pub fn patterns_only() -> Self {
        Self {
            sources: vec![ExtractionSource::api_endpoints()],
            deduplicator: EntityDeduplicator::default(),
        }
    }

    pub fn with_deduplicator(mut self, deduplicator: EntityDeduplicator) -> Self {
        self.deduplicator = deduplicator;
        self
    }

    pub fn sources(&self) -> &[ExtractionSource] {
        &self.sources
    }

    pub fn deduplicator(&self) -> &EntityDeduplicator {
        &self.deduplicator
    }

    /// Every span from every source, in source order.
    pub fn extract_spans(&self, text: &str, entity_types: &[String]) -> Result<Vec<Entity>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut spans = Vec::new();
        for source in &self.sources {
            let found = source.extract(text, entity_types)?;
            debug!(source = source.name(), entities = found.len(), "Extraction source finished");
            spans.extend(found);
        }

        Ok(spans)
    }

    /// Extract deduplicated entity names from `text`.
    pub fn extract(&self, text: &str, entity_types: &[String]) -> Result<Vec<String>> {
        let spans = self.extract_spans(text, entity_types)?;
        Ok(self.deduplicator.deduplicate(spans.iter().map(|e| e.text.as_str())))
    }
}
