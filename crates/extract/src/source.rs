use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::regex_source::ApiEndpointExtractor;
use crate::schema::Entity;

/// A learned NER engine that predicts spans for a set of labels.
///
/// Implementations are owned by the host application: loaded once, shared
/// by reference across all callers, and expected to honour any offline or
/// locality requirements themselves. Failures are reported as
/// `ExtractionError::ModelUnavailable` or `ExtractionError::ModelFailed`
/// and are never retried here.
pub trait EntityModel: Send + Sync {
    fn predict(&self, text: &str, labels: &[String]) -> Result<Vec<Entity>>;

    /// Human-readable name for this model.
    fn name(&self) -> &str;
}

/// One extraction source in a composite, in the order it should run.
#[derive(Clone)]
pub enum ExtractionSource {
    Model(Arc<dyn EntityModel>),
    ApiEndpoints(ApiEndpointExtractor),
}

impl ExtractionSource {
    pub fn model(model: Arc<dyn EntityModel>) -> Self {
        Self::Model(model)
    }

    pub fn api_endpoints() -> Self {
        Self::ApiEndpoints(ApiEndpointExtractor::new())
    }

    pub fn extract(&self, text: &str, labels: &[String]) -> Result<Vec<Entity>> {
        match self {
            // Nothing was asked of the model.
            Self::Model(_) if labels.is_empty() => Ok(Vec::new()),
            Self::Model(model) => model.predict(text, labels),
            Self::ApiEndpoints(extractor) => extractor.extract(text),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Model(model) => model.name(),
            Self::ApiEndpoints(extractor) => extractor.name(),
        }
    }
}

impl fmt::Debug for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(model) => f.debug_tuple("Model").field(&model.name()).finish(),
            Self::ApiEndpoints(extractor) => f.debug_tuple("ApiEndpoints").field(extractor).finish(),
        }
    }
}
