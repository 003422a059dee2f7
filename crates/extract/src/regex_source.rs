//! Pattern-based extraction of HTTP API endpoints.
//!
//! Matches `<METHOD> <path>` where the method is one of GET, POST, PUT,
//! PATCH, DELETE, HEAD or OPTIONS (any case) and the path is a `/`-prefixed
//! run of non-whitespace. Trailing sentence punctuation is not part of the
//! path. Requested labels are ignored: the pattern set is fixed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ExtractionError, Result};
use crate::schema::Entity;

pub const API_ENDPOINT_LABEL: &str = "API Endpoint";

static API_ENDPOINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)\s+(/\S*)").unwrap()
});

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '\'', '"'];

#[derive(Debug, Clone, Copy, Default)]
pub struct ApiEndpointExtractor;

impl ApiEndpointExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &'static str {
        "api-endpoint-pattern"
    }

    pub fn extract(&self, text: &str) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();
        // Byte offsets advance monotonically, so char offsets are counted incrementally.
        let mut cursor_byte = 0;
        let mut cursor_char = 0;

        for caps in API_ENDPOINT.captures_iter(text) {
            let (Some(whole), Some(method), Some(path)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                return Err(ExtractionError::Pattern {
                    source_name: self.name().to_string(),
                    reason: "match without method or path group".to_string(),
                });
            };

            let path_text = path.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            let end_byte = path.start() + path_text.len();

            cursor_char += text[cursor_byte..whole.start()].chars().count();
            cursor_byte = whole.start();
            let start = cursor_char;
            let end = start + text[whole.start()..end_byte].chars().count();

            entities.push(Entity::new(
                format!("{} {}", method.as_str(), path_text),
                API_ENDPOINT_LABEL,
                start,
                end,
            ));
        }

        Ok(entities)
    }
}
