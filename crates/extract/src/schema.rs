use serde::{Deserialize, Serialize};

/// A labelled span produced by an extraction source.
///
/// `start` and `end` are char offsets into the text handed to the source,
/// which for chunked documents is the chunk, not the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start,
            end,
        }
    }
}
