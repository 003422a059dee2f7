use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use tokio::fs;

use crate::error::{ChunkingError, Result};

pub struct FileReader;

impl FileReader {
    pub async fn read_file(path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension {
            "txt" | "md" => {
                let content = fs::read_to_string(path).await?;
                Ok(content)
            }
            _ => Err(ChunkingError::UnsupportedFormat(extension.to_string())),
        }
    }
}

/// Decode base64 file content into trimmed UTF-8 text.
pub fn decode_base64_document(encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ChunkingError::Decode(format!("invalid base64: {}", e)))?;

    let text = String::from_utf8(bytes)
        .map_err(|e| ChunkingError::Decode(format!("content is not UTF-8: {}", e)))?;

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_base64_document() {
        let encoded = STANDARD.encode("  Paris is the capital of France.\n");
        let text = decode_base64_document(&encoded).unwrap();
        assert_eq!(text, "Paris is the capital of France.");
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(matches!(
            decode_base64_document("not base64 !!!"),
            Err(ChunkingError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        let encoded = STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(
            decode_base64_document(&encoded),
            Err(ChunkingError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_read_file_rejects_unknown_extension() {
        let result = FileReader::read_file(Path::new("report.pdf")).await;
        assert!(matches!(result, Err(ChunkingError::UnsupportedFormat(ext)) if ext == "pdf"));
    }
}
