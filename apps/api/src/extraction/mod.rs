//! Document text extraction: turns uploaded files into plain text for the ranker.
//!
//! Extraction is CPU-bound and the PDF parser can panic on malformed input, so
//! every file is extracted inside `tokio::task::spawn_blocking`. Whatever goes
//! wrong (unsupported type, parse error, panic) the caller gets a [`Document`]
//! with empty text and a warning in the log; the ranker then skips it.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

use crate::screening::ranker::Document;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// A pluggable text extractor for one family of file formats.
pub trait DocumentExtractor: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    fn supports(&self, file_name: &str) -> bool;

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// PDF text via the `pdf-extract` crate.
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn supports(&self, file_name: &str) -> bool {
        has_extension(file_name, "pdf")
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(format!("{e:?}")))
    }
}

/// Plain-text uploads; invalid UTF-8 is replaced rather than rejected.
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn supports(&self, file_name: &str) -> bool {
        has_extension(file_name, "txt")
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

fn has_extension(file_name: &str, ext: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Ordered set of extractors; the first one that supports a file wins.
#[derive(Clone)]
pub struct ExtractorSet {
    extractors: Vec<Arc<dyn DocumentExtractor>>,
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self::new(vec![Arc::new(PdfExtractor), Arc::new(PlainTextExtractor)])
    }
}

impl ExtractorSet {
    pub fn new(extractors: Vec<Arc<dyn DocumentExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
        let extractor = self
            .extractors
            .iter()
            .find(|e| e.supports(file_name))
            .ok_or_else(|| ExtractionError::UnsupportedFormat(file_name.to_string()))?;

        debug!(file = file_name, extractor = extractor.name(), "Extracting text");
        extractor.extract(bytes)
    }
}

/// Extracts one uploaded file. Never fails: errors become empty text.
pub async fn extract_document(
    extractors: ExtractorSet,
    file_name: String,
    bytes: Bytes,
) -> Document {
    let name = file_name.clone();
    let result = tokio::task::spawn_blocking(move || extractors.extract(&name, &bytes))
        .await
        .unwrap_or_else(|e| Err(ExtractionError::Task(e.to_string())));

    let text = match result {
        Ok(text) => text,
        Err(e) => {
            warn!(file = %file_name, error = %e, "Text extraction failed, treating as empty");
            String::new()
        }
    };

    Document::new(file_name, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PanickingExtractor;

    impl DocumentExtractor for PanickingExtractor {
        fn name(&self) -> &'static str {
            "panic"
        }

        fn supports(&self, _file_name: &str) -> bool {
            true
        }

        fn extract(&self, _bytes: &[u8]) -> Result<String, ExtractionError> {
            panic!("malformed xref table")
        }
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        assert!(PdfExtractor.supports("Resume.PDF"));
        assert!(PdfExtractor.supports("cv.pdf"));
        assert!(!PdfExtractor.supports("cv.docx"));
        assert!(!PdfExtractor.supports("pdf"));
        assert!(PlainTextExtractor.supports("notes.txt"));
    }

    #[test]
    fn test_plain_text_is_lossy() {
        let text = PlainTextExtractor.extract(b"rust \xff engineer").unwrap();
        assert!(text.starts_with("rust "));
        assert!(text.ends_with(" engineer"));
    }

    #[test]
    fn test_unsupported_format() {
        let err = ExtractorSet::default().extract("cv.docx", b"PK").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_extract_document_reads_text_files() {
        let doc = extract_document(
            ExtractorSet::default(),
            "a.txt".to_string(),
            Bytes::from_static(b"Python developer"),
        )
        .await;
        assert_eq!(doc, Document::new("a.txt", "Python developer"));
    }

    #[tokio::test]
    async fn test_failed_extraction_yields_empty_text() {
        let doc = extract_document(
            ExtractorSet::default(),
            "broken.pdf".to_string(),
            Bytes::from_static(b"%PDF-1.4 truncated"),
        )
        .await;
        assert_eq!(doc.id, "broken.pdf");
        assert!(doc.text.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_extractor_is_isolated() {
        let set = ExtractorSet::new(vec![Arc::new(PanickingExtractor)]);
        let doc = extract_document(set, "evil.pdf".to_string(), Bytes::new()).await;
        assert!(doc.text.is_empty());
    }
}
