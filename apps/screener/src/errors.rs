use std::time::Duration;

use thiserror::Error;

/// A document could not be opened under its declared format.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("PDF could not be parsed: {0}")]
    Pdf(String),

    #[error("DOCX archive could not be opened: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX is missing required part '{0}'")]
    MissingPart(&'static str),

    #[error("DOCX body is not well-formed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error while reading document: {0}")]
    Io(#[from] std::io::Error),
}

/// Similarity computation failed on the given corpus.
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("Empty vocabulary: both documents contain only stop words")]
    EmptyVocabulary,

    #[error("Scorer backend failed: {0}")]
    Backend(String),
}

/// Failures while producing the tabular export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pipeline-level failure. Only these conditions move a record to `error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Processing exceeded the {}s time limit", .0.as_secs())]
    Timeout(Duration),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_reports_seconds() {
        let err = AppError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Processing exceeded the 30s time limit");
    }

    #[test]
    fn test_decode_error_converts_into_app_error() {
        let err: AppError = DecodeError::MissingPart("word/document.xml").into();
        assert!(matches!(err, AppError::Decode(DecodeError::MissingPart(_))));
        assert!(err.to_string().contains("word/document.xml"));
    }
}
