//! Text Extractor: turns PDF or DOCX bytes into one flat text stream.
//!
//! `extract` never panics past its boundary: a container that cannot be opened
//! yields empty text together with the `DecodeError` that explains why.

pub mod docx;
pub mod pdf;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{AppError, DecodeError};

/// Formats the core can decode. Anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }

    /// Accepts "pdf", "PDF", ".docx" and so on.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_tag)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| AppError::UnsupportedFormat(s.to_string()))
    }
}

/// Upload allow-list: only `.pdf` and `.docx` filenames are accepted.
pub fn allowed_file(filename: &str) -> bool {
    DocumentFormat::from_filename(filename).is_some()
}

/// Decoded text plus the container-level failure, if any.
#[derive(Debug)]
pub struct DecodedText {
    pub text: String,
    pub error: Option<DecodeError>,
}

impl DecodedText {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Decodes `bytes` under `format`. Page- and paragraph-level problems are
/// absorbed inside the decoders; only an unreadable container sets `error`.
pub fn extract(bytes: &[u8], format: DocumentFormat) -> DecodedText {
    let outcome = match format {
        DocumentFormat::Pdf => pdf::extract_pdf(bytes),
        DocumentFormat::Docx => docx::extract_docx(bytes),
    };

    match outcome {
        Ok(text) => {
            debug!(format = %format, chars = text.len(), "Document decoded");
            DecodedText { text, error: None }
        }
        Err(e) => {
            warn!(format = %format, error = %e, "Document could not be decoded");
            DecodedText {
                text: String::new(),
                error: Some(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_tag_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_tag("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_tag(".docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_tag("txt"), None);
        assert_eq!(DocumentFormat::from_tag(""), None);
    }

    #[test]
    fn test_from_str_rejects_unknown_tag() {
        let err = "txt".parse::<DocumentFormat>().unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(ref t) if t == "txt"));
    }

    #[test]
    fn test_allowed_file_extensions() {
        assert!(allowed_file("resume.pdf"));
        assert!(allowed_file("Jane_Doe.DOCX"));
        assert!(!allowed_file("resume.doc"));
        assert!(!allowed_file("resume"));
        assert!(!allowed_file("notes.txt"));
    }

    #[test]
    fn test_extract_never_panics_on_garbage() {
        let garbage: Vec<u8> = (0..512u32).map(|i| (i * 31 % 251) as u8).collect();
        for format in [DocumentFormat::Pdf, DocumentFormat::Docx] {
            let decoded = extract(&garbage, format);
            assert!(decoded.text.is_empty());
            assert!(!decoded.is_ok());
        }
    }

    #[test]
    fn test_extract_empty_input_reports_decode_error() {
        let decoded = extract(&[], DocumentFormat::Docx);
        assert!(decoded.text.is_empty());
        assert!(decoded.error.is_some());
    }
}
