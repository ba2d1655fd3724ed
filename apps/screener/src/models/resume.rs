use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Status lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// Lifecycle of one pipeline invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    #[default]
    Pending,
    Processing,
    Processed,
    Error,
}

impl ProcessingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessingStatus::Processed | ProcessingStatus::Error)
    }

    /// `Pending → Error` covers requests rejected before work starts.
    pub fn can_transition_to(self, next: ProcessingStatus) -> bool {
        use ProcessingStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Pending, Error) | (Processing, Processed) | (Processing, Error)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Processed => "processed",
            ProcessingStatus::Error => "error",
        }
    }

    /// Display label used by the export ("Processed", "Error", ...).
    pub fn label(self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "Pending",
            ProcessingStatus::Processing => "Processing",
            ProcessingStatus::Processed => "Processed",
            ProcessingStatus::Error => "Error",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Partial results produced by the field extractors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Best-effort view of a single role. Title and dates may come from unrelated
/// parts of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_recent_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl ExperienceSummary {
    pub fn is_empty(&self) -> bool {
        self.most_recent_title.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationSummary {
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub degrees: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub schools: BTreeSet<String>,
}

impl EducationSummary {
    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty() && self.schools.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Diagnostics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    DecodeError,
    ExtractionDegradation,
    ScoringDegradation,
    UnsupportedFormat,
    Timeout,
}

/// A condition the pipeline absorbed (or, for fatal kinds, stopped on).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub component: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, component: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            component: component.to_string(),
            message: message.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output record
// ────────────────────────────────────────────────────────────────────────────

/// Output of one pipeline invocation, handed back fully materialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub raw_text: String,
    pub contact: ContactInfo,
    pub skills: BTreeSet<String>,
    pub experience: ExperienceSummary,
    pub education: EducationSummary,
    /// 0 – 100, two decimals
    pub score: f64,
    pub matched_keywords: BTreeSet<String>,
    pub missing_keywords: BTreeSet<String>,
    pub status: ProcessingStatus,
    /// "tfidf" when scoring ran, for transparency
    pub scorer_backend: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExtractionResult {
    pub fn pending() -> Self {
        Self::default()
    }

    /// Moves to `next` if the lifecycle allows it. Returns whether it moved.
    pub fn transition(&mut self, next: ProcessingStatus) -> bool {
        if self.status.can_transition_to(next) {
            self.status = next;
            true
        } else {
            false
        }
    }

    /// Terminal `error` record: every extracted field is cleared, diagnostics kept.
    pub fn into_error(self, diagnostic: Diagnostic) -> Self {
        let mut diagnostics = self.diagnostics;
        diagnostics.push(diagnostic);
        Self {
            status: ProcessingStatus::Error,
            diagnostics,
            ..Self::default()
        }
    }

    pub fn has_structured_fields(&self) -> bool {
        self.contact != ContactInfo::default()
            || !self.skills.is_empty()
            || !self.experience.is_empty()
            || !self.education.is_empty()
            || !self.matched_keywords.is_empty()
            || !self.missing_keywords.is_empty()
            || self.score != 0.0
    }
}

/// A screened résumé together with the metadata the upload collaborator owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: Uuid,
    pub name: Option<String>,
    pub original_filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub job_id: Option<Uuid>,
    pub result: ExtractionResult,
}

/// Guesses a display name from an upload filename: the first `_`-separated
/// part of the stem, each word capitalized ("jane doe_cv.pdf" → "Jane Doe").
pub fn derive_candidate_name(filename: &str) -> Option<String> {
    let stem = std::path::Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())?;
    let first = stem.split('_').next()?;
    let words: Vec<String> = first.split_whitespace().map(capitalize).collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lifecycle_transitions() {
        use ProcessingStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Processed));
        assert!(Processing.can_transition_to(Error));
        assert!(Pending.can_transition_to(Error));
        assert!(!Processed.can_transition_to(Processing));
        assert!(!Error.can_transition_to(Processed));
        assert!(!Pending.can_transition_to(Processed));
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProcessingStatus::Processed.is_terminal());
        assert!(ProcessingStatus::Error.is_terminal());
        assert!(!ProcessingStatus::Processing.is_terminal());
    }

    #[test]
    fn test_transition_refuses_leaving_terminal_state() {
        let mut result = ExtractionResult::pending();
        assert!(result.transition(ProcessingStatus::Processing));
        assert!(result.transition(ProcessingStatus::Processed));
        assert!(!result.transition(ProcessingStatus::Error));
        assert_eq!(result.status, ProcessingStatus::Processed);
    }

    #[test]
    fn test_into_error_clears_fields_and_keeps_diagnostics() {
        let mut result = ExtractionResult::pending();
        result.raw_text = "python".to_string();
        result.skills.insert("python".to_string());
        result.score = 42.0;

        let result = result.into_error(Diagnostic::new(
            DiagnosticKind::Timeout,
            "pipeline",
            "took too long",
        ));
        assert_eq!(result.status, ProcessingStatus::Error);
        assert!(!result.has_structured_fields());
        assert!(result.raw_text.is_empty());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ProcessingStatus::Processed).unwrap();
        assert_eq!(json, r#""processed""#);
    }

    #[test]
    fn test_experience_summary_skips_missing_fields() {
        let exp = ExperienceSummary {
            most_recent_title: Some("Data Engineer".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&exp).unwrap();
        assert_eq!(json, r#"{"most_recent_title":"Data Engineer"}"#);
    }

    #[test]
    fn test_derive_candidate_name_from_filename() {
        assert_eq!(
            derive_candidate_name("jane doe_resume_2024.pdf").as_deref(),
            Some("Jane Doe")
        );
        assert_eq!(derive_candidate_name("JOHN.docx").as_deref(), Some("John"));
        assert_eq!(derive_candidate_name("_cv.pdf"), None);
    }
}
