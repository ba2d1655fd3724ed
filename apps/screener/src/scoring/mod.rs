//! Relevance Scorer: pluggable, trait-based similarity between a résumé and a job.
//!
//! Default: `TfIdfScorer` (pure Rust, deterministic, no external statistics).
//! The pipeline holds an `Arc<dyn RelevanceScorer>`, chosen at startup.

pub mod keywords;
pub mod tfidf;

use crate::errors::ScoringError;

pub use keywords::{match_keywords, KeywordMatch};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the pipeline.
pub trait RelevanceScorer: Send + Sync {
    /// Reported in `ExtractionResult::scorer_backend`.
    fn backend(&self) -> &'static str;

    /// Similarity in `[0, 100]`, two decimals.
    fn score(&self, resume_text: &str, job_text: &str) -> Result<f64, ScoringError>;
}

// ────────────────────────────────────────────────────────────────────────────
// TfIdfScorer: default backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfScorer;

impl RelevanceScorer for TfIdfScorer {
    fn backend(&self) -> &'static str {
        "tfidf"
    }

    fn score(&self, resume_text: &str, job_text: &str) -> Result<f64, ScoringError> {
        tfidf::similarity(resume_text, job_text)
    }
}

/// TF-IDF score with a degenerate corpus degraded to 0.0.
pub fn score(resume_text: &str, job_text: &str) -> f64 {
    TfIdfScorer.score(resume_text, job_text).unwrap_or(0.0)
}

/// Job text as the job collaborator assembles it: title, description and
/// requirements joined by single spaces.
pub fn job_text(title: &str, description: &str, requirements: &str) -> String {
    [title, description, requirements].join(" ")
}
