//! Pipeline Orchestrator: decode → extract → score, with a partial-failure policy.
//!
//! Status lifecycle: `pending → processing → {processed, error}`. Only an
//! unsupported format, a timeout, or (in strict mode) an unreadable container
//! end in `error`. Everything else is absorbed as a diagnostic and the record
//! is `processed`.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use bytes::Bytes;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{AppError, ScoringError};
use crate::extraction::{extract_contact, extract_education, extract_experience, extract_skills};
use crate::models::{Diagnostic, DiagnosticKind, ExtractionResult, ProcessingStatus};
use crate::scoring::{match_keywords, RelevanceScorer, TfIdfScorer};
use crate::text::{self, DocumentFormat};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Upper bound for one invocation, decode through scoring.
    pub timeout: Duration,
    /// Treat an unreadable container as fatal instead of "no text".
    pub strict_decode: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            strict_decode: false,
        }
    }
}

/// One document to screen.
#[derive(Debug, Clone)]
pub struct ScreeningRequest {
    /// Correlates log lines; not part of the result.
    pub document_id: Uuid,
    pub document: Bytes,
    /// "pdf" or "docx"; anything else is rejected.
    pub format: String,
    pub job_text: Option<String>,
}

impl ScreeningRequest {
    pub fn new(document: impl Into<Bytes>, format: impl Into<String>) -> Self {
        Self {
            document_id: Uuid::new_v4(),
            document: document.into(),
            format: format.into(),
            job_text: None,
        }
    }

    pub fn with_job(mut self, job_text: impl Into<String>) -> Self {
        self.job_text = Some(job_text.into());
        self
    }
}

/// A screening running in the background.
pub struct ScreeningHandle {
    pub status: watch::Receiver<ProcessingStatus>,
    task: JoinHandle<ExtractionResult>,
}

impl ScreeningHandle {
    pub fn current_status(&self) -> ProcessingStatus {
        *self.status.borrow()
    }

    pub async fn wait(self) -> Result<ExtractionResult, AppError> {
        self.task
            .await
            .map_err(|e| AppError::Internal(anyhow!("screening task failed: {e}")))
    }
}

#[derive(Clone)]
pub struct Pipeline {
    scorer: Arc<dyn RelevanceScorer>,
    config: PipelineConfig,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Arc::new(TfIdfScorer), PipelineConfig::default())
    }
}

impl Pipeline {
    pub fn new(scorer: Arc<dyn RelevanceScorer>, config: PipelineConfig) -> Self {
        Self { scorer, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs one invocation to completion. Never fails: fatal conditions are
    /// reported as an `error` record.
    pub async fn process(&self, request: ScreeningRequest) -> ExtractionResult {
        self.run(request, None).await
    }

    /// Starts an invocation in the background and returns at once.
    pub fn spawn(&self, request: ScreeningRequest) -> ScreeningHandle {
        let (tx, rx) = watch::channel(ProcessingStatus::Pending);
        let pipeline = self.clone();
        let task = tokio::spawn(async move { pipeline.run(request, Some(tx)).await });
        ScreeningHandle { status: rx, task }
    }

    async fn run(
        &self,
        request: ScreeningRequest,
        status_tx: Option<watch::Sender<ProcessingStatus>>,
    ) -> ExtractionResult {
        let document_id = request.document_id;
        let mut result = ExtractionResult::pending();

        let format = match DocumentFormat::from_str(&request.format) {
            Ok(format) => format,
            Err(e) => {
                warn!(%document_id, format = %request.format, "Rejected unsupported format");
                let result = result.into_error(diagnostic_for(&e));
                publish(&status_tx, result.status);
                return result;
            }
        };

        result.transition(ProcessingStatus::Processing);
        publish(&status_tx, result.status);
        info!(%document_id, %format, bytes = request.document.len(), "Screening started");

        let outcome = tokio::time::timeout(
            self.config.timeout,
            self.screen(document_id, format, request.document, request.job_text),
        )
        .await
        .unwrap_or(Err(AppError::Timeout(self.config.timeout)));

        let result = match outcome {
            Ok(mut screened) => {
                screened.transition(ProcessingStatus::Processed);
                info!(
                    %document_id,
                    score = screened.score,
                    skills = screened.skills.len(),
                    diagnostics = screened.diagnostics.len(),
                    "Screening finished"
                );
                screened
            }
            Err(e) => {
                warn!(%document_id, error = %e, "Screening failed");
                result.into_error(diagnostic_for(&e))
            }
        };

        publish(&status_tx, result.status);
        result
    }

    /// Everything after format validation. The returned record is still in
    /// `processing`.
    async fn screen(
        &self,
        document_id: Uuid,
        format: DocumentFormat,
        document: Bytes,
        job_text: Option<String>,
    ) -> Result<ExtractionResult, AppError> {
        let mut result = ExtractionResult {
            status: ProcessingStatus::Processing,
            ..ExtractionResult::default()
        };

        let decoded = tokio::task::spawn_blocking(move || text::extract(&document, format))
            .await
            .map_err(|e| AppError::Internal(anyhow!("text extractor task failed: {e}")))?;

        if let Some(err) = decoded.error {
            if self.config.strict_decode {
                return Err(AppError::Decode(err));
            }
            result.diagnostics.push(Diagnostic::new(
                DiagnosticKind::DecodeError,
                "text_extractor",
                err.to_string(),
            ));
        }

        let text: Arc<str> = Arc::from(decoded.text.as_str());
        result.raw_text = decoded.text;

        let (contact, skills, experience, education) = tokio::join!(
            spawn_extractor(&text, extract_contact),
            spawn_extractor(&text, extract_skills),
            spawn_extractor(&text, extract_experience),
            spawn_extractor(&text, extract_education),
        );
        result.contact = absorb(document_id, "contact", contact, &mut result.diagnostics);
        result.skills = absorb(document_id, "skills", skills, &mut result.diagnostics);
        result.experience = absorb(document_id, "experience", experience, &mut result.diagnostics);
        result.education = absorb(document_id, "education", education, &mut result.diagnostics);

        if let Some(job_text) = job_text {
            self.score(document_id, text, job_text, &mut result).await;
        } else {
            debug!(%document_id, "No job attached, scoring skipped");
        }

        Ok(result)
    }

    /// Scores and matches keywords. Any failure leaves score 0.0 and both
    /// keyword sets empty.
    async fn score(
        &self,
        document_id: Uuid,
        resume_text: Arc<str>,
        job_text: String,
        result: &mut ExtractionResult,
    ) {
        let scorer = Arc::clone(&self.scorer);
        let backend = scorer.backend();
        let scored = tokio::task::spawn_blocking(move || {
            let score = scorer.score(&resume_text, &job_text)?;
            Ok::<_, ScoringError>((score, extract_skills(&job_text)))
        })
        .await;

        let message = match scored {
            Ok(Ok((score, job_skills))) => {
                let keywords = match_keywords(&result.skills, &job_skills);
                result.score = score;
                result.matched_keywords = keywords.matched;
                result.missing_keywords = keywords.missing;
                result.scorer_backend = Some(backend.to_string());
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(e) => format!("scorer task failed: {e}"),
        };

        warn!(%document_id, backend, error = %message, "Scoring degraded to 0");
        result.diagnostics.push(Diagnostic::new(
            DiagnosticKind::ScoringDegradation,
            "scorer",
            message,
        ));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn spawn_extractor<T, F>(text: &Arc<str>, extractor: F) -> JoinHandle<T>
where
    F: FnOnce(&str) -> T + Send + 'static,
    T: Send + 'static,
{
    let text = Arc::clone(text);
    tokio::task::spawn_blocking(move || extractor(&text))
}

/// A panicked extractor contributes an empty field and a diagnostic.
fn absorb<T: Default>(
    document_id: Uuid,
    extractor: &str,
    joined: Result<T, JoinError>,
    diagnostics: &mut Vec<Diagnostic>,
) -> T {
    joined.unwrap_or_else(|e| {
        warn!(%document_id, extractor, error = %e, "Extractor failed");
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::ExtractionDegradation,
            extractor,
            e.to_string(),
        ));
        T::default()
    })
}

fn diagnostic_for(err: &AppError) -> Diagnostic {
    let (kind, component) = match err {
        AppError::UnsupportedFormat(_) => (DiagnosticKind::UnsupportedFormat, "pipeline"),
        AppError::Decode(_) => (DiagnosticKind::DecodeError, "text_extractor"),
        AppError::Timeout(_) => (DiagnosticKind::Timeout, "pipeline"),
        AppError::Internal(_) => (DiagnosticKind::ExtractionDegradation, "pipeline"),
    };
    Diagnostic::new(kind, component, err.to_string())
}

fn publish(status_tx: &Option<watch::Sender<ProcessingStatus>>, status: ProcessingStatus) {
    if let Some(tx) = status_tx {
        tx.send_replace(status);
    }
}
