//! Batch runner: screens every allow-listed résumé in a directory with
//! bounded parallelism and pairs each result with its upload metadata.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{derive_candidate_name, ResumeRecord};
use crate::pipeline::{Pipeline, ScreeningRequest};
use crate::text::{allowed_file, DocumentFormat};

/// Job description shared by every résumé in one batch.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub id: Uuid,
    pub text: String,
}

/// Allow-listed files directly inside `dir`, sorted by name.
pub async fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read input directory '{}'", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if allowed_file(name) {
            files.push(path);
        } else {
            info!(file = name, "Skipping file with unsupported extension");
        }
    }

    files.sort();
    Ok(files)
}

/// Screens `files` with at most `max_concurrency` documents in flight.
/// Records come back in the order of `files`.
pub async fn screen_files(
    pipeline: &Pipeline,
    files: Vec<PathBuf>,
    job: Option<BatchJob>,
    max_concurrency: usize,
) -> Result<Vec<ResumeRecord>> {
    let permits = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let permit = Arc::clone(&permits)
            .acquire_owned()
            .await
            .context("Concurrency limiter closed")?;
        let pipeline = pipeline.clone();
        let job = job.clone();

        tasks.spawn(async move {
            let record = screen_file(&pipeline, &path, job.as_ref()).await;
            drop(permit);
            (index, record)
        });
    }

    let mut records = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, record) = joined.context("Screening task panicked")?;
        match record {
            Ok(record) => records.push((index, record)),
            Err(e) => warn!(error = %e, "Skipping unreadable file"),
        }
    }

    records.sort_by_key(|(index, _)| *index);
    Ok(records.into_iter().map(|(_, record)| record).collect())
}

async fn screen_file(
    pipeline: &Pipeline,
    path: &Path,
    job: Option<&BatchJob>,
) -> Result<ResumeRecord> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read '{}'", path.display()))?;

    let format = DocumentFormat::from_filename(&filename)
        .map(DocumentFormat::as_str)
        .unwrap_or_default();
    let mut request = ScreeningRequest::new(bytes, format);
    if let Some(job) = job {
        request = request.with_job(job.text.clone());
    }

    let uploaded_at = Utc::now();
    let result = pipeline.process(request).await;
    info!(
        file = %filename,
        status = result.status.as_str(),
        score = result.score,
        "Résumé screened"
    );

    Ok(ResumeRecord {
        id: Uuid::new_v4(),
        name: derive_candidate_name(&filename),
        original_filename: filename,
        uploaded_at,
        job_id: job.map(|j| j.id),
        result,
    })
}
