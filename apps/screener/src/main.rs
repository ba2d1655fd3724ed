use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use screener::batch::{scan_directory, screen_files, BatchJob};
use screener::config::Config;
use screener::export::{build_rows, write_csv};
use screener::scoring::{RelevanceScorer, TfIdfScorer};
use screener::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    let job = match &config.job_file {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read job file '{}'", path.display()))?;
            info!(job_file = %path.display(), "Job description loaded");
            Some(BatchJob {
                id: Uuid::new_v4(),
                text,
            })
        }
        None => None,
    };

    let scorer: Arc<dyn RelevanceScorer> = Arc::new(TfIdfScorer);
    info!("Relevance scorer initialized (backend: {})", scorer.backend());
    let pipeline = Pipeline::new(scorer, config.pipeline_config());

    let files = scan_directory(&config.input_dir).await?;
    info!(
        input_dir = %config.input_dir.display(),
        files = files.len(),
        max_concurrency = config.max_concurrency,
        "Screening résumés"
    );

    let records = screen_files(&pipeline, files, job, config.max_concurrency).await?;

    let rows = build_rows(&records, None)?;
    let file = std::fs::File::create(&config.export_path).with_context(|| {
        format!("Failed to create export '{}'", config.export_path.display())
    })?;
    write_csv(&rows, std::io::BufWriter::new(file))?;

    info!(
        export = %config.export_path.display(),
        rows = rows.len(),
        "Export written"
    );

    Ok(())
}
