use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::pipeline::PipelineConfig;

/// Batch runner configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub job_file: Option<PathBuf>,
    pub export_path: PathBuf,
    pub timeout: Duration,
    pub max_concurrency: usize,
    pub strict_decode: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            input_dir: PathBuf::from(require_env("SCREENER_INPUT_DIR")?),
            job_file: std::env::var("SCREENER_JOB_FILE").ok().map(PathBuf::from),
            export_path: std::env::var("SCREENER_EXPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_export_path()),
            timeout: Duration::from_secs(
                parse_env("SCREENER_TIMEOUT_SECS", 30)
                    .context("SCREENER_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_concurrency: parse_env("SCREENER_MAX_CONCURRENCY", 4)
                .context("SCREENER_MAX_CONCURRENCY must be a positive integer")?
                .max(1),
            strict_decode: parse_env("SCREENER_STRICT_DECODE", false)
                .context("SCREENER_STRICT_DECODE must be true or false")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            timeout: self.timeout,
            strict_decode: self.strict_decode,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        Err(_) => Ok(default),
    }
}

fn default_export_path() -> PathBuf {
    PathBuf::from(format!(
        "resumes_export_{}.csv",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("SCREENER_TEST_UNSET_VARIABLE", 30).unwrap();
        assert_eq!(value, 30);
    }

    #[test]
    fn test_require_env_names_missing_key() {
        let err = require_env("SCREENER_TEST_MISSING_REQUIRED").unwrap_err();
        assert!(err.to_string().contains("SCREENER_TEST_MISSING_REQUIRED"));
    }

    #[test]
    fn test_default_export_path_shape() {
        let path = default_export_path();
        let name = path.to_str().unwrap();
        assert!(name.starts_with("resumes_export_") && name.ends_with(".csv"));
    }
}
