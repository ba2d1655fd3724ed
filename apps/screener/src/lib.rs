//! Résumé screening core: decode a PDF or DOCX résumé, extract structured
//! candidate fields, and score it against an optional job description.

pub mod batch;
pub mod config;
pub mod errors;
pub mod export;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod scoring;
pub mod text;
pub mod vocabulary;

pub use errors::AppError;
pub use models::{ExtractionResult, ProcessingStatus, ResumeRecord};
pub use pipeline::{Pipeline, PipelineConfig, ScreeningHandle, ScreeningRequest};
