pub mod resume;

pub use resume::{
    derive_candidate_name, ContactInfo, Diagnostic, DiagnosticKind, EducationSummary,
    ExperienceSummary, ExtractionResult, ProcessingStatus, ResumeRecord,
};
