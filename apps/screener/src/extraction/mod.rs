//! Field Extractors: pure functions from decoded text to partial results.
//!
//! Each extractor is independent of the others and never fails; a field that
//! cannot be found is left empty.

pub mod contact;
pub mod education;
pub mod experience;
pub mod skills;

pub use contact::extract_contact;
pub use education::extract_education;
pub use experience::extract_experience;
pub use skills::extract_skills;
