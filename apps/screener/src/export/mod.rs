//! Tabular export of screened résumés, one CSV row per record.

use std::collections::BTreeSet;
use std::io::Write;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::ExportError;
use crate::models::ResumeRecord;

const NOT_AVAILABLE: &str = "N/A";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "Upload Date")]
    pub upload_date: String,
    #[serde(rename = "Score")]
    pub score: String,
    #[serde(rename = "Skills")]
    pub skills: String,
    #[serde(rename = "Experience")]
    pub experience: String,
    #[serde(rename = "Education")]
    pub education: String,
    #[serde(rename = "Matched Keywords")]
    pub matched_keywords: String,
    #[serde(rename = "Missing Keywords")]
    pub missing_keywords: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl ExportRow {
    pub fn from_record(record: &ResumeRecord) -> Result<Self, ExportError> {
        let result = &record.result;
        let experience = if result.experience.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            serde_json::to_string_pretty(&result.experience)?
        };
        let education = if result.education.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            serde_json::to_string_pretty(&result.education)?
        };

        Ok(Self {
            id: record.id.to_string(),
            name: or_na(record.name.as_deref()),
            email: or_na(result.contact.email.as_deref()),
            phone: or_na(result.contact.phone.as_deref()),
            filename: record.original_filename.clone(),
            upload_date: record.uploaded_at.format(DATE_FORMAT).to_string(),
            score: match record.job_id {
                Some(_) => format!("{:?}%", result.score),
                None => NOT_AVAILABLE.to_string(),
            },
            skills: join_or_na(&result.skills),
            experience,
            education,
            matched_keywords: join_or_na(&result.matched_keywords),
            missing_keywords: join_or_na(&result.missing_keywords),
            status: result.status.label().to_string(),
        })
    }
}

/// One row per record, optionally restricted to a single job.
pub fn build_rows(
    records: &[ResumeRecord],
    job_filter: Option<Uuid>,
) -> Result<Vec<ExportRow>, ExportError> {
    records
        .iter()
        .filter(|r| job_filter.map_or(true, |job_id| r.job_id == Some(job_id)))
        .map(ExportRow::from_record)
        .collect()
}

/// Writes a header line followed by `rows`.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv_writer.write_record(HEADERS)?;
    }
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub const HEADERS: [&str; 13] = [
    "ID",
    "Name",
    "Email",
    "Phone",
    "Filename",
    "Upload Date",
    "Score",
    "Skills",
    "Experience",
    "Education",
    "Matched Keywords",
    "Missing Keywords",
    "Status",
];

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn join_or_na(items: &BTreeSet<String>) -> String {
    if items.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}
