use lazy_static::lazy_static;
use regex::Regex;

use crate::models::EducationSummary;

lazy_static! {
    /// Full degree names are case-insensitive; abbreviations and the
    /// `in <Field>` tail are not, so "be" or "me" in prose never match.
    static ref DEGREE: Regex = {
        let full = r"(?i:doctorate|doctor|bachelor|master)\b(?i:'s)?(?:[ \t]+(?i:of)[ \t]+(?i:science|arts|engineering|philosophy))?";
        let abbreviated = r"(?:Ph\.?D|B\.?S|B\.?A|B\.?E|M\.?B\.?A|M\.?S|M\.?A|M\.?E)\b\.?";
        let field = r"(?:[ \t]+in[ \t]+[A-Z][A-Za-z&]*(?:[ \t]+[A-Z][A-Za-z&]*){0,2})?";
        Regex::new(&format!(r"\b(?:{full}|{abbreviated}){field}")).unwrap()
    };
    static ref SCHOOL: Regex = Regex::new(
        r"\b(?:[A-Z][\w.&'-]*[ \t]+){0,4}(?i:University|College|Institute|School|Academy)\b[^\n]*"
    )
    .unwrap();
}

/// Every degree mention and every institution line, deduplicated verbatim.
pub fn extract_education(text: &str) -> EducationSummary {
    let degrees = DEGREE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect();

    let schools = SCHOOL
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    EducationSummary { degrees, schools }
}
