use std::collections::BTreeSet;

/// Keyword overlap between résumé skills and job skills.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMatch {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
}

/// `matched = resume ∩ job`, `missing = job − resume`. Together they cover the
/// job's skill set exactly.
pub fn match_keywords(resume_skills: &BTreeSet<String>, job_skills: &BTreeSet<String>) -> KeywordMatch {
    let (matched, missing) = job_skills
        .iter()
        .cloned()
        .partition(|skill| resume_skills.contains(skill));
    KeywordMatch { matched, missing }
}
