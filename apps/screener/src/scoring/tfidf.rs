//! TF-IDF cosine similarity over the two-document corpus {résumé, job}.
//!
//! Weighting: raw term counts, smooth idf `ln((1 + n) / (1 + df)) + 1`, L2
//! normalization. Terms are runs of two or more word characters, lowercased,
//! minus the English stop words. Vectors are keyed by a `BTreeMap` so every sum
//! runs in sorted term order and the result does not depend on argument order.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::ScoringError;
use crate::vocabulary::is_stop_word;

const CORPUS_SIZE: f64 = 2.0;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"(?u)\b\w\w+\b").unwrap();
}

type TermVector = BTreeMap<String, f64>;

/// Cosine similarity as a percentage with two decimals, in `[0, 100]`.
pub fn similarity(resume_text: &str, job_text: &str) -> Result<f64, ScoringError> {
    if resume_text.trim().is_empty() || job_text.trim().is_empty() {
        return Ok(0.0);
    }

    let resume_counts = term_counts(resume_text);
    let job_counts = term_counts(job_text);
    if resume_counts.is_empty() && job_counts.is_empty() {
        return Err(ScoringError::EmptyVocabulary);
    }

    let resume_vec = weigh(&resume_counts, &job_counts);
    let job_vec = weigh(&job_counts, &resume_counts);

    let dot: f64 = resume_vec
        .iter()
        .filter_map(|(term, a)| job_vec.get(term).map(|b| a * b))
        .sum();

    let percent = (dot * 100.0 * 100.0).round() / 100.0;
    Ok(percent.clamp(0.0, 100.0))
}

fn term_counts(text: &str) -> TermVector {
    let lowered = text.to_lowercase();
    let mut counts = TermVector::new();
    for m in TOKEN.find_iter(&lowered) {
        let term = m.as_str();
        if is_stop_word(term) {
            continue;
        }
        *counts.entry(term.to_string()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Applies idf against the other document and L2-normalizes.
fn weigh(counts: &TermVector, other: &TermVector) -> TermVector {
    let mut weighted: TermVector = counts
        .iter()
        .map(|(term, tf)| {
            let df = if other.contains_key(term) { 2.0 } else { 1.0 };
            let idf = ((1.0 + CORPUS_SIZE) / (1.0 + df)).ln() + 1.0;
            (term.clone(), tf * idf)
        })
        .collect();

    let norm = weighted.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in weighted.values_mut() {
            *w /= norm;
        }
    }
    weighted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_documents_score_full() {
        let text = "Python developer with AWS and Docker experience";
        assert_eq!(similarity(text, text).unwrap(), 100.0);
    }

    #[test]
    fn test_disjoint_documents_score_zero() {
        assert_eq!(similarity("python django", "welding carpentry").unwrap(), 0.0);
    }

    #[test]
    fn test_symmetric_bit_for_bit() {
        let resume = "Senior Python engineer. Built AWS pipelines, Kubernetes, Terraform and Python tooling.";
        let job = "Looking for a Python engineer with Docker and AWS; Kubernetes a plus.";
        let forward = similarity(resume, job).unwrap();
        let backward = similarity(job, resume).unwrap();
        assert_eq!(forward.to_bits(), backward.to_bits());
        assert!(forward > 0.0 && forward < 100.0);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(similarity("python", "").unwrap(), 0.0);
        assert_eq!(similarity("", "python").unwrap(), 0.0);
        assert_eq!(similarity("   ", "python").unwrap(), 0.0);
    }

    #[test]
    fn test_stop_words_only_is_empty_vocabulary() {
        let err = similarity("the and of", "a an it").unwrap_err();
        assert_eq!(err, ScoringError::EmptyVocabulary);
    }

    #[test]
    fn test_single_letter_tokens_are_ignored() {
        assert_eq!(similarity("c r", "c r python").unwrap(), 0.0);
    }

    #[test]
    fn test_score_has_two_decimals() {
        let score = similarity("python aws docker sql", "python java go rust").unwrap();
        assert_eq!((score * 100.0).round() / 100.0, score);
    }
}
