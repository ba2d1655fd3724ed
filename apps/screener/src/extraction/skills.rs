//! Skills Extractor: fixed vocabulary hits plus short noun-phrase candidates.
//!
//! The noun-phrase pass is a shallow chunker: a phrase is a maximal run of word
//! tokens on one line, separated only by spaces or tabs, that contains no
//! stop word and no punctuation. Runs of 2–3 tokens under 30 characters are kept.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::vocabulary::{is_stop_word, SKILL_VOCABULARY};

const MIN_PHRASE_TOKENS: usize = 2;
const MAX_PHRASE_TOKENS: usize = 3;
const MAX_PHRASE_CHARS: usize = 30;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[A-Za-z][A-Za-z0-9+#.'-]*").unwrap();
}

/// Case-folded, deduplicated skill set.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();

    let mut skills: BTreeSet<String> = SKILL_VOCABULARY
        .iter()
        .filter(|term| lowered.contains(*term))
        .map(|term| term.to_string())
        .collect();

    let phrases: Vec<String> = noun_phrases(text)
        .into_iter()
        .filter(|phrase| !skills.contains(phrase))
        .collect();
    skills.extend(phrases);

    skills
}

fn noun_phrases(text: &str) -> Vec<String> {
    let mut phrases = Vec::new();

    for line in text.lines() {
        let mut run: Vec<&str> = Vec::new();
        let mut last_end = 0usize;

        for m in WORD.find_iter(line) {
            let gap = &line[last_end..m.start()];
            if !gap.chars().all(|c| c == ' ' || c == '\t') {
                flush(&mut run, &mut phrases);
            }
            last_end = m.end();

            let raw = m.as_str();
            let (token, ends_sentence) = match raw.strip_suffix('.') {
                Some(stripped) => (stripped, true),
                None => (raw, false),
            };

            if token.is_empty() || is_stop_word(&token.to_lowercase()) {
                flush(&mut run, &mut phrases);
                continue;
            }

            run.push(token);
            if ends_sentence {
                flush(&mut run, &mut phrases);
            }
        }

        flush(&mut run, &mut phrases);
    }

    phrases
}

fn flush(run: &mut Vec<&str>, phrases: &mut Vec<String>) {
    if (MIN_PHRASE_TOKENS..=MAX_PHRASE_TOKENS).contains(&run.len()) {
        let phrase = run.join(" ").to_lowercase();
        if phrase.chars().count() < MAX_PHRASE_CHARS {
            phrases.push(phrase);
        }
    }
    run.clear();
}
