use lazy_static::lazy_static;
use regex::Regex;

use crate::models::ExperienceSummary;

const MAX_TITLE_TOKENS: usize = 4;
const OPEN_ENDED: &str = "Present";

lazy_static! {
    static ref DATE_RANGE: Regex = {
        let month = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";
        Regex::new(&format!(
            r"(?i)(\b{month}\s+\d{{4}})\s*-\s*((?:Present|Current|{month}\s+\d{{4}})?)"
        ))
        .unwrap()
    };
    static ref TITLE_LINE: Regex = Regex::new(r"^[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*$").unwrap();
}

/// First date range and first title-looking line. The two are found
/// independently and may describe different roles.
pub fn extract_experience(text: &str) -> ExperienceSummary {
    let (start_date, end_date) = match DATE_RANGE.captures(text) {
        Some(caps) => {
            let start = caps.get(1).map(|m| m.as_str().to_string());
            let end = caps
                .get(2)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(OPEN_ENDED)
                .to_string();
            (start, Some(end))
        }
        None => (None, None),
    };

    let most_recent_title = text
        .lines()
        .map(str::trim)
        .find(|line| {
            TITLE_LINE.is_match(line) && line.split_whitespace().count() <= MAX_TITLE_TOKENS
        })
        .map(str::to_string);

    ExperienceSummary {
        most_recent_title,
        start_date,
        end_date,
    }
}
