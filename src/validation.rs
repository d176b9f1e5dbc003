// src/validation.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::WeeklyEntry;

// Matches a word together with the whitespace that follows it, so
// truncation keeps the original spacing.
static WORDS_WITH_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+\s*").expect("word pattern"));

/// Truncates free text to `max_words` words.
pub fn limit_word_count(value: &str, max_words: usize) -> String {
    let words: Vec<&str> = WORDS_WITH_SPACING
        .find_iter(value)
        .map(|m| m.as_str())
        .collect();
    if words.len() <= max_words {
        return value.to_string();
    }
    words[..max_words].concat().trim_end().to_string()
}

/// Enumerates every required field still missing from an entry, as the
/// human-readable list surfaced when an explicit save is blocked. Autosave
/// consults the same list but declines silently.
pub fn required_field_issues(entry: &WeeklyEntry) -> Vec<String> {
    let mut issues = Vec::new();
    if entry.office.trim().is_empty() {
        issues.push("Office is required.".to_string());
    }
    if entry.mentor.trim().is_empty() || entry.mentor == "Select Mentor" {
        issues.push("Mentor is required.".to_string());
    }
    if entry.languages.is_empty() {
        issues.push("Working Language(s) is required.".to_string());
    }
    for (index, matter) in entry.matters.iter().enumerate() {
        let label = format!("Matter {}", index + 1);
        if matter.name.trim().is_empty() {
            issues.push(format!("{label}: Matter Name is required."));
        }
        if matter.owner.trim().is_empty() {
            issues.push(format!("{label}: Supervisor is required."));
        }
    }
    issues
}

pub fn is_valid_for_save(entry: &WeeklyEntry) -> bool {
    required_field_issues(entry).is_empty()
}
