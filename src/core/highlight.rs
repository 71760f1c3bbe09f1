//! Keyword highlighting for posting titles.

use regex::{Regex, RegexBuilder};

/// Bolds every configured keyword occurring as a whole word in `text`.
///
/// Matching is case-insensitive and preserves the original casing. Keywords
/// are tried longest first within a single pass, so "Systems Administrator"
/// is bolded as one phrase even when "system" is also configured, and no
/// span is ever bolded twice.
pub fn highlight_keywords<S: AsRef<str>>(text: &str, keywords: &[S]) -> String {
    match keyword_pattern(keywords) {
        Some(pattern) => pattern.replace_all(text, "**${0}**").into_owned(),
        None => text.to_string(),
    }
}

/// Build the alternation used by [`highlight_keywords`].
///
/// Returns `None` when there is nothing to highlight.
fn keyword_pattern<S: AsRef<str>>(keywords: &[S]) -> Option<Regex> {
    let mut terms: Vec<&str> = keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .collect();
    if terms.is_empty() {
        return None;
    }

    // Leftmost-first alternation: earlier (longer) alternatives win.
    terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    terms.dedup_by(|a, b| a.eq_ignore_ascii_case(b));

    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
        .case_insensitive(true)
        .build()
        .map_err(|e| tracing::warn!(error = %e, "Failed to build keyword pattern"))
        .ok()
}
