//! Utility functions for text cleaning, truncation, and URL resolution.
//!
//! This module provides the small shared helpers used throughout the
//! extraction pipeline:
//! - Stripping markup and collapsing whitespace in extracted text
//! - Length-bounding description text with an ellipsis marker
//! - Resolving possibly-relative references against a base origin

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Maximum length, in characters, of a feed item description.
pub const MAX_DESCRIPTION_LEN: usize = 240;

/// Strip HTML tags and collapse runs of whitespace to single spaces.
///
/// Meta tag content occasionally carries stray markup and newlines; this
/// normalizes any extracted text to a single trimmed line.
pub fn clean_text(text: &str) -> String {
    let stripped = RE_TAGS.replace_all(text, " ");
    RE_WHITESPACE
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

/// Clean text and bound it to `max_len` characters.
///
/// Text longer than `max_len` is cut at `max_len - 1` characters and an
/// ellipsis is appended, so the result is exactly `max_len` characters long.
/// The cut point counts characters, not bytes, so multi-byte text is never
/// split mid-character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate("short text", 240), "short text");
/// assert_eq!(truncate(&"a".repeat(300), 240).chars().count(), 240);
/// ```
pub fn truncate(text: &str, max_len: usize) -> String {
    let cleaned = clean_text(text);
    if cleaned.chars().count() > max_len {
        let mut cut: String = cleaned.chars().take(max_len - 1).collect();
        cut.push('…');
        cut
    } else {
        cleaned
    }
}

/// Resolve a possibly-relative reference against a base origin.
///
/// An absolute reference is returned unchanged. A relative reference is
/// joined against the base per standard URL-joining rules (`..`, leading
/// `/`, query and fragment preserved). This never fails: a reference that
/// cannot be joined at all yields the base itself.
pub fn resolve_url(base: &Url, reference: &str) -> Url {
    if let Ok(absolute) = Url::parse(reference) {
        return absolute;
    }
    base.join(reference).unwrap_or_else(|_| base.clone())
}
