//! Text processing utilities for record previews.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of characters in a one-line preview.
pub const PREVIEW_TEXT_LENGTH: usize = 100;

static HTML_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid HTML tag regex"));

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Remove HTML tags, leaving the text content.
pub fn strip_html_tags(html: &str) -> String {
    HTML_TAG_REGEX.replace_all(html, " ").into_owned()
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Single-line preview of `text`, truncated to [`PREVIEW_TEXT_LENGTH`]
/// characters with a trailing ellipsis.
pub fn preview_text(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    if collapsed.chars().count() <= PREVIEW_TEXT_LENGTH {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(PREVIEW_TEXT_LENGTH).collect();
    format!("{}...", truncated.trim_end())
}
