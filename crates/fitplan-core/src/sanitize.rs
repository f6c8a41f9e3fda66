//! Response sanitizer: turns raw model text into a JSON value.
//!
//! Models often wrap JSON in a Markdown code fence (optionally tagged with a
//! language, e.g. `json`). The fence is stripped before parsing; nothing
//! else is repaired.

use serde_json::Value;

use crate::error::ServiceError;

const FENCE: &str = "```";

/// Strip surrounding whitespace and an enclosing code fence, if any.
///
/// Only a fence that opens the text is recognized. A language tag directly
/// after the opening fence (`json`, `JSON`, `jsonc`, ...) is dropped along
/// with it.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed;
    }

    let body = trimmed.trim_start_matches('`');
    let body = &body[language_tag_len(body)..];

    body.trim_end().trim_end_matches('`').trim()
}

/// Length of the language tag at the start of a fence body, or 0.
///
/// A tag starts with a letter and must be followed by whitespace or the
/// opening of a JSON object, array, or string, so a bare `true` or `null`
/// body is not mistaken for one.
fn language_tag_len(body: &str) -> usize {
    if !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return 0;
    }
    let end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.')))
        .unwrap_or(body.len());
    match body[end..].chars().next() {
        Some(c) if c.is_whitespace() || matches!(c, '{' | '[' | '"') => end,
        _ => 0,
    }
}

/// Sanitize `raw` and parse it as JSON.
///
/// Any parse failure is a [`ServiceError::InvalidJson`] carrying the original
/// (unsanitized) text.
pub fn sanitize_and_parse(raw: &str) -> Result<Value, ServiceError> {
    let cleaned = strip_code_fence(raw);
    serde_json::from_str(cleaned).map_err(|source| ServiceError::InvalidJson {
        raw: raw.to_owned(),
        source,
    })
}
