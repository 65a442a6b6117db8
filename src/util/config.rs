//! Configuration file parsing utilities.
//!
//! Helpers shared by `settings.conf` loading and saving: comment skipping,
//! key/value splitting, key normalization and inline comment removal.

/// What: Check if a line should be skipped (empty or comment).
///
/// Inputs:
/// - `line`: Line to check
///
/// Output:
/// - `true` if the line should be skipped, `false` otherwise
///
/// Details:
/// - Skips empty lines and lines starting with `#`, `//`, or `;`
#[must_use]
pub fn skip_comment_or_empty(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with(';')
}

/// What: Parse a key-value pair from a line.
///
/// Inputs:
/// - `line`: Line containing key=value format
///
/// Output:
/// - `Some((key, value))` with the key normalized and the value stripped of inline
///   comments; `None` for comments and lines without `=`
#[must_use]
pub fn parse_key_value(line: &str) -> Option<(String, String)> {
    if skip_comment_or_empty(line) {
        return None;
    }
    let (key, value) = line.trim().split_once('=')?;
    let key = normalize_key(key);
    if key.is_empty() {
        return None;
    }
    Some((key, strip_inline_comment(value.trim()).to_string()))
}

/// What: Normalize a settings key.
///
/// Output:
/// - Lowercase key with `.`, `-` and spaces folded to `_`
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace(['.', '-', ' '], "_")
}

/// What: Remove a trailing ` # comment` or ` // comment` from a value.
///
/// Details:
/// - A marker only starts a comment when preceded by whitespace, so URLs
///   (`https://...`) and fragments (`page#top`) survive.
#[must_use]
pub fn strip_inline_comment(value: &str) -> &str {
    let bytes = value.as_bytes();
    for (i, _) in value.match_indices(['#', '/']) {
        let preceded_by_space = i > 0 && bytes[i - 1].is_ascii_whitespace();
        let is_comment = match bytes[i] {
            b'#' => preceded_by_space,
            _ => preceded_by_space && bytes.get(i + 1) == Some(&b'/'),
        };
        if is_comment {
            return value[..i].trim_end();
        }
    }
    value.trim()
}

/// What: Parse a boolean setting value.
///
/// Output:
/// - `true` for `true`, `1`, `yes`, `on` (any case); `false` otherwise
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
