//! Best-effort truth recovery from free text.

use std::sync::LazyLock;

use regex::Regex;

use super::extract::static_regex;

/// `75%`, `75 %`, `62.5 percent`, `40 Prozent`; not a tail of a longer number.
static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| {
    static_regex(r"(?i)\b\d{1,3}(?:\.\d+)?(?:[ \t]?%|[ \t]+(?:percent|per[ \t]+cent|prozent)\b)")
});

/// What: Find the first standalone percentage in `text`.
///
/// Inputs:
/// - `text`: Normalized response
///
/// Output:
/// - The match verbatim, or `None`
pub fn first_percentage(text: &str) -> Option<String> {
    PERCENTAGE.find(text).map(|m| m.as_str().to_string())
}
