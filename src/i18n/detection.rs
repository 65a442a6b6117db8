//! System locale detection utilities.

use std::env;

/// What: Detect system locale from environment variables.
///
/// Output:
/// - `Option<String>` containing locale code (e.g., "de-DE") or None if not detectable
///
/// Details:
/// - Checks `LC_ALL`, `LC_MESSAGES`, and `LANG` in order
/// - `C` and `POSIX` are treated as "no preference"
pub fn detect_system_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find_map(|raw| parse_locale_string(&raw))
}

/// What: Parse a locale string from environment variables into a standardized format.
///
/// Inputs:
/// - `locale_str`: Locale string like "de_DE.UTF-8", "de-DE", "en_US.utf8@euro"
///
/// Output:
/// - `Option<String>` with standardized format (e.g., "de-DE") or None if invalid
///
/// Details:
/// - Strips encoding (`.UTF-8`) and modifier (`@euro`) suffixes
/// - Language is lowercased, region uppercased
pub(crate) fn parse_locale_string(locale_str: &str) -> Option<String> {
    let trimmed = locale_str.trim();
    let locale_part = trimmed.split(['.', '@']).next()?.replace('_', "-");
    if locale_part.is_empty() || locale_part == "C" || locale_part == "POSIX" {
        return None;
    }

    let parts: Vec<&str> = locale_part.split('-').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [language] => Some(language.to_lowercase()),
        [language, region] => Some(format!(
            "{}-{}",
            language.to_lowercase(),
            region.to_uppercase()
        )),
        _ => None,
    }
}
