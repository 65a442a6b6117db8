//! Small utility helpers: config-line parsing and clipboard access.

pub mod clipboard;
pub mod config;

pub use clipboard::{ClipboardError, copy_to_clipboard, with_suffix};

/// What: Shorten text to at most `max` characters, appending `...` when cut.
///
/// Inputs:
/// - `text`: Text to shorten
/// - `max`: Character budget before the marker
///
/// Output:
/// - `text` unchanged when short enough, otherwise the first `max` chars plus `...`
///
/// Details:
/// - Counts `char`s, so multi-byte text is never split inside a code point.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max: usize) -> std::borrow::Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((cut, _)) => std::borrow::Cow::Owned(format!("{}...", &text[..cut])),
        None => std::borrow::Cow::Borrowed(text),
    }
}
