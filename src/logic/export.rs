//! Plain-text export of a record (the copy-to-clipboard layout).

use std::fmt::Write as _;

use super::links::strip_links;
use crate::state::FactCheckRecord;

/// What: Serialize a record in the fixed copy layout.
///
/// Inputs:
/// - `record`: Parsed result
///
/// Output:
/// - `Truth Percentage`, `Fact Check` and `Context` lines separated by blank lines,
///   then `Sources:` and one `<index>. <title> - <url>` line per source
///
/// Details:
/// - Linked citations are written back as bare `[n]` markers.
#[must_use]
pub fn export_text(record: &FactCheckRecord) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "Truth Percentage: {}\n\nFact Check: {}\n\nContext: {}\n\nSources:",
        record.truth_percentage,
        strip_links(&record.fact_check_text),
        strip_links(&record.context_text),
    );
    for source in &record.sources {
        let _ = write!(out, "\n{}. {} - {}", source.index, source.title, source.url);
    }
    out
}
