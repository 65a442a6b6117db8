//! Primary strategy: labeled sections, found at line starts or inside a line.

use super::extract::{Extraction, parse_source_lines, prose_value, truth_value};
use super::headers::{HeaderHit, HeaderPatterns};
use crate::i18n::labels::SectionKind;

/// What: Extract the four sections by their headers, in any order.
///
/// Inputs:
/// - `text`: Normalized response
/// - `headers`: Compiled header patterns
///
/// Output:
/// - `Some(Extraction)` when at least one section has content; `None` otherwise
///
/// Details:
/// - A section runs from its header to the next header of any kind or end of text.
/// - When a header repeats, its first occurrence is used.
pub fn scan(text: &str, headers: &HeaderPatterns) -> Option<Extraction> {
    let hits = headers.find_all(text);
    let mut out = Extraction::default();
    for kind in SectionKind::ALL {
        let Some(pos) = hits.iter().position(|h| h.kind == kind) else {
            continue;
        };
        let body = section_body(text, &hits, pos);
        match kind {
            // The header line's own remainder is never a list item.
            SectionKind::Sources => out.sources = parse_source_lines(body.lines().skip(1)),
            SectionKind::Truth => out.truth = truth_value(body),
            SectionKind::FactCheck => out.fact_check = prose_value(body),
            SectionKind::Context => out.context = prose_value(body),
        }
    }
    (!out.is_empty()).then_some(out)
}

/// Slice between hit `pos`'s colon and the following header.
fn section_body<'a>(text: &'a str, hits: &[HeaderHit], pos: usize) -> &'a str {
    let hit = hits[pos];
    let end = hits.get(pos + 1).map_or(text.len(), |next| next.start);
    text.get(hit.body_start..end).unwrap_or_default()
}
