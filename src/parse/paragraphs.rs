//! Fallback strategy: blank-line separated paragraphs.

use std::sync::LazyLock;

use regex::Regex;

use super::extract::{
    Extraction, parse_source_lines, prose_value, sources_from_links, static_regex, truth_value,
};
use super::headers::HeaderPatterns;
use crate::i18n::labels::SectionKind;

/// A line holding nothing but blanks.
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| static_regex(r"\n[ \t]*\n"));

/// What: Classify paragraphs by a leading label and join continuations.
///
/// Inputs:
/// - `text`: Normalized response
/// - `headers`: Compiled header patterns
///
/// Output:
/// - `Some(Extraction)` when anything was recovered; `None` otherwise
///
/// Details:
/// - Unlabeled paragraphs after a fact-check or context paragraph are appended to it
///   with a single space.
/// - When no numbered source was found, every markdown link in the text becomes a source.
pub fn scan(text: &str, headers: &HeaderPatterns) -> Option<Extraction> {
    let mut out = Extraction::default();
    let mut current: Option<SectionKind> = None;

    for paragraph in PARAGRAPH_BREAK.split(text) {
        let paragraph = paragraph.trim_start_matches('\n');
        if paragraph.trim().is_empty() {
            continue;
        }
        if let Some((kind, offset)) = headers.classify_paragraph(paragraph) {
            current = Some(kind);
            let body = &paragraph[offset..];
            match kind {
                SectionKind::Sources => out.sources.extend(parse_source_lines(body.lines())),
                SectionKind::Truth => {
                    if let Some(v) = truth_value(body) {
                        out.truth = Some(v);
                    }
                }
                SectionKind::FactCheck => append(&mut out.fact_check, body),
                SectionKind::Context => append(&mut out.context, body),
            }
            continue;
        }
        match current {
            Some(SectionKind::FactCheck) => append(&mut out.fact_check, paragraph),
            Some(SectionKind::Context) => append(&mut out.context, paragraph),
            Some(SectionKind::Sources) => out.sources.extend(parse_source_lines(paragraph.lines())),
            Some(SectionKind::Truth) | None => {}
        }
    }

    if out.sources.is_empty() {
        out.sources = sources_from_links(text);
    }
    (!out.is_empty()).then_some(out)
}

/// Space-join `more` onto `slot`, ignoring blank input.
fn append(slot: &mut Option<String>, more: &str) {
    let Some(more) = prose_value(more) else {
        return;
    };
    match slot {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(&more);
        }
        None => *slot = Some(more),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LabelTable;
    use crate::state::Source;

    fn run(text: &str) -> Option<Extraction> {
        scan(text, &HeaderPatterns::new(&LabelTable::builtin()))
    }

    #[test]
    fn bare_headings_and_continuations() {
        let ex = run("## Truth\n60%\n\n**Fact Check**\nMostly right.\n\nBut dated.\n\nContext: Old data.")
            .expect("recovered");
        assert_eq!(ex.truth.as_deref(), Some("60%"));
        assert_eq!(ex.fact_check.as_deref(), Some("Mostly right. But dated."));
        assert_eq!(ex.context.as_deref(), Some("Old data."));
    }

    #[test]
    fn sources_paragraph_lists_items() {
        let ex = run("Quellen\n1. [Spiegel](https://spiegel.de)\n\n2. [Zeit](https://zeit.de)")
            .expect("recovered");
        assert_eq!(
            ex.sources,
            vec![
                Source::new("1", "Spiegel", "https://spiegel.de"),
                Source::new("2", "Zeit", "https://zeit.de"),
            ]
        );
    }

    #[test]
    fn links_become_sources_without_sources_paragraph() {
        let ex = run("Nothing labeled here, see [Reuters](http://reuters.com).").expect("link found");
        assert_eq!(ex.sources, vec![Source::new("1", "Reuters", "http://reuters.com")]);
        assert!(ex.fact_check.is_none());
    }

    #[test]
    fn plain_prose_yields_no_match() {
        assert!(run("The claim cannot be verified.\n\nNo data.").is_none());
    }
}
