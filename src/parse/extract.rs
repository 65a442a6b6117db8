//! Building blocks shared by the parsing strategies.

use std::sync::LazyLock;

use regex::Regex;

use crate::state::Source;

/// Compile a pattern written in this crate.
pub(crate) fn static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex compiles")
}

/// A regex that matches nothing.
pub(super) fn never_matching() -> Regex {
    static_regex("[^\\s\\S]")
}

/// `<number>. <content>` with optional leading blanks or a bullet.
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| static_regex(r"^[ \t]*(?:[-*][ \t]+)?(\d+)\.[ \t]+(.+?)[ \t]*$"));

/// Markdown link `[title](url)`.
pub(super) static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| static_regex(r"\[([^\]]+)\]\(([^)]+)\)"));

/// Sections recovered by one strategy, before defaults and linking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Sources in order of appearance.
    pub sources: Vec<Source>,
    /// Truth value, verbatim.
    pub truth: Option<String>,
    /// Fact-check prose.
    pub fact_check: Option<String>,
    /// Context prose.
    pub context: Option<String>,
}

impl Extraction {
    /// Whether the strategy recovered nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
            && self.truth.is_none()
            && self.fact_check.is_none()
            && self.context.is_none()
    }

    /// Whether any prose section was recovered.
    #[must_use]
    pub const fn has_prose(&self) -> bool {
        self.fact_check.is_some() || self.context.is_some()
    }
}

/// What: Parse one line of a sources list.
///
/// Inputs:
/// - `line`: Candidate item line
///
/// Output:
/// - `Some(Source)` when the line starts with `<number>. `; `None` otherwise
///
/// Details:
/// - A markdown link inside the item supplies title and URL; without one the whole
///   item text becomes the title and the URL is `"#"`.
pub(super) fn parse_source_line(line: &str) -> Option<Source> {
    let caps = NUMBERED_ITEM.captures(line)?;
    let index = caps.get(1)?.as_str();
    let content = caps.get(2)?.as_str();
    if let Some(link) = MARKDOWN_LINK.captures(content)
        && let (Some(title), Some(url)) = (link.get(1), link.get(2))
    {
        return Some(Source::new(index, title.as_str().trim(), url.as_str().trim()));
    }
    Some(Source::unlinked(index, content.trim()))
}

/// What: Parse every numbered item of a sources block.
///
/// Inputs:
/// - `lines`: Lines after the header line
///
/// Output:
/// - Sources in line order; non-item lines are skipped silently
pub(super) fn parse_source_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<Source> {
    lines.filter_map(parse_source_line).collect()
}

/// What: Synthesize sources from every markdown link in free text.
///
/// Inputs:
/// - `text`: Whole response
///
/// Output:
/// - Sources numbered `1..` in order of appearance
pub(super) fn sources_from_links(text: &str) -> Vec<Source> {
    MARKDOWN_LINK
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .enumerate()
        .map(|(i, (title, url))| Source::new((i + 1).to_string(), title.trim(), url.trim()))
        .collect()
}

/// What: Take the first non-empty line of a section body as the truth value.
///
/// Inputs:
/// - `body`: Text after the header colon
///
/// Output:
/// - Trimmed line, `None` when the body is blank
pub(super) fn truth_value(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(ToString::to_string)
}

/// What: Trim a prose section body, treating blank as absent.
pub(super) fn prose_value(body: &str) -> Option<String> {
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
