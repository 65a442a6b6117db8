//! Section header patterns compiled from a [`LabelTable`].

use regex::{Captures, Regex};

use super::extract::never_matching;
use crate::i18n::labels::{LabelTable, SectionKind, alternation};

/// Blanks and markdown emphasis/heading marks allowed before a label.
const LEAD: &str = "[ \\t>#*_]*";
/// Blanks and emphasis marks allowed between a label and its colon.
const TRAIL: &str = "[ \\t*_]*";

/// One header occurrence inside a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderHit {
    /// Which section the header opens.
    pub kind: SectionKind,
    /// Byte offset where the header line starts.
    pub start: usize,
    /// Byte offset right after the colon (and trailing emphasis).
    pub body_start: usize,
}

/// Compiled header matchers for both parsing strategies.
#[derive(Clone, Debug)]
pub struct HeaderPatterns {
    /// `Label:` at the start of any line.
    line: Regex,
    /// `Label:` spelled as configured, after a blank inside a line.
    inline: Regex,
    /// `Label:` or a bare `Label` line at the very start of a paragraph.
    paragraph: Regex,
}

impl HeaderPatterns {
    /// What: Compile header patterns for every label in the table.
    ///
    /// Inputs:
    /// - `labels`: Accepted header spellings
    ///
    /// Output:
    /// - Compiled patterns; on a compile error the affected pattern never matches
    #[must_use]
    pub fn new(labels: &LabelTable) -> Self {
        let groups = SectionKind::ALL
            .iter()
            .map(|k| format!("(?P<{}>{})", k.group_name(), alternation(labels.section(*k))))
            .collect::<Vec<_>>()
            .join("|");
        let line = format!("(?im)^{LEAD}(?:{groups}){TRAIL}:{TRAIL}");
        let inline = format!("(?m)[ \\t]+(?P<header>[*_]*(?:{groups}){TRAIL}:{TRAIL})");
        let paragraph =
            format!("(?i)\\A{LEAD}(?:{groups})(?:{TRAIL}:{TRAIL}|{TRAIL}(?:\\r?\\n|\\z))");
        Self {
            line: compile(&line),
            inline: compile(&inline),
            paragraph: compile(&paragraph),
        }
    }

    /// What: Find every header in the response.
    ///
    /// Inputs:
    /// - `text`: Normalized response
    ///
    /// Output:
    /// - Hits in text order
    ///
    /// Details:
    /// - At a line start any capitalization is accepted.
    /// - Inside a line the label must be spelled as configured, so
    ///   `Truth: 75% Fact Check: True.` splits while `the context: ...` does not.
    #[must_use]
    pub fn find_all(&self, text: &str) -> Vec<HeaderHit> {
        let at_line_start = self.line.captures_iter(text).filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(HeaderHit {
                kind: kind_of(&caps)?,
                start: whole.start(),
                body_start: whole.end(),
            })
        });
        let inside_line = self.inline.captures_iter(text).filter_map(|caps| {
            let header = caps.name("header")?;
            Some(HeaderHit {
                kind: kind_of(&caps)?,
                start: header.start(),
                body_start: header.end(),
            })
        });
        let mut hits: Vec<HeaderHit> = at_line_start.chain(inside_line).collect();
        hits.sort_by_key(|h| h.start);
        let mut out: Vec<HeaderHit> = Vec::with_capacity(hits.len());
        for hit in hits {
            // A line-start match already covers `## Truth:`; drop the inner one.
            if out.last().is_some_and(|prev| hit.start < prev.body_start) {
                continue;
            }
            out.push(hit);
        }
        out
    }

    /// What: Classify a paragraph by the header it begins with.
    ///
    /// Inputs:
    /// - `paragraph`: One blank-line separated block
    ///
    /// Output:
    /// - `(kind, body_offset)` when the paragraph opens with a label; `None` otherwise
    ///
    /// Details:
    /// - The colon is optional here as long as the label ends its line, so a bare
    ///   `## Truth` heading still classifies.
    #[must_use]
    pub fn classify_paragraph(&self, paragraph: &str) -> Option<(SectionKind, usize)> {
        let caps = self.paragraph.captures(paragraph)?;
        Some((kind_of(&caps)?, caps.get(0)?.end()))
    }
}

/// Which named group took part in the match.
fn kind_of(caps: &Captures<'_>) -> Option<SectionKind> {
    SectionKind::ALL
        .into_iter()
        .find(|k| caps.name(k.group_name()).is_some())
}

/// Compile a label-derived pattern, degrading to a never-matching regex.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        tracing::error!(error = %e, "header pattern failed to compile; headers disabled");
        never_matching()
    })
}
