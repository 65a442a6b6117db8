//! Response parsing: raw model output to [`FactCheckRecord`].
//!
//! Parsing never fails. Strategies are tried in order until one recovers
//! something:
//!
//! 1. **section-scan**: `Label:` headers at line starts, each section running to the
//!    next header
//! 2. **paragraph-scan**: blank-line separated paragraphs classified by a leading
//!    label, with markdown links as a last resort for sources
//!
//! Afterwards a missing truth value may be recovered from a percentage in the
//! prose, defaults fill the gaps, and citation markers are linked.

mod extract;
mod headers;
mod paragraphs;
mod recover;
mod sections;
#[cfg(test)]
mod tests;

use std::sync::LazyLock;

use regex::Regex;

pub use extract::Extraction;
pub(crate) use extract::static_regex;
pub use headers::{HeaderHit, HeaderPatterns};

use crate::i18n::LabelTable;
use crate::logic::links::link;
use crate::state::{
    CONTEXT_NOT_PROVIDED, FACT_CHECK_NOT_PROVIDED, FactCheckRecord, TRUTH_NOT_AVAILABLE,
};

/// Reasoning blocks emitted by reasoning models ahead of the answer.
static REASONING_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| static_regex(r"(?s)<think>.*?(?:</think>|\z)"));

/// Three or more consecutive line breaks.
static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| static_regex(r"\n{3,}"));

/// Parser built from the embedded label table.
static DEFAULT_PARSER: LazyLock<ResponseParser> = LazyLock::new(ResponseParser::default);

/// One parsing strategy; `None` means "no match, try the next one".
type Strategy = fn(&str, &HeaderPatterns) -> Option<Extraction>;

/// Strategies in the order they are tried.
const STRATEGIES: [(&str, Strategy); 2] = [
    ("section-scan", sections::scan),
    ("paragraph-scan", paragraphs::scan),
];

/// Turns raw responses into records using a fixed set of header labels.
#[derive(Clone, Debug)]
pub struct ResponseParser {
    headers: HeaderPatterns,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new(&LabelTable::builtin())
    }
}

impl ResponseParser {
    /// What: Build a parser accepting the given header spellings.
    ///
    /// Inputs:
    /// - `labels`: Section labels (English, localized and configured extras)
    ///
    /// Output:
    /// - Parser with compiled header patterns
    #[must_use]
    pub fn new(labels: &LabelTable) -> Self {
        Self {
            headers: HeaderPatterns::new(labels),
        }
    }

    /// What: Parse a raw response string.
    ///
    /// Inputs:
    /// - `raw`: Model output
    ///
    /// Output:
    /// - Fully populated record; an empty string yields [`FactCheckRecord::unprocessable`]
    #[must_use]
    pub fn parse(&self, raw: &str) -> FactCheckRecord {
        if raw.is_empty() {
            tracing::debug!("empty response, nothing to parse");
            return FactCheckRecord::unprocessable();
        }
        let text = normalize(raw);

        let found = STRATEGIES.iter().find_map(|(name, strategy)| {
            let hit = strategy(&text, &self.headers);
            match &hit {
                Some(ex) => tracing::debug!(
                    strategy = name,
                    sources = ex.sources.len(),
                    truth = ex.truth.is_some(),
                    fact_check = ex.fact_check.is_some(),
                    context = ex.context.is_some(),
                    "response sections recovered"
                ),
                None => tracing::debug!(strategy = name, "strategy found nothing"),
            }
            hit
        });
        if found.is_none() {
            tracing::info!(bytes = raw.len(), "response matched no strategy, using defaults");
        }
        let mut ex = found.unwrap_or_default();
        if ex
            .truth
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(TRUTH_NOT_AVAILABLE))
        {
            ex.truth = None;
        }

        if ex.truth.is_none() && ex.has_prose() {
            ex.truth = recover::first_percentage(&text);
            if let Some(truth) = &ex.truth {
                tracing::debug!(truth = %truth, "truth recovered from prose");
            }
        }

        let fact_check_text = ex
            .fact_check
            .map_or_else(|| FACT_CHECK_NOT_PROVIDED.to_string(), |t| link(&t, &ex.sources));
        let context_text = ex
            .context
            .map_or_else(|| CONTEXT_NOT_PROVIDED.to_string(), |t| link(&t, &ex.sources));
        FactCheckRecord {
            truth_percentage: ex.truth.unwrap_or_else(|| TRUTH_NOT_AVAILABLE.to_string()),
            fact_check_text,
            context_text,
            sources: ex.sources,
        }
    }

    /// What: Parse a response that arrived as an arbitrary JSON value.
    ///
    /// Inputs:
    /// - `raw`: Message content as delivered by the service
    ///
    /// Output:
    /// - Parsed record for strings; [`FactCheckRecord::unprocessable`] for anything else
    #[must_use]
    pub fn parse_value(&self, raw: &serde_json::Value) -> FactCheckRecord {
        match raw.as_str() {
            Some(text) => self.parse(text),
            None => {
                tracing::warn!(kind = value_kind(raw), "response content is not text");
                FactCheckRecord::unprocessable()
            }
        }
    }
}

/// What: Parse with the embedded English and German labels.
///
/// Inputs:
/// - `raw`: Model output
///
/// Output:
/// - Parsed record
#[must_use]
pub fn parse(raw: &str) -> FactCheckRecord {
    DEFAULT_PARSER.parse(raw)
}

/// What: Unify line endings, drop reasoning blocks and squeeze runs of blank lines.
///
/// Inputs:
/// - `raw`: Model output
///
/// Output:
/// - Text with `\n` line endings and at most one blank line in a row
///
/// Details:
/// - `<think>...</think>` blocks may quote the template headers, so they are
///   removed before any header is searched for.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let answer = REASONING_BLOCK.replace_all(&unified, "");
    EXCESS_BLANK_LINES.replace_all(&answer, "\n\n").into_owned()
}

/// JSON type name for logs.
const fn value_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
