//! Localized label tables for response sections and truth keywords.
//!
//! The model answers in the language of the claim, so a section header may be
//! `Truth:` or `Wahrheit:`. Every accepted spelling lives in data (locale YAML
//! files plus the `fact_check_labels` setting), never inline in the parser.

use serde::Deserialize;

/// The four labeled blocks of the expected response template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Numbered source list.
    Sources,
    /// Truth estimate.
    Truth,
    /// Fact-check prose.
    FactCheck,
    /// Broader context prose.
    Context,
}

impl SectionKind {
    /// All kinds, in template order.
    pub const ALL: [Self; 4] = [Self::Sources, Self::Truth, Self::FactCheck, Self::Context];

    /// Capture-group name used in compiled header patterns.
    #[must_use]
    pub const fn group_name(self) -> &'static str {
        match self {
            Self::Sources => "sources",
            Self::Truth => "truth",
            Self::FactCheck => "fact_check",
            Self::Context => "context",
        }
    }
}

/// Descriptive truth levels a model may answer with instead of a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TruthLevel {
    /// "high", "hoch", ...
    High,
    /// "medium", "mittel", ...
    Medium,
    /// "low", "niedrig", ...
    Low,
}

impl TruthLevel {
    /// Checked in this order; the first matching level wins.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Numeric stand-in used for color banding.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::High => 85.0,
            Self::Medium => 50.0,
            Self::Low => 25.0,
        }
    }
}

/// Labels contributed by one locale file (`labels:` block).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct LocaleLabels {
    /// Spellings of the sources header.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Spellings of the truth header.
    #[serde(default)]
    pub truth: Vec<String>,
    /// Spellings of the fact-check header.
    #[serde(default)]
    pub fact_check: Vec<String>,
    /// Spellings of the context header.
    #[serde(default)]
    pub context: Vec<String>,
    /// Words meaning a high truth estimate.
    #[serde(default)]
    pub truth_high: Vec<String>,
    /// Words meaning a medium truth estimate.
    #[serde(default)]
    pub truth_medium: Vec<String>,
    /// Words meaning a low truth estimate.
    #[serde(default)]
    pub truth_low: Vec<String>,
}

/// Union of every accepted header and keyword spelling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: LocaleLabels,
}

impl LabelTable {
    /// What: Build the table shipped with the binary (English plus German).
    ///
    /// Output:
    /// - Table merged from the embedded `en-US` and `de-DE` locale files
    ///
    /// Details:
    /// - A broken embedded file is logged and skipped; parsing still works
    ///   with whatever labels remain.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for (code, yaml) in super::BUILTIN_LOCALES {
            match super::loader::parse_locale_yaml(yaml) {
                Ok(file) => table.merge(&file.labels),
                Err(e) => tracing::error!(locale = code, error = %e, "embedded locale is invalid"),
            }
        }
        table
    }

    /// What: Add every label of a locale file, skipping spellings already known.
    ///
    /// Inputs:
    /// - `extra`: Labels to add
    pub fn merge(&mut self, extra: &LocaleLabels) {
        push_unique(&mut self.labels.sources, &extra.sources);
        push_unique(&mut self.labels.truth, &extra.truth);
        push_unique(&mut self.labels.fact_check, &extra.fact_check);
        push_unique(&mut self.labels.context, &extra.context);
        push_unique(&mut self.labels.truth_high, &extra.truth_high);
        push_unique(&mut self.labels.truth_medium, &extra.truth_medium);
        push_unique(&mut self.labels.truth_low, &extra.truth_low);
    }

    /// What: Add labels for one section (e.g. a deployment-specific fact-check header).
    ///
    /// Inputs:
    /// - `kind`: Section to extend
    /// - `labels`: New spellings
    pub fn add_section_labels<S: AsRef<str>>(&mut self, kind: SectionKind, labels: &[S]) {
        let owned: Vec<String> = labels.iter().map(|s| s.as_ref().to_string()).collect();
        let target = match kind {
            SectionKind::Sources => &mut self.labels.sources,
            SectionKind::Truth => &mut self.labels.truth,
            SectionKind::FactCheck => &mut self.labels.fact_check,
            SectionKind::Context => &mut self.labels.context,
        };
        push_unique(target, &owned);
    }

    /// Accepted spellings of a section header.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> &[String] {
        match kind {
            SectionKind::Sources => &self.labels.sources,
            SectionKind::Truth => &self.labels.truth,
            SectionKind::FactCheck => &self.labels.fact_check,
            SectionKind::Context => &self.labels.context,
        }
    }

    /// Accepted words for a descriptive truth level.
    #[must_use]
    pub fn keywords(&self, level: TruthLevel) -> &[String] {
        match level {
            TruthLevel::High => &self.labels.truth_high,
            TruthLevel::Medium => &self.labels.truth_medium,
            TruthLevel::Low => &self.labels.truth_low,
        }
    }
}

/// What: Append labels that are not yet present (case-insensitive, trimmed).
fn push_unique(target: &mut Vec<String>, extra: &[String]) {
    for label in extra {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        if !target.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            target.push(label.to_string());
        }
    }
}

/// What: Build a regex alternation matching any of the given labels.
///
/// Inputs:
/// - `labels`: Label spellings
///
/// Output:
/// - Non-capturing alternation, or a never-matching class when `labels` is empty
///
/// Details:
/// - Labels are escaped; inner spaces accept any run of blanks so
///   `Fact  Check` still matches `Fact Check`.
/// - Longer labels come first so a label that prefixes another cannot shadow it.
#[must_use]
pub fn alternation(labels: &[String]) -> String {
    if labels.is_empty() {
        return "[^\\s\\S]".to_string();
    }
    let mut sorted: Vec<&String> = labels.iter().collect();
    sorted.sort_by_key(|l| std::cmp::Reverse(l.chars().count()));
    let parts: Vec<String> = sorted
        .iter()
        .map(|l| {
            l.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join("[ \\t]+")
        })
        .collect();
    format!("(?:{})", parts.join("|"))
}
