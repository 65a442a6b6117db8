//! Truth value to color band mapping.

use std::sync::LazyLock;

use ratatui::style::Color;
use regex::Regex;

use crate::i18n::labels::{LabelTable, TruthLevel, alternation};
use crate::parse::static_regex;
use crate::state::TRUTH_NOT_AVAILABLE;

/// First unsigned decimal number in a string.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| static_regex(r"\d+(?:\.\d+)?"));

/// Mapper built from the embedded keyword table.
static DEFAULT_MAPPER: LazyLock<TruthColorMapper> = LazyLock::new(TruthColorMapper::default);

/// Discrete severity band for a truth estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorBand {
    /// 80 and above.
    VeryHigh,
    /// 60 to below 80.
    High,
    /// 40 to below 60.
    Mixed,
    /// 20 to below 40.
    Low,
    /// Below 20.
    VeryLow,
    /// No usable value.
    Unknown,
}

impl ColorBand {
    /// What: Band for a numeric score.
    ///
    /// Inputs:
    /// - `score`: Estimate; clamped to `0..=100`
    ///
    /// Output:
    /// - Band by threshold; `Unknown` for NaN
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() {
            return Self::Unknown;
        }
        let s = score.clamp(0.0, 100.0);
        if s >= 80.0 {
            Self::VeryHigh
        } else if s >= 60.0 {
            Self::High
        } else if s >= 40.0 {
            Self::Mixed
        } else if s >= 20.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// CSS-style hex color.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::VeryHigh => "#4CAF50",
            Self::High => "#8BC34A",
            Self::Mixed => "#FFC107",
            Self::Low => "#FF9800",
            Self::VeryLow => "#F44336",
            Self::Unknown => "#888888",
        }
    }

    /// Terminal color matching [`ColorBand::hex`].
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::VeryHigh => Color::Rgb(0x4C, 0xAF, 0x50),
            Self::High => Color::Rgb(0x8B, 0xC3, 0x4A),
            Self::Mixed => Color::Rgb(0xFF, 0xC1, 0x07),
            Self::Low => Color::Rgb(0xFF, 0x98, 0x00),
            Self::VeryLow => Color::Rgb(0xF4, 0x43, 0x36),
            Self::Unknown => Color::Rgb(0x88, 0x88, 0x88),
        }
    }

    /// Stable lowercase name used in JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryHigh => "very_high",
            Self::High => "high",
            Self::Mixed => "mixed",
            Self::Low => "low",
            Self::VeryLow => "very_low",
            Self::Unknown => "unknown",
        }
    }
}

/// A truth estimate as it may arrive: a number or free text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TruthValue<'a> {
    /// Already numeric.
    Number(f64),
    /// Text from a parsed record.
    Text(&'a str),
}

impl From<f64> for TruthValue<'_> {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for TruthValue<'_> {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl<'a> From<&'a str> for TruthValue<'a> {
    fn from(v: &'a str) -> Self {
        Self::Text(v)
    }
}

impl<'a> From<&'a String> for TruthValue<'a> {
    fn from(v: &'a String) -> Self {
        Self::Text(v.as_str())
    }
}

/// Maps truth values to bands using localized keyword sets.
#[derive(Clone, Debug)]
pub struct TruthColorMapper {
    /// One case-insensitive substring matcher per level, in [`TruthLevel::ALL`] order.
    keywords: Vec<(TruthLevel, Regex)>,
}

impl Default for TruthColorMapper {
    fn default() -> Self {
        Self::new(&LabelTable::builtin())
    }
}

impl TruthColorMapper {
    /// What: Compile keyword matchers for every truth level.
    ///
    /// Inputs:
    /// - `labels`: Table providing the high/medium/low words
    ///
    /// Output:
    /// - Mapper; a level whose pattern fails to compile is skipped
    #[must_use]
    pub fn new(labels: &LabelTable) -> Self {
        let keywords = TruthLevel::ALL
            .into_iter()
            .filter_map(|level| {
                let pattern = format!("(?i){}", alternation(labels.keywords(level)));
                match Regex::new(&pattern) {
                    Ok(re) => Some((level, re)),
                    Err(e) => {
                        tracing::error!(?level, error = %e, "truth keyword pattern failed to compile");
                        None
                    }
                }
            })
            .collect();
        Self { keywords }
    }

    /// What: Numeric score behind a truth value.
    ///
    /// Inputs:
    /// - `value`: Number or text
    ///
    /// Output:
    /// - Clamped score, or `None` for `"N/A"`, blank, or unrecognized text
    ///
    /// Details:
    /// - A number anywhere in the text wins over keywords, so `"85 percent"` and
    ///   `85` score the same.
    #[must_use]
    pub fn score<'a>(&self, value: impl Into<TruthValue<'a>>) -> Option<f64> {
        match value.into() {
            TruthValue::Number(n) if n.is_nan() => None,
            TruthValue::Number(n) => Some(n.clamp(0.0, 100.0)),
            TruthValue::Text(text) => {
                let text = text.trim();
                if text.is_empty() || text.eq_ignore_ascii_case(TRUTH_NOT_AVAILABLE) {
                    return None;
                }
                if let Some(n) = NUMBER
                    .find(text)
                    .and_then(|m| m.as_str().parse::<f64>().ok())
                {
                    return Some(n.clamp(0.0, 100.0));
                }
                self.keywords
                    .iter()
                    .find(|(_, re)| re.is_match(text))
                    .map(|(level, _)| level.score())
            }
        }
    }

    /// What: Band for a truth value.
    ///
    /// Inputs:
    /// - `value`: Number or text
    ///
    /// Output:
    /// - Band; `Unknown` when no score can be derived
    #[must_use]
    pub fn color_for<'a>(&self, value: impl Into<TruthValue<'a>>) -> ColorBand {
        self.score(value).map_or(ColorBand::Unknown, ColorBand::from_score)
    }
}

/// What: Band for a truth value using the embedded English and German keywords.
#[must_use]
pub fn color_for<'a>(value: impl Into<TruthValue<'a>>) -> ColorBand {
    DEFAULT_MAPPER.color_for(value)
}
