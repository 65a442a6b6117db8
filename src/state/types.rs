//! Core value types used by factlens state.

use serde::{Deserialize, Serialize};

use super::error::ErrorKind;

/// Truth value shown when the response carried no usable estimate.
pub const TRUTH_NOT_AVAILABLE: &str = "N/A";
/// Fact-check placeholder when the section is absent.
pub const FACT_CHECK_NOT_PROVIDED: &str = "No fact check provided.";
/// Context placeholder when the section is absent.
pub const CONTEXT_NOT_PROVIDED: &str = "No context provided.";
/// Fact-check text used when the raw response was not text at all.
pub const FACT_CHECK_UNPROCESSABLE: &str = "The API response could not be processed.";
/// Context text used when the raw response was not text at all.
pub const CONTEXT_TRY_AGAIN: &str = "Please try again with a shorter or clearer text.";
/// URL stored for sources whose line carried no markdown link.
pub const UNLINKED_URL: &str = "#";

/// One numbered source cited by the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Citation number as printed (also the `[n]` marker key).
    pub index: String,
    /// Link title, or the whole item text when no link was present.
    pub title: String,
    /// Target URL, `"#"` when none could be parsed.
    pub url: String,
}

impl Source {
    /// What: Build a source from its three parts.
    ///
    /// Inputs:
    /// - `index`: Citation number as text
    /// - `title`: Display title
    /// - `url`: Target URL
    ///
    /// Output:
    /// - New `Source`
    pub fn new(index: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            title: title.into(),
            url: url.into(),
        }
    }

    /// What: Build a source for an item line that had no markdown link.
    ///
    /// Inputs:
    /// - `index`: Citation number as text
    /// - `title`: Whole item text
    ///
    /// Output:
    /// - `Source` whose URL is [`UNLINKED_URL`]
    pub fn unlinked(index: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(index, title, UNLINKED_URL)
    }

    /// Whether the source points somewhere real.
    #[must_use]
    pub fn has_url(&self) -> bool {
        self.url != UNLINKED_URL && !self.url.trim().is_empty()
    }
}

/// Structured result of parsing one model response.
///
/// All four fields are always present; absent sections carry the placeholder
/// constants above so the record can be rendered as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckRecord {
    /// Free-form truth indicator (`"N/A"`, `"75%"`, `"high"`, ...).
    pub truth_percentage: String,
    /// Explanatory prose with citation markers already linked.
    pub fact_check_text: String,
    /// Broader-context prose with citation markers already linked.
    pub context_text: String,
    /// Sources in order of appearance.
    pub sources: Vec<Source>,
}

impl Default for FactCheckRecord {
    fn default() -> Self {
        Self {
            truth_percentage: TRUTH_NOT_AVAILABLE.to_string(),
            fact_check_text: FACT_CHECK_NOT_PROVIDED.to_string(),
            context_text: CONTEXT_NOT_PROVIDED.to_string(),
            sources: Vec::new(),
        }
    }
}

impl FactCheckRecord {
    /// What: Record returned when the raw response is not usable text.
    ///
    /// Output:
    /// - Defaults with the diagnostic fact-check/context sentinels
    ///
    /// Details:
    /// - This is the only record whose placeholders explain what went wrong.
    #[must_use]
    pub fn unprocessable() -> Self {
        Self {
            fact_check_text: FACT_CHECK_UNPROCESSABLE.to_string(),
            context_text: CONTEXT_TRY_AGAIN.to_string(),
            ..Self::default()
        }
    }

    /// Whether a truth value was recovered.
    #[must_use]
    pub fn has_truth(&self) -> bool {
        self.truth_percentage != TRUTH_NOT_AVAILABLE
    }

    /// Whether fact-check prose was recovered.
    #[must_use]
    pub fn has_fact_check(&self) -> bool {
        self.fact_check_text != FACT_CHECK_NOT_PROVIDED
    }

    /// Whether context prose was recovered.
    #[must_use]
    pub fn has_context(&self) -> bool {
        self.context_text != CONTEXT_NOT_PROVIDED
    }
}

/// Inputs captured when a fact check is invoked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestInput {
    /// The claim the user selected.
    pub selection_text: String,
    /// Address of the page the claim came from (may be empty).
    pub page_url: String,
}

impl RequestInput {
    /// What: Capture a claim and its page.
    ///
    /// Inputs:
    /// - `selection_text`: Selected claim
    /// - `page_url`: Page address
    ///
    /// Output:
    /// - New `RequestInput`
    pub fn new(selection_text: impl Into<String>, page_url: impl Into<String>) -> Self {
        Self {
            selection_text: selection_text.into(),
            page_url: page_url.into(),
        }
    }
}

/// Where a single fact-check request currently stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LifecycleStatus {
    /// Nothing requested, or the overlay was dismissed.
    #[default]
    Idle,
    /// Waiting on the remote call; the countdown is display-only.
    Loading {
        /// Seconds left on the displayed estimate.
        remaining_secs: u32,
    },
    /// A response arrived and was parsed.
    Success(FactCheckRecord),
    /// The attempt failed.
    Error {
        /// Human-readable failure message.
        message: String,
        /// Classification used to pick the remediation hint.
        kind: ErrorKind,
        /// Whether a retry is offered.
        retryable: bool,
    },
}

impl LifecycleStatus {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Success(_) => "success",
            Self::Error { .. } => "error",
        }
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Whether the request reached a final state (success or error).
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_fully_populated() {
        let r = FactCheckRecord::default();
        assert_eq!(r.truth_percentage, "N/A");
        assert!(!r.has_truth());
        assert!(!r.has_fact_check());
        assert!(!r.has_context());
        assert!(r.sources.is_empty());
    }

    #[test]
    fn unprocessable_record_carries_diagnostics() {
        let r = FactCheckRecord::unprocessable();
        assert_eq!(r.fact_check_text, FACT_CHECK_UNPROCESSABLE);
        assert_eq!(r.context_text, CONTEXT_TRY_AGAIN);
        assert_eq!(r.truth_percentage, TRUTH_NOT_AVAILABLE);
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let r = FactCheckRecord {
            sources: vec![Source::new("1", "BBC", "http://bbc.com")],
            ..FactCheckRecord::default()
        };
        let v = serde_json::to_value(&r).expect("record serializes");
        assert_eq!(v["truthPercentage"], "N/A");
        assert_eq!(v["sources"][0]["url"], "http://bbc.com");
        assert!(v.get("factCheckText").is_some());
    }

    #[test]
    fn unlinked_source_has_no_url() {
        assert!(!Source::unlinked("2", "Some report").has_url());
        assert!(Source::new("1", "BBC", "http://bbc.com").has_url());
    }
}
