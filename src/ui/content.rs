//! Presenter-neutral overlay content.
//!
//! Both presenters render the same [`OverlayView`]: lines made of styled
//! pieces. The TUI maps each [`Tone`] to a ratatui style, the plain presenter
//! prints the text and optionally colors it.

use crate::i18n::Messages;
use crate::logic::{ColorBand, Segment, TruthColorMapper, format_remaining, split_links};
use crate::state::{ErrorKind, FactCheckRecord, LifecycleStatus};

/// How a piece of text should be styled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Section labels.
    Heading,
    /// Regular prose.
    Body,
    /// Secondary text (URLs, countdown, hints).
    Muted,
    /// Linked citation marker.
    Citation,
    /// Truth value in its band color.
    Truth(ColorBand),
    /// Error message.
    Error,
    /// Key hints.
    Keys,
}

/// One styled run of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    /// Style of the run.
    pub tone: Tone,
    /// Text, never containing a newline.
    pub text: String,
}

impl Piece {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// One rendered line; empty for a blank line.
pub type ViewLine = Vec<Piece>;

/// Everything one overlay screen shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayView {
    /// Box title.
    pub title: String,
    /// Content lines.
    pub lines: Vec<ViewLine>,
}

impl OverlayView {
    /// Whether there is nothing to show (the `Idle` screen).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// What: Concatenate a line's pieces without styling.
#[must_use]
pub fn plain_line(line: &[Piece]) -> String {
    line.iter().map(|p| p.text.as_str()).collect()
}

/// What: Translation key of the remediation hint for an error kind.
///
/// Inputs:
/// - `kind`: Classification of the failure
///
/// Output:
/// - Dot-notation key under `app.errors`
#[must_use]
pub const fn remediation_key(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidCredential => "app.errors.credential_help_steps",
        ErrorKind::RateLimited => "app.errors.rate_limit_help",
        ErrorKind::EndpointChanged => "app.errors.endpoint_help",
        ErrorKind::Timeout => "app.errors.timeout_help",
        ErrorKind::UserAborted => "app.errors.aborted_help",
        ErrorKind::NetworkOrUnknown => "app.errors.generic_help",
    }
}

/// Builds overlay views from lifecycle states in the active locale.
#[derive(Clone, Debug)]
pub struct ViewBuilder {
    messages: Messages,
    mapper: TruthColorMapper,
}

impl ViewBuilder {
    /// What: Create a builder.
    ///
    /// Inputs:
    /// - `messages`: UI strings of the active locale
    /// - `mapper`: Truth color mapper built from the same locale's keywords
    #[must_use]
    pub const fn new(messages: Messages, mapper: TruthColorMapper) -> Self {
        Self { messages, mapper }
    }

    /// UI strings used by this builder.
    #[must_use]
    pub const fn messages(&self) -> &Messages {
        &self.messages
    }

    /// What: Build the screen for a lifecycle status.
    ///
    /// Inputs:
    /// - `status`: Current lifecycle status
    ///
    /// Output:
    /// - View titled with the app name; empty for `Idle`
    #[must_use]
    pub fn status(&self, status: &LifecycleStatus) -> OverlayView {
        let m = &self.messages;
        let lines = match status {
            LifecycleStatus::Idle => Vec::new(),
            LifecycleStatus::Loading { remaining_secs } => vec![
                vec![Piece::new(Tone::Body, m.t("app.overlay.loading"))],
                vec![Piece::new(
                    Tone::Muted,
                    m.t_fmt1("app.overlay.remaining", format_remaining(*remaining_secs)),
                )],
                vec![Piece::new(Tone::Muted, m.t("app.overlay.tip"))],
                Vec::new(),
                vec![Piece::new(Tone::Keys, m.t("app.overlay.keys_loading"))],
            ],
            LifecycleStatus::Success(record) => {
                let mut lines = self.record(record);
                lines.push(Vec::new());
                lines.push(vec![Piece::new(Tone::Keys, m.t("app.overlay.keys_result"))]);
                lines
            }
            LifecycleStatus::Error {
                message,
                kind,
                retryable,
            } => self.error(message, *kind, *retryable),
        };
        OverlayView {
            title: m.t("app.title"),
            lines,
        }
    }

    /// What: Build the lines for a parsed record.
    ///
    /// Inputs:
    /// - `record`: Parsed fact check
    ///
    /// Output:
    /// - Truth, fact check, context and sources, separated by blank lines
    ///
    /// Details:
    /// - Linked citations become [`Tone::Citation`] pieces showing `[n]`.
    #[must_use]
    pub fn record(&self, record: &FactCheckRecord) -> Vec<ViewLine> {
        let m = &self.messages;
        let band = self.mapper.color_for(&record.truth_percentage);
        let mut lines = vec![vec![
            Piece::new(Tone::Heading, format!("{}: ", m.t("app.overlay.truth"))),
            Piece::new(Tone::Truth(band), record.truth_percentage.clone()),
        ]];

        for (label, text) in [
            ("app.overlay.fact_check", &record.fact_check_text),
            ("app.overlay.context", &record.context_text),
        ] {
            lines.push(Vec::new());
            lines.push(vec![Piece::new(Tone::Heading, m.t(label))]);
            lines.extend(prose_lines(text));
        }

        lines.push(Vec::new());
        lines.push(vec![Piece::new(Tone::Heading, m.t("app.overlay.sources"))]);
        if record.sources.is_empty() {
            lines.push(vec![Piece::new(Tone::Muted, m.t("app.overlay.no_sources"))]);
        }
        for s in &record.sources {
            let mut line = vec![Piece::new(Tone::Body, format!("{}. {}", s.index, s.title))];
            if s.has_url() {
                line.push(Piece::new(Tone::Muted, format!(" - {}", s.url)));
            }
            lines.push(line);
        }
        lines
    }

    fn error(&self, message: &str, kind: ErrorKind, retryable: bool) -> Vec<ViewLine> {
        let m = &self.messages;
        let mut lines = vec![
            vec![Piece::new(Tone::Heading, m.t("app.overlay.error_title"))],
            vec![Piece::new(Tone::Error, message)],
            Vec::new(),
        ];
        if kind == ErrorKind::InvalidCredential {
            lines.push(vec![Piece::new(
                Tone::Heading,
                m.t("app.errors.credential_help_heading"),
            )]);
        }
        lines.extend(
            m.t(remediation_key(kind))
                .lines()
                .map(|l| vec![Piece::new(Tone::Muted, l)]),
        );
        if kind == ErrorKind::InvalidCredential {
            lines.push(vec![Piece::new(
                Tone::Muted,
                m.t("app.errors.credential_help_link"),
            )]);
        }
        lines.push(Vec::new());
        let keys = if retryable {
            "app.overlay.keys_error_retry"
        } else {
            "app.overlay.keys_error"
        };
        lines.push(vec![Piece::new(Tone::Keys, m.t(keys))]);
        lines
    }
}

/// Split linked prose into lines, turning citations into their own pieces.
fn prose_lines(text: &str) -> Vec<ViewLine> {
    let mut lines = vec![Vec::new()];
    for seg in split_links(text) {
        match seg {
            Segment::Text(t) => {
                for (i, part) in t.split('\n').enumerate() {
                    if i > 0 {
                        lines.push(Vec::new());
                    }
                    let part = part.trim_end_matches('\r');
                    if !part.is_empty() {
                        if let Some(line) = lines.last_mut() {
                            line.push(Piece::new(Tone::Body, part));
                        }
                    }
                }
            }
            Segment::Citation { index, .. } => {
                if let Some(line) = lines.last_mut() {
                    line.push(Piece::new(Tone::Citation, format!("[{index}]")));
                }
            }
        }
    }
    lines
}
