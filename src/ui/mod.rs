//! Overlay presenters.
//!
//! A presenter owns everything about how a session is shown. The session calls
//! [`OverlayPresenter::render`] after every lifecycle change; user intents flow
//! the other way through the event loop in `app::runtime`.

pub mod content;
pub mod overlay;
pub mod palette;
pub mod plain;

pub use content::{OverlayView, Piece, Tone, ViewBuilder, ViewLine, plain_line, remediation_key};
pub use overlay::{TuiOverlay, draw_overlay};
pub use palette::Palette;
pub use plain::PlainPresenter;

use crate::state::{FactCheckRecord, LifecycleStatus};

/// Result type of presenter calls.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Something that can show the state of one fact-check session.
pub trait OverlayPresenter {
    /// What: Show the screen for a lifecycle status.
    ///
    /// # Errors
    /// - Terminal or writer failures
    fn render(&mut self, status: &LifecycleStatus) -> Result<()>;

    /// What: Show a parsed record on its own (offline parse, final output).
    ///
    /// # Errors
    /// - Terminal or writer failures
    fn render_record(&mut self, record: &FactCheckRecord) -> Result<()>;

    /// What: Show a short transient notice such as "Copied!".
    ///
    /// # Errors
    /// - Terminal or writer failures
    fn notify(&mut self, message: &str) -> Result<()>;

    /// Scroll the content by `lines` (negative is up). Ignored by default.
    ///
    /// # Errors
    /// - Terminal or writer failures
    fn scroll(&mut self, _lines: i16) -> Result<()> {
        Ok(())
    }
}
