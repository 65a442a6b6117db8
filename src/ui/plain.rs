//! Line-oriented presenter for pipes and non-interactive terminals.

use std::io::Write;

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};

use super::content::{Tone, ViewBuilder, ViewLine};
use super::palette::Palette;
use super::{OverlayPresenter, Result};
use crate::state::{FactCheckRecord, LifecycleStatus};

/// Writes overlay content as plain lines.
///
/// Key hints are left out since there is nothing to press. The loading screen
/// is printed once per request; countdown ticks are not repeated.
pub struct PlainPresenter<W: Write> {
    out: W,
    views: ViewBuilder,
    palette: Palette,
    loading_shown: bool,
}

impl<W: Write> PlainPresenter<W> {
    /// What: Create a presenter writing to `out`.
    ///
    /// Inputs:
    /// - `out`: Destination, usually stdout
    /// - `views`: Content builder for the active locale
    /// - `palette`: Colors; disable for pipes and `--no-color`
    pub const fn new(out: W, views: ViewBuilder, palette: Palette) -> Self {
        Self {
            out,
            views,
            palette,
            loading_shown: false,
        }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, lines: &[ViewLine]) -> Result<()> {
        for line in lines {
            if line.iter().any(|p| p.tone == Tone::Keys) {
                continue;
            }
            for piece in line {
                match self.palette.rgb(piece.tone) {
                    Some((r, g, b)) => {
                        queue!(self.out, SetForegroundColor(Color::Rgb { r, g, b }))?;
                        if Palette::bold(piece.tone) {
                            queue!(self.out, SetAttribute(Attribute::Bold))?;
                        }
                        queue!(
                            self.out,
                            Print(&piece.text),
                            SetAttribute(Attribute::Reset),
                            ResetColor
                        )?;
                    }
                    None => queue!(self.out, Print(&piece.text))?,
                }
            }
            queue!(self.out, Print('\n'))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> OverlayPresenter for PlainPresenter<W> {
    fn render(&mut self, status: &LifecycleStatus) -> Result<()> {
        match status {
            LifecycleStatus::Idle => {
                self.loading_shown = false;
                Ok(())
            }
            LifecycleStatus::Loading { .. } if self.loading_shown => Ok(()),
            LifecycleStatus::Loading { .. } => {
                self.loading_shown = true;
                let view = self.views.status(status);
                self.write_lines(&view.lines)
            }
            LifecycleStatus::Success(_) | LifecycleStatus::Error { .. } => {
                self.loading_shown = false;
                let view = self.views.status(status);
                self.write_lines(&view.lines)
            }
        }
    }

    fn render_record(&mut self, record: &FactCheckRecord) -> Result<()> {
        let lines = self.views.record(record);
        self.write_lines(&lines)
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::load_localization;
    use crate::logic::TruthColorMapper;
    use crate::state::{ErrorKind, Source};

    fn presenter(color: bool) -> PlainPresenter<Vec<u8>> {
        let l = load_localization("en-US", &[]);
        let views = ViewBuilder::new(l.messages, TruthColorMapper::new(&l.labels));
        PlainPresenter::new(Vec::new(), views, Palette::new(color))
    }

    fn output(p: PlainPresenter<Vec<u8>>) -> String {
        String::from_utf8(p.into_inner()).expect("utf-8 output")
    }

    #[test]
    /// What: Loading prints once, the result follows with bare citation markers.
    fn loading_then_success_without_color() {
        let mut p = presenter(false);
        p.render(&LifecycleStatus::Loading { remaining_secs: 120 })
            .expect("writes");
        p.render(&LifecycleStatus::Loading { remaining_secs: 119 })
            .expect("writes");
        let record = FactCheckRecord {
            truth_percentage: "75%".to_string(),
            fact_check_text: "Claim is mostly true [\\[1\\]](http://bbc.com).".to_string(),
            context_text: "Reported widely.".to_string(),
            sources: vec![Source::new("1", "BBC", "http://bbc.com")],
        };
        p.render(&LifecycleStatus::Success(record)).expect("writes");

        let out = output(p);
        assert_eq!(out.matches("Remaining time").count(), 1);
        assert!(out.contains("Truth Percentage: 75%\n"));
        assert!(out.contains("Claim is mostly true [1].\n"));
        assert!(out.contains("1. BBC - http://bbc.com\n"));
        assert!(!out.contains("[c] copy"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn colored_output_uses_escape_codes() {
        let mut p = presenter(true);
        p.render(&LifecycleStatus::Error {
            message: "Request timed out".to_string(),
            kind: ErrorKind::Timeout,
            retryable: true,
        })
        .expect("writes");
        let out = output(p);
        assert!(out.contains('\x1b'));
        assert!(out.contains("Request timed out"));
    }

    #[test]
    fn notices_are_plain_lines() {
        let mut p = presenter(true);
        p.notify("Copied!").expect("writes");
        assert_eq!(output(p), "Copied!\n");
    }
}
