//! Centered ratatui overlay box.

use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::content::{OverlayView, Tone, ViewBuilder, plain_line};
use super::palette::Palette;
use super::{OverlayPresenter, Result};
use crate::state::{FactCheckRecord, LifecycleStatus};

/// Widest the box gets, borders included.
const MAX_WIDTH: u16 = 84;

/// What: Estimate how many rows the lines take once wrapped.
///
/// Inputs:
/// - `view`: Content
/// - `width`: Inner width of the box
///
/// Output:
/// - Row count, at least one per line
fn wrapped_rows(view: &OverlayView, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = view
        .lines
        .iter()
        .map(|l| plain_line(l).as_str().width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// What: Draw one overlay frame.
///
/// Inputs:
/// - `f`: Frame to render into
/// - `view`: Content to show; an empty view clears the screen
/// - `notice`: Transient message shown in the bottom border
/// - `palette`: Colors
/// - `scroll`: Requested scroll offset in rows
///
/// Output:
/// - Largest useful scroll offset for this frame size
///
/// Details:
/// - The box is centered, at most [`MAX_WIDTH`] wide, and only as tall as its
///   content (bounded by the screen).
pub fn draw_overlay(
    f: &mut Frame,
    view: &OverlayView,
    notice: Option<&str>,
    palette: Palette,
    scroll: u16,
) -> u16 {
    let area = f.area();
    f.render_widget(Clear, area);
    if view.is_empty() {
        return 0;
    }

    let w = area.width.saturating_sub(4).min(MAX_WIDTH);
    let rows = wrapped_rows(view, w.saturating_sub(2));
    let h = rows.saturating_add(2).min(area.height.saturating_sub(2));
    let max_scroll = rows.saturating_sub(h.saturating_sub(2));
    let rect = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w,
        height: h,
    };

    let lines: Vec<Line<'_>> = view
        .lines
        .iter()
        .map(|line| {
            Line::from(
                line.iter()
                    .map(|p| Span::styled(p.text.as_str(), palette.style(p.tone)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let mut block = Block::default()
        .title(Span::styled(format!(" {} ", view.title), palette.border()))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(palette.border())
        .style(palette.surface());
    if let Some(n) = notice {
        block = block.title_bottom(
            Line::from(Span::styled(format!(" {n} "), palette.style(Tone::Citation)))
                .right_aligned(),
        );
    }

    let body = Paragraph::new(lines)
        .style(palette.surface())
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(max_scroll), 0))
        .block(block);
    f.render_widget(Clear, rect);
    f.render_widget(body, rect);
    max_scroll
}

/// Overlay drawn into a ratatui terminal.
pub struct TuiOverlay<B: Backend> {
    terminal: Terminal<B>,
    views: ViewBuilder,
    palette: Palette,
    view: OverlayView,
    notice: Option<String>,
    scroll: u16,
}

impl<B> TuiOverlay<B>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    /// What: Wrap a backend.
    ///
    /// Inputs:
    /// - `backend`: Crossterm backend, or `TestBackend` in tests
    /// - `views`: Content builder for the active locale
    /// - `palette`: Colors
    ///
    /// # Errors
    /// - Backend initialization failures
    pub fn new(backend: B, views: ViewBuilder, palette: Palette) -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            views,
            palette,
            view: OverlayView::default(),
            notice: None,
            scroll: 0,
        })
    }

    /// The backend, for inspecting test output.
    #[must_use]
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// Content currently shown.
    #[must_use]
    pub const fn view(&self) -> &OverlayView {
        &self.view
    }

    fn show(&mut self, view: OverlayView) -> Result<()> {
        if view != self.view {
            self.scroll = 0;
        }
        self.view = view;
        self.notice = None;
        self.redraw()
    }

    fn redraw(&mut self) -> Result<()> {
        let (view, notice, palette) = (&self.view, self.notice.as_deref(), self.palette);
        let scroll = self.scroll;
        let mut max_scroll = 0;
        self.terminal.draw(|f| {
            max_scroll = draw_overlay(f, view, notice, palette, scroll);
        })?;
        self.scroll = self.scroll.min(max_scroll);
        Ok(())
    }
}

impl<B> OverlayPresenter for TuiOverlay<B>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    fn render(&mut self, status: &LifecycleStatus) -> Result<()> {
        let view = self.views.status(status);
        self.show(view)
    }

    fn render_record(&mut self, record: &FactCheckRecord) -> Result<()> {
        let view = OverlayView {
            title: self.views.messages().t("app.title"),
            lines: self.views.record(record),
        };
        self.show(view)
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        self.notice = Some(message.to_string());
        self.redraw()
    }

    fn scroll(&mut self, lines: i16) -> Result<()> {
        self.scroll = self.scroll.saturating_add_signed(lines);
        self.redraw()
    }
}
