//! Overlay colors (Catppuccin Mocha).

use ratatui::style::{Color, Modifier, Style};

use super::content::Tone;

/// Colors used by both presenters. `None` everywhere when color is disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

/// Box background.
const MANTLE: (u8, u8, u8) = (24, 24, 37); // #181825
/// Primary text.
const TEXT: (u8, u8, u8) = (205, 214, 244); // #cdd6f4
/// Secondary text.
const SUBTEXT: (u8, u8, u8) = (166, 173, 200); // #a6adc8
/// Headings and the border.
const MAUVE: (u8, u8, u8) = (203, 166, 247); // #cba6f7
/// Citation markers.
const SAPPHIRE: (u8, u8, u8) = (116, 199, 236); // #74c7ec
/// Errors.
const RED: (u8, u8, u8) = (243, 139, 168); // #f38ba8
/// Key hints.
const OVERLAY: (u8, u8, u8) = (127, 132, 156); // #7f849c

impl Palette {
    /// What: Palette with color on or off.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether any color is emitted.
    #[must_use]
    pub const fn enabled(self) -> bool {
        self.enabled
    }

    /// What: Foreground color for a tone.
    ///
    /// Output:
    /// - RGB triple, `None` when color is disabled
    #[must_use]
    pub const fn rgb(self, tone: Tone) -> Option<(u8, u8, u8)> {
        if !self.enabled {
            return None;
        }
        Some(match tone {
            Tone::Heading => MAUVE,
            Tone::Body => TEXT,
            Tone::Muted => SUBTEXT,
            Tone::Citation => SAPPHIRE,
            Tone::Error => RED,
            Tone::Keys => OVERLAY,
            Tone::Truth(band) => match band.color() {
                Color::Rgb(r, g, b) => (r, g, b),
                _ => TEXT,
            },
        })
    }

    /// Whether a tone is drawn bold.
    #[must_use]
    pub const fn bold(tone: Tone) -> bool {
        matches!(tone, Tone::Heading | Tone::Truth(_) | Tone::Error)
    }

    /// What: ratatui style for a tone.
    #[must_use]
    pub fn style(self, tone: Tone) -> Style {
        let mut style = Style::default();
        if let Some((r, g, b)) = self.rgb(tone) {
            style = style.fg(Color::Rgb(r, g, b));
        }
        if Self::bold(tone) {
            style = style.add_modifier(Modifier::BOLD);
        }
        if tone == Tone::Citation {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }

    /// Style of the box border and title.
    #[must_use]
    pub fn border(self) -> Style {
        self.style(Tone::Heading)
    }

    /// Style of the box body.
    #[must_use]
    pub fn surface(self) -> Style {
        if self.enabled {
            let (r, g, b) = MANTLE;
            let (tr, tg, tb) = TEXT;
            Style::default()
                .bg(Color::Rgb(r, g, b))
                .fg(Color::Rgb(tr, tg, tb))
        } else {
            Style::default()
        }
    }
}
