//! Raw-mode and alternate-screen handling for the overlay.

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// What: Switch stdout into raw mode on the alternate screen.
///
/// # Errors
/// - When stdout is not a terminal or the mode switch fails
pub fn setup_terminal() -> Result<()> {
    enable_raw_mode()?;
    execute!(std::io::stdout(), EnterAlternateScreen, Hide)?;
    Ok(())
}

/// What: Undo [`setup_terminal`].
///
/// # Errors
/// - When the mode switch fails
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(std::io::stdout(), Show, LeaveAlternateScreen)?;
    Ok(())
}
