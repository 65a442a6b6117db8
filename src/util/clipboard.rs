//! Clipboard copy through external tools.

use std::io::Write;
use std::process::{Command, Stdio};

/// Why a copy did not happen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClipboardError {
    /// Neither `wl-copy` nor `xclip` is installed.
    NoTool {
        /// Whether a Wayland session was detected.
        wayland: bool,
    },
    /// The tool was found but failed.
    Failed(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTool { wayland: true } => f.write_str(
                "Clipboard tool not found. Please install 'wl-clipboard' (provides wl-copy) or 'xclip'.",
            ),
            Self::NoTool { wayland: false } => f.write_str(
                "Clipboard tool not found. Please install 'xclip' or 'wl-clipboard' (wl-copy).",
            ),
            Self::Failed(msg) => write!(f, "Clipboard copy failed: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// What: Append the configured clipboard suffix to a payload.
///
/// Inputs:
/// - `text`: Text to copy
/// - `suffix`: `clipboard_suffix` setting (may be blank)
///
/// Output:
/// - `text`, or `text` followed by a blank line and the suffix
#[must_use]
pub fn with_suffix(text: &str, suffix: &str) -> String {
    if suffix.trim().is_empty() {
        text.to_string()
    } else {
        format!("{text}\n\n{}\n", suffix.trim())
    }
}

/// What: Copy text to the system clipboard.
///
/// Inputs:
/// - `payload`: Text to copy
///
/// Output:
/// - `Ok(tool)` naming the tool used
///
/// # Errors
/// - `NoTool` when no supported tool is installed
/// - `Failed` when the tool could not be run or exited unsuccessfully
///
/// Details:
/// - Wayland sessions try `wl-copy` first; `xclip -selection clipboard` is the fallback.
pub fn copy_to_clipboard(payload: &str) -> Result<&'static str, ClipboardError> {
    let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
    let candidates: &[(&'static str, &[&str])] = if wayland {
        &[("wl-copy", &[]), ("xclip", &["-selection", "clipboard"])]
    } else {
        &[("xclip", &["-selection", "clipboard"]), ("wl-copy", &[])]
    };
    let Some(&(tool, args)) = candidates
        .iter()
        .find(|(tool, _)| which::which(tool).is_ok())
    else {
        tracing::warn!(wayland, "no clipboard tool available");
        return Err(ClipboardError::NoTool { wayland });
    };

    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ClipboardError::Failed(format!("{tool}: {e}")))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(payload.as_bytes())
            .map_err(|e| ClipboardError::Failed(format!("{tool}: {e}")))?;
    }
    let status = child
        .wait()
        .map_err(|e| ClipboardError::Failed(format!("{tool}: {e}")))?;
    if !status.success() {
        return Err(ClipboardError::Failed(format!("{tool} exited with {status}")));
    }
    tracing::info!(tool, bytes = payload.len(), "copied result to clipboard");
    Ok(tool)
}
