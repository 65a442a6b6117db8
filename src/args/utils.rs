//! Shared utilities for argument processing.

use std::io::{IsTerminal, Read};

/// What: Determine the log level based on command-line arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides `log_level` argument.
#[must_use]
pub fn determine_log_level(args: &crate::args::Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}

/// What: Resolve the claim text.
///
/// Inputs:
/// - `args`: Parsed command-line arguments
///
/// Output:
/// - Trimmed claim from the argument, else from piped stdin; `None` when empty
pub fn read_claim(args: &crate::args::Args) -> Option<String> {
    let raw = if let Some(claim) = &args.claim {
        claim.clone()
    } else if std::io::stdin().is_terminal() {
        return None;
    } else {
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
            tracing::warn!(error = %e, "failed to read claim from stdin");
            return None;
        }
        buf
    };
    let claim = raw.trim();
    (!claim.is_empty()).then(|| claim.to_string())
}
