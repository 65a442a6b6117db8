//! Command-line argument definition and processing.

use clap::Parser;

use crate::config::Settings;

/// factlens - fact-check a claim and show truth, explanation and sources
#[derive(Parser, Debug, Default)]
#[command(name = "factlens")]
#[command(version)]
#[command(about = "Fact-check a claim against a language-model API and show truth, explanation and sources", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Claim to fact-check (read from stdin when omitted and stdin is not a terminal)
    pub claim: Option<String>,

    /// Address of the page the claim comes from; its visible text is sent as context
    #[arg(short, long)]
    pub url: Option<String>,

    /// Use the content of this file as page context instead of fetching the URL
    #[arg(long)]
    pub context_file: Option<String>,

    /// Parse a saved raw model response and show it, without any network request
    #[arg(long)]
    pub parse_file: Option<String>,

    /// Print plain lines instead of the overlay
    #[arg(long)]
    pub plain: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Copy the result to the clipboard when it arrives (plain and JSON output; press `c` in the overlay)
    #[arg(long)]
    pub copy: bool,

    /// UI and label locale (e.g. de-DE); overrides the setting
    #[arg(long)]
    pub locale: Option<String>,

    /// Prompt for a Perplexity API key, validate it and save it to settings.conf
    #[arg(long)]
    pub set_key: bool,

    /// Send a minimal request to check the configured API key
    #[arg(long)]
    pub test_key: bool,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// What: Decide whether colors are used.
    ///
    /// Inputs:
    /// - `settings`: Loaded settings
    ///
    /// Output:
    /// - `false` when `--no-color`, `color = false` or `NO_COLOR` says so
    #[must_use]
    pub fn use_color(&self, settings: &Settings) -> bool {
        !self.no_color
            && settings.color
            && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
    }
}

/// What: Handle early-exit flags.
///
/// Inputs:
/// - `args`: Parsed command-line arguments
/// - `settings`: Loaded settings
///
/// Output:
/// - `Some(exit_code)` when a flag was handled and the program should stop,
///   `None` to continue with a fact check
///
/// Details:
/// - `--set-key` runs before `--test-key`, so both together save then test.
pub async fn process_args(args: &Args, settings: &Settings) -> Option<i32> {
    use crate::args::key;

    if !(args.set_key || args.test_key) {
        return None;
    }
    let messages = crate::i18n::load_localization(
        &crate::i18n::resolve_locale(args.locale.as_deref(), settings.locale.as_deref()),
        &[],
    )
    .messages;
    if args.set_key {
        let code = key::handle_set_key(&messages);
        if code != 0 || !args.test_key {
            return Some(code);
        }
    }
    Some(key::handle_test_key(settings, &messages).await)
}
