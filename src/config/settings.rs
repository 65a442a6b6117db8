//! `settings.conf` model, parser and skeleton.

use std::fs;
use std::path::Path;

use crate::util::config::{parse_bool, parse_key_value};

/// Default chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.perplexity.ai/chat/completions";
/// Default model name.
pub const DEFAULT_MODEL: &str = "sonar-reasoning-pro";

/// Written when no `settings.conf` exists yet.
pub const SETTINGS_SKELETON_CONTENT: &str = "# factlens settings\n\
#\n\
# Format: key = value\n\
# Lines starting with #, // or ; are comments.\n\
#\n\
# API key for the fact-check service. Prefer `factlens --set-key` or the\n\
# FACTLENS_API_KEY environment variable over editing this line by hand.\n\
# api_key =\n\
#\n\
# Endpoint and model\n\
api_url = https://api.perplexity.ai/chat/completions\n\
model = sonar-reasoning-pro\n\
#\n\
# UI language (e.g. en-US, de-DE). Empty: follow the system locale.\n\
locale =\n\
#\n\
# Hard ceiling for one request, in seconds\n\
request_timeout_secs = 120\n\
# Countdown shown while waiting, in seconds (display only)\n\
countdown_secs = 120\n\
#\n\
# Page text sent along with the claim is cut to this many characters\n\
max_context_chars = 5000\n\
max_tokens = 2048\n\
temperature = 0.1\n\
#\n\
# Extra fact-check section headers the model may use (comma separated)\n\
fact_check_labels =\n\
#\n\
# Text appended when copying a result to the clipboard\n\
clipboard_suffix =\n\
#\n\
# Colored truth values and accents\n\
color = true\n";

/// User settings. The API key is handled by the credential store instead.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Chat-completions endpoint.
    pub api_url: String,
    /// Model name sent with each request.
    pub model: String,
    /// Preferred UI locale.
    pub locale: Option<String>,
    /// Hard ceiling for one request, in seconds.
    pub request_timeout_secs: u64,
    /// Display countdown budget, in seconds.
    pub countdown_secs: u32,
    /// Page context character cap.
    pub max_context_chars: usize,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Deployment-specific fact-check headers.
    pub fact_check_labels: Vec<String>,
    /// Appended to clipboard copies.
    pub clipboard_suffix: String,
    /// Use colors in output.
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            locale: None,
            request_timeout_secs: 120,
            countdown_secs: 120,
            max_context_chars: 5000,
            max_tokens: 2048,
            temperature: 0.1,
            fact_check_labels: Vec::new(),
            clipboard_suffix: String::new(),
            color: true,
        }
    }
}

/// What: Parse `settings.conf` content on top of the defaults.
///
/// Inputs:
/// - `content`: File content
///
/// Output:
/// - Settings; malformed values keep their defaults and are logged
///
/// Details:
/// - `api_key` is recognized but not stored here.
/// - Unknown keys are logged at debug level and ignored.
#[must_use]
pub fn parse_settings(content: &str) -> Settings {
    let mut settings = Settings::default();
    for (key, val) in content.lines().filter_map(parse_key_value) {
        match key.as_str() {
            "api_key" | "apikey" => {}
            "api_url" | "endpoint" => {
                if !val.is_empty() {
                    settings.api_url = val;
                }
            }
            "model" => {
                if !val.is_empty() {
                    settings.model = val;
                }
            }
            "locale" | "language" => {
                settings.locale = (!val.is_empty()).then_some(val);
            }
            "request_timeout_secs" | "timeout" => {
                set_parsed(&mut settings.request_timeout_secs, &key, &val, |v| *v > 0);
            }
            "countdown_secs" => set_parsed(&mut settings.countdown_secs, &key, &val, |_| true),
            "max_context_chars" => {
                set_parsed(&mut settings.max_context_chars, &key, &val, |_| true);
            }
            "max_tokens" => set_parsed(&mut settings.max_tokens, &key, &val, |v| *v > 0),
            "temperature" => {
                set_parsed(&mut settings.temperature, &key, &val, |v| (0.0..=2.0).contains(v));
            }
            "fact_check_labels" => {
                settings.fact_check_labels = val
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect();
            }
            "clipboard_suffix" | "copy_suffix" => settings.clipboard_suffix = val,
            "color" | "colors" => settings.color = parse_bool(&val),
            other => tracing::debug!(key = other, "ignoring unknown setting"),
        }
    }
    settings
}

/// Parse `val` into `slot` when it parses and passes `valid`.
fn set_parsed<T: std::str::FromStr>(
    slot: &mut T,
    key: &str,
    val: &str,
    valid: impl Fn(&T) -> bool,
) {
    match val.parse::<T>() {
        Ok(v) if valid(&v) => *slot = v,
        _ => tracing::warn!(key, value = val, "invalid setting value, keeping default"),
    }
}

/// What: Load settings from disk, writing the skeleton on first run.
///
/// Inputs:
/// - `path`: Location of `settings.conf`
///
/// Output:
/// - Parsed settings, or defaults when the file cannot be read
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match fs::write(path, SETTINGS_SKELETON_CONTENT) {
            Ok(()) => tracing::info!(path = %path.display(), "wrote default settings"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not write default settings"),
        }
    }
    match fs::read_to_string(path) {
        Ok(content) => parse_settings(&content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read settings, using defaults");
            Settings::default()
        }
    }
}
