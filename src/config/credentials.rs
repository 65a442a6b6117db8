//! API credential lookup, validation and persistence.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use super::settings::SETTINGS_SKELETON_CONTENT;
use crate::util::config::{normalize_key, parse_key_value, skip_comment_or_empty};

/// Environment variable that supplies the API key.
pub const API_KEY_ENV: &str = "FACTLENS_API_KEY";

/// Shortest key accepted when saving.
pub const MIN_KEY_LEN: usize = 20;

/// An API key. Wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Wrap a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(Zeroizing::new(key.into()))
    }

    /// The raw key, for the `Authorization` header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Source of the API credential.
pub trait CredentialStore {
    /// Current credential, `None` when none is configured.
    fn get_credential(&self) -> Option<Credential>;
}

impl CredentialStore for Option<Credential> {
    fn get_credential(&self) -> Option<Credential> {
        self.clone()
    }
}

/// Why a key could not be validated or saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialError {
    /// Nothing was entered.
    Empty,
    /// Shorter than [`MIN_KEY_LEN`].
    TooShort,
    /// Writing the settings file failed.
    Io(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Please enter an API key."),
            Self::TooShort => f.write_str(
                "The API key seems too short. Please check that you copied the entire key.",
            ),
            Self::Io(e) => write!(f, "Could not save the API key: {e}"),
        }
    }
}

impl std::error::Error for CredentialError {}

/// What: Check a key before it is stored.
///
/// Inputs:
/// - `key`: Key as entered
///
/// Output:
/// - The trimmed key
///
/// # Errors
/// - `Empty` for blank input, `TooShort` below [`MIN_KEY_LEN`] characters
pub fn validate_api_key(key: &str) -> Result<&str, CredentialError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(CredentialError::Empty);
    }
    if key.chars().count() < MIN_KEY_LEN {
        return Err(CredentialError::TooShort);
    }
    Ok(key)
}

/// Credential store backed by the environment and `settings.conf`.
#[derive(Clone, Debug)]
pub struct SettingsCredentialStore {
    path: PathBuf,
    env_key: Option<Credential>,
}

impl SettingsCredentialStore {
    /// What: Store reading only the settings file.
    ///
    /// Inputs:
    /// - `path`: Location of `settings.conf`
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            env_key: None,
        }
    }

    /// What: Store that prefers `FACTLENS_API_KEY` over the settings file.
    ///
    /// Inputs:
    /// - `path`: Location of `settings.conf`
    #[must_use]
    pub fn from_environment(path: PathBuf) -> Self {
        let env_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(|k| Credential::new(k.trim()));
        Self { path, env_key }
    }

    /// Settings file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file_key(&self) -> Option<Credential> {
        let content = Zeroizing::new(fs::read_to_string(&self.path).ok()?);
        content
            .lines()
            .filter_map(parse_key_value)
            .find(|(k, v)| matches!(k.as_str(), "api_key" | "apikey") && !v.is_empty())
            .map(|(_, v)| Credential::new(v))
    }

    /// What: Validate and persist a key to `settings.conf`.
    ///
    /// Inputs:
    /// - `key`: Key as entered
    ///
    /// # Errors
    /// - Validation errors from [`validate_api_key`]
    /// - `Io` when the file cannot be written
    ///
    /// Details:
    /// - Replaces an existing `api_key` line (commented-out skeleton lines included) and
    ///   keeps every other line. A missing file starts from the skeleton.
    /// - On Unix the file is restricted to the owner.
    pub fn save(&self, key: &str) -> Result<(), CredentialError> {
        let key = validate_api_key(key)?;
        let existing = Zeroizing::new(
            fs::read_to_string(&self.path)
                .ok()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| SETTINGS_SKELETON_CONTENT.to_string()),
        );
        let line = format!("api_key = {key}");
        let mut replaced = false;
        let mut lines: Vec<String> = existing
            .lines()
            .map(|l| {
                if !replaced && is_api_key_line(l) {
                    replaced = true;
                    line.clone()
                } else {
                    l.to_string()
                }
            })
            .collect();
        if !replaced {
            lines.push(line);
        }
        let content = Zeroizing::new(lines.join("\n") + "\n");

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| CredentialError::Io(e.to_string()))?;
        }
        fs::write(&self.path, content.as_bytes()).map_err(|e| CredentialError::Io(e.to_string()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600));
        }
        tracing::info!(path = %self.path.display(), "API key saved");
        Ok(())
    }
}

impl CredentialStore for SettingsCredentialStore {
    fn get_credential(&self) -> Option<Credential> {
        if let Some(key) = &self.env_key {
            tracing::debug!("using API key from environment");
            return Some(key.clone());
        }
        let key = self.read_file_key();
        tracing::debug!(found = key.is_some(), "looked up API key in settings");
        key
    }
}

/// `api_key = ...` or the skeleton's `# api_key =` placeholder.
fn is_api_key_line(line: &str) -> bool {
    let body = if skip_comment_or_empty(line) {
        line.trim().trim_start_matches(['#', '/', ';']).trim()
    } else {
        line.trim()
    };
    body.split_once('=')
        .is_some_and(|(k, _)| matches!(normalize_key(k).as_str(), "api_key" | "apikey"))
}
