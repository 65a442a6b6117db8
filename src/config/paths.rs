use std::env;
use std::path::{Path, PathBuf};

/// Application directory name under the config base.
const APP_DIR: &str = "factlens";

/// Environment variable that relocates the whole config directory.
pub const CONFIG_DIR_ENV: &str = "FACTLENS_CONFIG_DIR";

/// What: Pick the config directory from the relevant environment values.
///
/// Inputs:
/// - `override_dir`: Value of `FACTLENS_CONFIG_DIR`
/// - `home`: Value of `HOME`
/// - `xdg_config`: Value of `XDG_CONFIG_HOME`
///
/// Output:
/// - Override as-is, else `$HOME/.config/factlens`, else `$XDG_CONFIG_HOME/factlens`,
///   else `./.config/factlens`
///
/// Details:
/// - Blank values count as unset.
fn resolve_config_dir(
    override_dir: Option<&str>,
    home: Option<&str>,
    xdg_config: Option<&str>,
) -> PathBuf {
    fn set(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|s| !s.is_empty())
    }
    if let Some(dir) = set(override_dir) {
        return PathBuf::from(dir);
    }
    if let Some(h) = set(home) {
        return Path::new(h).join(".config").join(APP_DIR);
    }
    if let Some(x) = set(xdg_config) {
        return Path::new(x).join(APP_DIR);
    }
    Path::new(".").join(".config").join(APP_DIR)
}

/// Config directory for factlens (ensured to exist).
pub fn config_dir() -> PathBuf {
    let dir = resolve_config_dir(
        env::var(CONFIG_DIR_ENV).ok().as_deref(),
        env::var("HOME").ok().as_deref(),
        env::var("XDG_CONFIG_HOME").ok().as_deref(),
    );
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), error = %e, "could not create config directory");
    }
    dir
}

/// Logs directory under config: `<config_dir>/logs` (ensured to exist)
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Path of `settings.conf` inside [`config_dir`].
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.conf")
}
