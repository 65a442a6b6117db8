//! Internationalization (i18n) module for factlens.
//!
//! This module provides locale detection, resolution, loading, and translation lookup,
//! plus the localized label tables the response parser matches section headers against.
//!
//! # Overview
//!
//! - **Locale Resolution**: `--locale` flag, then the `locale` setting, then the system
//!   locale (`LC_ALL`, `LC_MESSAGES`, `LANG`), then `en-US`
//! - **Locale Files**: `locales/{locale}.yml` with an `app:` tree of UI strings and a
//!   `labels:` block of header/keyword spellings
//! - **Embedded Locales**: `en-US` and `de-DE` are compiled in, so the binary works
//!   without any files on disk; English is always the fallback
//!
//! # Adding a New Locale
//!
//! 1. Create `locales/{locale}.yml` (e.g., `locales/fr-FR.yml`) in the config directory
//! 2. Copy structure from `config/locales/en-US.yml`, translate the strings and list the
//!    section labels the model uses in that language under `labels:`
//! 3. Set `locale = fr-FR` in `settings.conf` or pass `--locale fr-FR`
//!
//! # Error Handling
//!
//! - Missing or broken locale files fall back to the embedded locales
//! - Missing translation keys return the key itself and log debug messages

mod detection;
pub mod labels;
mod loader;
pub mod translations;

pub use detection::detect_system_locale;
pub use labels::{LabelTable, LocaleLabels, SectionKind, TruthLevel};
pub use loader::{LocaleFile, load_locale_file, parse_locale_yaml};
pub use translations::{Messages, TranslationMap};

use std::path::PathBuf;

/// Locale used when nothing else resolves.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Locale files compiled into the binary.
pub(crate) const BUILTIN_LOCALES: [(&str, &str); 2] = [
    ("en-US", include_str!("../../config/locales/en-US.yml")),
    ("de-DE", include_str!("../../config/locales/de-DE.yml")),
];

/// Strings and labels for the active locale.
#[derive(Clone, Debug)]
pub struct Localization {
    /// UI strings.
    pub messages: Messages,
    /// Accepted section headers and truth keywords.
    pub labels: LabelTable,
}

/// What: Find the user locales directory.
///
/// Output:
/// - `Some(PathBuf)` pointing to the first existing locales directory found, or `None`
///
/// Details:
/// - Tries locations in order:
///   1. Development location: `CARGO_MANIFEST_DIR/config/locales`
///   2. User location: `<config_dir>/locales`
///   3. Installed location: `/usr/share/factlens/locales`
pub fn find_locales_dir() -> Option<PathBuf> {
    let dev_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join("locales");
    if dev_path.is_dir() {
        return Some(dev_path);
    }

    let user_path = crate::config::config_dir().join("locales");
    if user_path.is_dir() {
        return Some(user_path);
    }

    let installed_path = PathBuf::from("/usr/share/factlens/locales");
    if installed_path.is_dir() {
        return Some(installed_path);
    }

    None
}

/// What: Resolve which locale to use.
///
/// Inputs:
/// - `cli_locale`: Value of `--locale`, if given
/// - `settings_locale`: `locale` from `settings.conf`, if set
///
/// Output:
/// - Locale code, `en-US` when nothing usable is found
///
/// Details:
/// - Invalid codes are logged and skipped rather than failing startup
pub fn resolve_locale(cli_locale: Option<&str>, settings_locale: Option<&str>) -> String {
    let system = detect_system_locale();
    for (origin, candidate) in [
        ("cli", cli_locale),
        ("settings", settings_locale),
        ("system", system.as_deref()),
    ] {
        let Some(code) = candidate.map(str::trim).filter(|c| !c.is_empty()) else {
            continue;
        };
        if loader::is_valid_locale_format(code) {
            tracing::debug!(origin, locale = code, "resolved locale");
            return code.to_string();
        }
        tracing::warn!(origin, locale = code, "ignoring invalid locale code");
    }
    DEFAULT_LOCALE.to_string()
}

/// What: Return the embedded locale closest to `locale`.
///
/// Inputs:
/// - `locale`: Requested code, e.g. `de-AT` or `de`
///
/// Output:
/// - Exact embedded match, else the first embedded locale with the same language
fn builtin_locale(locale: &str) -> Option<(&'static str, &'static str)> {
    let language = locale.split('-').next().unwrap_or(locale);
    BUILTIN_LOCALES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(locale))
        .or_else(|| {
            BUILTIN_LOCALES.iter().find(|(code, _)| {
                code.split('-')
                    .next()
                    .is_some_and(|l| l.eq_ignore_ascii_case(language))
            })
        })
        .copied()
}

/// What: Load strings and labels for a locale.
///
/// Inputs:
/// - `locale`: Resolved locale code
/// - `extra_fact_check_labels`: Deployment-specific fact-check headers from settings
///
/// Output:
/// - `Localization` with English fallback strings and the merged label table
///
/// Details:
/// - A file in the locales directory wins over the embedded copy
/// - Labels always include the embedded English and German sets
pub fn load_localization(locale: &str, extra_fact_check_labels: &[String]) -> Localization {
    let fallback = parse_locale_yaml(BUILTIN_LOCALES[0].1).unwrap_or_else(|e| {
        tracing::error!(error = %e, "embedded English locale is invalid");
        LocaleFile::default()
    });

    let from_disk = find_locales_dir().and_then(|dir| match load_locale_file(locale, &dir) {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::debug!(locale, error = %e, "no locale file on disk");
            None
        }
    });
    let (active_code, primary) = if let Some(file) = from_disk {
        (locale.to_string(), file)
    } else if let Some((code, yaml)) = builtin_locale(locale) {
        match parse_locale_yaml(yaml) {
            Ok(file) => (code.to_string(), file),
            Err(e) => {
                tracing::error!(locale = code, error = %e, "embedded locale is invalid");
                (DEFAULT_LOCALE.to_string(), fallback.clone())
            }
        }
    } else {
        tracing::info!(locale, "locale not available, using English");
        (DEFAULT_LOCALE.to_string(), fallback.clone())
    };

    let mut labels = LabelTable::builtin();
    labels.merge(&primary.labels);
    labels.add_section_labels(SectionKind::FactCheck, extra_fact_check_labels);

    tracing::info!(locale = %active_code, "localization loaded");
    Localization {
        messages: Messages::new(active_code, primary.translations, fallback.translations),
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_locales_parse() {
        for (code, yaml) in BUILTIN_LOCALES {
            let file = parse_locale_yaml(yaml).expect("embedded locale parses");
            assert!(file.translations.contains_key("app.title"), "{code}");
            assert!(!file.labels.truth.is_empty(), "{code}");
        }
    }

    #[test]
    fn builtin_locale_matches_by_language() {
        assert_eq!(builtin_locale("de-AT").map(|(c, _)| c), Some("de-DE"));
        assert_eq!(builtin_locale("en").map(|(c, _)| c), Some("en-US"));
        assert_eq!(builtin_locale("DE-de").map(|(c, _)| c), Some("de-DE"));
        assert!(builtin_locale("ja-JP").is_none());
    }

    #[test]
    fn german_localization_translates_and_extends_labels() {
        let l = load_localization("de-DE", &["Verificación".to_string()]);
        assert_eq!(l.messages.locale(), "de-DE");
        assert_eq!(l.messages.t("app.title"), "Faktenchecker");
        let fc = l.labels.section(SectionKind::FactCheck);
        assert!(fc.iter().any(|s| s == "Fact Check"));
        assert!(fc.iter().any(|s| s == "Faktencheck"));
        assert!(fc.iter().any(|s| s == "Verificación"));
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let l = load_localization("ja-JP", &[]);
        assert_eq!(l.messages.locale(), "en-US");
        assert_eq!(l.messages.t("app.title"), "Fact Checker");
    }

    #[test]
    fn cli_locale_wins_over_settings() {
        assert_eq!(resolve_locale(Some("de-DE"), Some("en-US")), "de-DE");
        assert_eq!(resolve_locale(Some("  "), Some("de-DE")), "de-DE");
        assert_eq!(resolve_locale(Some("bad locale"), Some("de-DE")), "de-DE");
    }
}
