//! Locale file loading and parsing.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::i18n::labels::LocaleLabels;
use crate::i18n::translations::TranslationMap;

/// Top-level key under a locale that holds parser labels instead of UI strings.
const LABELS_KEY: &str = "labels";

/// Parsed content of one `locales/{locale}.yml` file.
#[derive(Clone, Debug, Default)]
pub struct LocaleFile {
    /// Flattened UI strings (`app.overlay.title` -> text).
    pub translations: TranslationMap,
    /// Section and keyword labels from the `labels:` block.
    pub labels: LocaleLabels,
}

/// What: Load a locale YAML file from a directory.
///
/// Inputs:
/// - `locale`: Locale code (e.g., "de-DE")
/// - `locales_dir`: Path to locales directory
///
/// Output:
/// - `Result<LocaleFile, String>` containing translations and labels or error
///
/// # Errors
/// - Returns `Err` when the locale code is empty or has an invalid format
/// - Returns `Err` when the locale file does not exist or cannot be read
/// - Returns `Err` when the locale file is empty or not valid YAML
pub fn load_locale_file(locale: &str, locales_dir: &Path) -> Result<LocaleFile, String> {
    if !is_valid_locale_format(locale) {
        return Err(format!(
            "Invalid locale code format: '{locale}'. Expected format: language[-region] (e.g., 'en-US', 'de-DE')"
        ));
    }

    let file_path = locales_dir.join(format!("{locale}.yml"));
    if !file_path.exists() {
        return Err(format!("Locale file not found: {}", file_path.display()));
    }

    let contents = fs::read_to_string(&file_path)
        .map_err(|e| format!("Failed to read locale file {}: {e}", file_path.display()))?;

    if contents.trim().is_empty() {
        return Err(format!("Locale file is empty: {}", file_path.display()));
    }

    parse_locale_yaml(&contents).map_err(|e| {
        format!(
            "Failed to parse locale file {}: {e}. Please check YAML syntax.",
            file_path.display()
        )
    })
}

/// What: Validate locale code format.
///
/// Inputs:
/// - `locale`: Locale code to validate
///
/// Output:
/// - `true` if format looks valid, `false` otherwise
pub(crate) fn is_valid_locale_format(locale: &str) -> bool {
    if locale.is_empty() || locale.len() > 20 {
        return false;
    }

    locale.chars().all(|c| c.is_alphanumeric() || c == '-')
        && !locale.starts_with('-')
        && !locale.ends_with('-')
        && !locale.contains("--")
}

/// What: Parse locale YAML content into translations and labels.
///
/// Inputs:
/// - `yaml_content`: YAML file content as string
///
/// Output:
/// - `Result<LocaleFile, String>`
///
/// # Errors
/// - Returns `Err` when the YAML is malformed or the `labels` block has the wrong shape
///
/// Details:
/// - Expects a top-level key matching the locale code (e.g., "de-DE:")
/// - Everything except `labels` is flattened into dot-notation keys
pub fn parse_locale_yaml(yaml_content: &str) -> Result<LocaleFile, String> {
    let doc: serde_norway::Value =
        serde_norway::from_str(yaml_content).map_err(|e| format!("Failed to parse YAML: {e}"))?;

    let mut out = LocaleFile {
        translations: HashMap::new(),
        labels: LocaleLabels::default(),
    };

    let Some(locale_obj) = doc.as_mapping() else {
        return Ok(out);
    };
    for (_locale_key, locale_value) in locale_obj {
        let Some(sections) = locale_value.as_mapping() else {
            continue;
        };
        for (key, val) in sections {
            let Some(key_str) = key.as_str() else {
                continue;
            };
            if key_str == LABELS_KEY {
                out.labels = serde_norway::from_value(val.clone())
                    .map_err(|e| format!("Invalid labels block: {e}"))?;
            } else {
                flatten_yaml_value(val, key_str, &mut out.translations);
            }
        }
    }

    Ok(out)
}

/// What: Recursively flatten YAML structure into dot-notation keys.
///
/// Inputs:
/// - `value`: Current YAML value
/// - `prefix`: Current key prefix (e.g., "app.overlay")
/// - `translations`: Map to populate
fn flatten_yaml_value(
    value: &serde_norway::Value,
    prefix: &str,
    translations: &mut TranslationMap,
) {
    match value {
        serde_norway::Value::Mapping(map) => {
            for (key, val) in map {
                if let Some(key_str) = key.as_str() {
                    let new_prefix = if prefix.is_empty() {
                        key_str.to_string()
                    } else {
                        format!("{prefix}.{key_str}")
                    };
                    flatten_yaml_value(val, &new_prefix, translations);
                }
            }
        }
        serde_norway::Value::String(s) => {
            translations.insert(prefix.to_string(), s.clone());
        }
        serde_norway::Value::Number(n) => {
            translations.insert(prefix.to_string(), n.to_string());
        }
        serde_norway::Value::Bool(b) => {
            translations.insert(prefix.to_string(), b.to_string());
        }
        _ => {
            tracing::debug!(key = prefix, "skipping non-scalar translation value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_translations_and_labels() {
        let yaml = r#"
fr-FR:
  app:
    overlay:
      truth: "Pourcentage de vérité"
  labels:
    sources: ["Sources"]
    truth: ["Vérité"]
    context: ["Contexte"]
"#;
        let file = parse_locale_yaml(yaml).expect("Failed to parse test locale YAML");
        assert_eq!(
            file.translations.get("app.overlay.truth"),
            Some(&"Pourcentage de vérité".to_string())
        );
        assert!(!file.translations.contains_key("labels.truth"));
        assert_eq!(file.labels.truth, vec!["Vérité".to_string()]);
        assert!(file.labels.fact_check.is_empty());
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        assert!(parse_locale_yaml("invalid: yaml: content: [").is_err());
    }

    #[test]
    fn labels_with_wrong_shape_are_rejected() {
        let yaml = "xx-XX:\n  labels:\n    truth: 5\n";
        assert!(parse_locale_yaml(yaml).is_err());
    }

    #[test]
    fn load_from_directory() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join("es-ES.yml"),
            "es-ES:\n  app:\n    title: \"Verificador\"\n  labels:\n    truth: [\"Verdad\"]\n",
        )
        .expect("Failed to write locale file");
        let file = load_locale_file("es-ES", dir.path()).expect("locale loads");
        assert_eq!(file.translations.get("app.title"), Some(&"Verificador".to_string()));
        assert_eq!(file.labels.truth, vec!["Verdad".to_string()]);

        assert!(load_locale_file("it-IT", dir.path()).is_err());
        assert!(load_locale_file("../etc", dir.path()).is_err());
    }

    #[test]
    fn locale_format_validation() {
        assert!(is_valid_locale_format("en-US"));
        assert!(is_valid_locale_format("de"));
        assert!(!is_valid_locale_format(""));
        assert!(!is_valid_locale_format("-en"));
        assert!(!is_valid_locale_format("en--US"));
        assert!(!is_valid_locale_format("en_US"));
    }
}
