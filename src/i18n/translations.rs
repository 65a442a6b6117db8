//! Translation map and lookup utilities.

use std::collections::HashMap;

/// Translation map: dot-notation key -> translated string.
pub type TranslationMap = HashMap<String, String>;

/// UI strings for the active locale with English as fallback.
#[derive(Clone, Debug, Default)]
pub struct Messages {
    locale: String,
    primary: TranslationMap,
    fallback: TranslationMap,
}

impl Messages {
    /// What: Bundle the active locale's strings with the English fallback.
    ///
    /// Inputs:
    /// - `locale`: Resolved locale code
    /// - `primary`: Strings of that locale
    /// - `fallback`: English strings
    ///
    /// Output:
    /// - New `Messages`
    #[must_use]
    pub const fn new(locale: String, primary: TranslationMap, fallback: TranslationMap) -> Self {
        Self {
            locale,
            primary,
            fallback,
        }
    }

    /// Active locale code.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// What: Look up a translation with fallback to English.
    ///
    /// Inputs:
    /// - `key`: Dot-notation key
    ///
    /// Output:
    /// - Translated string (from primary or fallback, or key itself if both missing)
    ///
    /// Details:
    /// - Returns key itself if neither has translation (for debugging)
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        if let Some(translation) = self.primary.get(key) {
            return translation.clone();
        }

        if let Some(translation) = self.fallback.get(key) {
            tracing::debug!(
                "Translation key '{}' not found in locale '{}', using fallback",
                key,
                self.locale
            );
            return translation.clone();
        }

        tracing::debug!(
            "Missing translation key: '{}'. Returning key as-is. Please add this key to locale files.",
            key
        );
        key.to_string()
    }

    /// What: Get a translation with a single `{}` placeholder filled in.
    ///
    /// Inputs:
    /// - `key`: Dot-notation key
    /// - `arg`: Value for the first placeholder
    ///
    /// Output:
    /// - Formatted translated string
    #[must_use]
    pub fn t_fmt1<T: std::fmt::Display>(&self, key: &str, arg: T) -> String {
        self.t(key).replacen("{}", &arg.to_string(), 1)
    }
}
