//! Language codes and the fixed table of supported translation targets.
//!
//! [`SUPPORTED_LANGUAGES`] is the list offered by the language-select
//! control.  Each entry carries a display name and the key the rendering
//! layer uses to look up a flag icon; the pipeline itself only ever compares
//! codes.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LanguageCode
// ---------------------------------------------------------------------------

/// An ISO-639-1 style language code (`"en"`, `"fr"`, ...).
///
/// Codes are stored trimmed and lower-cased so that `"EN"` and `"en"`
/// compare equal, including when deserialised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when the code appears in [`SUPPORTED_LANGUAGES`].
    pub fn is_supported(&self) -> bool {
        find_language(self.as_str()).is_some()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// LanguageInfo
// ---------------------------------------------------------------------------

/// Static metadata for one selectable language.
#[derive(Debug)]
pub struct LanguageInfo {
    /// Language code, as produced by the detector and sent to the translator.
    pub code: &'static str,
    /// Human-readable name shown in the language-select control.
    pub name: &'static str,
    /// Icon-lookup key (ISO-3166 country code) used by the rendering layer.
    pub flag_code: &'static str,
}

/// Languages offered as translation targets.
pub const SUPPORTED_LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        code: "en",
        name: "English",
        flag_code: "gb",
    },
    LanguageInfo {
        code: "fr",
        name: "French",
        flag_code: "fr",
    },
    LanguageInfo {
        code: "es",
        name: "Spanish",
        flag_code: "es",
    },
    LanguageInfo {
        code: "pt",
        name: "Portuguese",
        flag_code: "pt",
    },
    LanguageInfo {
        code: "ru",
        name: "Russian",
        flag_code: "ru",
    },
    LanguageInfo {
        code: "tr",
        name: "Turkish",
        flag_code: "tr",
    },
];

/// Look up a supported language by code.
pub fn find_language(code: &str) -> Option<&'static LanguageInfo> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.code == code)
}

/// Display name for `code`, or the code itself when it is not in the table.
///
/// ```
/// use text_processor::language::{language_label, LanguageCode};
///
/// assert_eq!(language_label(&LanguageCode::new("fr")), "French");
/// assert_eq!(language_label(&LanguageCode::new("de")), "de");
/// ```
pub fn language_label(code: &LanguageCode) -> String {
    find_language(code.as_str())
        .map(|l| l.name.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Icon-lookup key for `code`, if the language is supported.
pub fn flag_key(code: &LanguageCode) -> Option<&'static str> {
    find_language(code.as_str()).map(|l| l.flag_code)
}
