// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions shared across the site modules

use serde::{Deserialize, Serialize};

/// Supported site languages.
///
/// The site ships exactly two locale bundles. The enum is used by the
/// translator, the preference store and the CLI `--lang` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Pt,
}

impl Language {
    /// ISO 639-1 two-letter code, also the locale directory name.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pt => "pt",
        }
    }

    /// Parse a two-letter code. Case-sensitive, like the stored preference.
    pub fn from_code(code: &str) -> Option<Language> {
        match code {
            "en" => Some(Language::En),
            "pt" => Some(Language::Pt),
            _ => None,
        }
    }

    /// Value written to the document's `lang` attribute.
    pub fn html_lang(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pt => "pt-BR",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Pt => "Português",
        }
    }

    /// All supported languages, in switcher order.
    pub fn all() -> &'static [Language] {
        &[Language::Pt, Language::En]
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s.trim())
            .ok_or_else(|| anyhow::anyhow!("unsupported language '{}' (expected en or pt)", s))
    }
}

/// Colour scheme of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Visitor's motion preference. Reduced motion turns decorative animation off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionPreference {
    #[default]
    Full,
    Reduced,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_roundtrip() {
        for lang in Language::all() {
            assert_eq!(Language::from_code(lang.code()), Some(*lang));
        }
        assert_eq!(Language::from_code("EN"), None);
    }

    #[test]
    fn html_lang_uses_regional_tag_for_portuguese() {
        assert_eq!(Language::Pt.html_lang(), "pt-BR");
        assert_eq!(Language::En.html_lang(), "en");
    }

    #[test]
    fn theme_toggle_flips() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
        assert_eq!(Theme::from_str("LIGHT"), Some(Theme::Light));
    }
}
