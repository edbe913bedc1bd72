// SPDX-License-Identifier: PMPL-1.0-or-later

//! Stored visitor preferences (language, theme).
//!
//! The browser keeps these in local storage; here the store is a small JSON
//! object on disk, or a map in memory for tests and one-shot renders.

use crate::types::Language;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const LANGUAGE_KEY: &str = "language";
pub const THEME_KEY: &str = "theme";

/// Key–value storage for visitor preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-object file, rewritten in full on every change.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Open the store. A missing file is an empty store; an unreadable or
    /// corrupt one is logged and treated as empty so it gets rewritten.
    pub fn open(path: &Path) -> Self {
        let values = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(err) => {
                    warn!(path = %path.display(), "ignoring corrupt preference file: {}", err);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: path.to_path_buf(),
            values,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// The in-memory value only changes once the file has been written.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.values.clone();
        next.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let payload = serde_json::to_string_pretty(&next)?;
        fs::write(&self.path, payload)
            .with_context(|| format!("writing preferences {}", self.path.display()))?;
        self.values = next;
        debug!(key, value, path = %self.path.display(), "preference stored");
        Ok(())
    }
}

/// Primary language subtag of an environment locale string.
///
/// Accepts both POSIX (`pt_BR.UTF-8`) and BCP 47 (`pt-BR`) forms.
pub fn locale_language(raw: &str) -> Option<Language> {
    let primary = raw
        .split(|c: char| c == '-' || c == '_' || c == '.' || c == '@')
        .next()?
        .to_ascii_lowercase();
    Language::from_code(&primary)
}

/// Pick the starting language: stored preference, else the environment's
/// locale, else `default`.
pub fn initial_language(
    store: &dyn PreferenceStore,
    environment_locale: Option<&str>,
    default: Language,
) -> Language {
    if let Some(stored) = store.get(LANGUAGE_KEY) {
        if let Some(language) = Language::from_code(&stored) {
            return language;
        }
        warn!(stored, "ignoring unsupported stored language");
    }
    environment_locale
        .and_then(locale_language)
        .unwrap_or(default)
}

/// Locale reported by the environment (`LC_ALL`, then `LANG`).
pub fn environment_locale() -> Option<String> {
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty() && value != "C" && value != "POSIX")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parsing() {
        assert_eq!(locale_language("pt_BR.UTF-8"), Some(Language::Pt));
        assert_eq!(locale_language("pt-PT"), Some(Language::Pt));
        assert_eq!(locale_language("EN_us"), Some(Language::En));
        assert_eq!(locale_language("de_DE"), None);
    }

    #[test]
    fn stored_preference_wins() {
        let mut store = MemoryPreferenceStore::new();
        store.set(LANGUAGE_KEY, "en").unwrap();
        assert_eq!(
            initial_language(&store, Some("pt_BR"), Language::Pt),
            Language::En
        );
    }

    #[test]
    fn invalid_stored_value_falls_through() {
        let mut store = MemoryPreferenceStore::new();
        store.set(LANGUAGE_KEY, "fr").unwrap();
        assert_eq!(
            initial_language(&store, Some("pt_BR"), Language::En),
            Language::Pt
        );
    }

    #[test]
    fn default_when_nothing_known() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(initial_language(&store, None, Language::En), Language::En);
        assert_eq!(
            initial_language(&store, Some("ja_JP"), Language::Pt),
            Language::Pt
        );
    }

    #[test]
    fn failed_write_leaves_the_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();
        let mut store = FilePreferenceStore::open(&blocker.join("prefs.json"));
        assert!(store.set(LANGUAGE_KEY, "pt").is_err());
        assert_eq!(store.get(LANGUAGE_KEY), None);
    }
}
