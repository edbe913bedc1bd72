// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale bundles: one nested translation dictionary per language.
//!
//! Bundles live at `<public_dir>/locales/<code>/translation.json`, the same
//! well-known paths the site serves them from. A bundle is immutable once
//! loaded. Loading never fails from the caller's point of view: a missing or
//! malformed file is logged and replaced by an empty bundle, so lookups fall
//! back to raw keys instead of crashing.

use crate::content::{deserialize_blocks, ContentBlock};
use crate::types::Language;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// A value stored under a translation key.
///
/// Variant order matters for untagged deserialization: plain strings first,
/// then string arrays (log lines), then any other array as content blocks,
/// then nested tables. Block arrays keep only the entries that parse.
/// Anything else (numbers, booleans, null) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleValue {
    Text(String),
    Lines(Vec<String>),
    Blocks(#[serde(deserialize_with = "deserialize_blocks")] Vec<ContentBlock>),
    Table(BTreeMap<String, LocaleValue>),
    Other(serde_json::Value),
}

impl LocaleValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LocaleValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, LocaleValue::Table(_))
    }
}

#[derive(Debug, Clone)]
pub struct LocaleBundle {
    language: Language,
    root: BTreeMap<String, LocaleValue>,
    fingerprint: Option<String>,
}

impl LocaleBundle {
    pub fn empty(language: Language) -> Self {
        Self {
            language,
            root: BTreeMap::new(),
            fingerprint: None,
        }
    }

    pub fn from_json_str(language: Language, content: &str) -> Result<Self> {
        let value: LocaleValue = serde_json::from_str(content)
            .with_context(|| format!("parsing {} translation bundle", language))?;
        let root = match value {
            LocaleValue::Table(root) => root,
            _ => return Err(anyhow!("{} translation bundle must be a JSON object", language)),
        };
        Ok(Self {
            language,
            root,
            fingerprint: None,
        })
    }

    /// Decode raw file bytes (BOM-sniffed, UTF-8 by default) and parse them.
    pub fn from_bytes(language: Language, bytes: &[u8]) -> Result<Self> {
        let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(bytes);
        if had_errors {
            warn!(
                language = %language,
                encoding = encoding.name(),
                "translation bundle contained undecodable bytes"
            );
        }
        let mut bundle = Self::from_json_str(language, &text)?;
        bundle.fingerprint = Some(hex::encode(Sha256::digest(bytes)));
        Ok(bundle)
    }

    pub fn path_for(public_dir: &Path, language: Language) -> PathBuf {
        public_dir
            .join("locales")
            .join(language.code())
            .join("translation.json")
    }

    pub fn load(public_dir: &Path, language: Language) -> Result<Self> {
        let path = Self::path_for(public_dir, language);
        let bytes =
            fs::read(&path).with_context(|| format!("reading bundle {}", path.display()))?;
        Self::from_bytes(language, &bytes)
            .with_context(|| format!("loading bundle {}", path.display()))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// SHA-256 of the source file, hex encoded. `None` for in-memory bundles.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Walk a dotted key. Any missing segment, or a segment that descends
    /// into a non-table value, yields `None`.
    pub fn lookup(&self, key: &str) -> Option<&LocaleValue> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = match current {
                LocaleValue::Table(table) => table.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Dotted paths of every non-table value, sorted.
    pub fn leaf_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_leaf_keys(&self.root, "", &mut keys);
        keys
    }
}

fn collect_leaf_keys(table: &BTreeMap<String, LocaleValue>, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            LocaleValue::Table(inner) => collect_leaf_keys(inner, &path, out),
            _ => out.push(path),
        }
    }
}

/// How a language's bundle ended up in the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded {
        path: PathBuf,
        fingerprint: Option<String>,
        keys: usize,
    },
    Fallback {
        path: PathBuf,
        reason: String,
    },
    InMemory,
}

impl LoadStatus {
    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadStatus::Fallback { .. })
    }
}

/// Bundles for every supported language.
#[derive(Debug, Clone)]
pub struct BundleSet {
    bundles: BTreeMap<Language, LocaleBundle>,
    statuses: BTreeMap<Language, LoadStatus>,
}

impl BundleSet {
    /// Load every language in parallel and join. A failed language gets an
    /// empty bundle; the others are unaffected.
    pub fn load(public_dir: &Path) -> Self {
        let results: Vec<(Language, LocaleBundle, LoadStatus)> = Language::all()
            .par_iter()
            .map(|&language| {
                let path = LocaleBundle::path_for(public_dir, language);
                match LocaleBundle::load(public_dir, language) {
                    Ok(bundle) => {
                        debug!(
                            language = %language,
                            path = %path.display(),
                            keys = bundle.leaf_keys().len(),
                            "translation bundle loaded"
                        );
                        let status = LoadStatus::Loaded {
                            path,
                            fingerprint: bundle.fingerprint().map(str::to_string),
                            keys: bundle.leaf_keys().len(),
                        };
                        (language, bundle, status)
                    }
                    Err(err) => {
                        error!(
                            language = %language,
                            "could not load translations: {:#}",
                            err
                        );
                        let status = LoadStatus::Fallback {
                            path,
                            reason: format!("{:#}", err),
                        };
                        (language, LocaleBundle::empty(language), status)
                    }
                }
            })
            .collect();

        let mut set = Self {
            bundles: BTreeMap::new(),
            statuses: BTreeMap::new(),
        };
        for (language, bundle, status) in results {
            set.bundles.insert(language, bundle);
            set.statuses.insert(language, status);
        }
        set
    }

    /// Build a set from in-memory bundles; languages not supplied get an
    /// empty bundle.
    pub fn from_bundles(bundles: impl IntoIterator<Item = LocaleBundle>) -> Self {
        let mut set = Self {
            bundles: BTreeMap::new(),
            statuses: BTreeMap::new(),
        };
        for bundle in bundles {
            set.statuses.insert(bundle.language(), LoadStatus::InMemory);
            set.bundles.insert(bundle.language(), bundle);
        }
        for &language in Language::all() {
            set.bundles
                .entry(language)
                .or_insert_with(|| LocaleBundle::empty(language));
            set.statuses.entry(language).or_insert(LoadStatus::InMemory);
        }
        set
    }

    pub fn get(&self, language: Language) -> Option<&LocaleBundle> {
        self.bundles.get(&language)
    }

    pub fn status(&self, language: Language) -> Option<&LoadStatus> {
        self.statuses.get(&language)
    }

    /// Keys present in `reference` but absent from `language`.
    pub fn missing_keys(&self, language: Language, reference: Language) -> Vec<String> {
        let (Some(target), Some(reference)) = (self.get(language), self.get(reference)) else {
            return Vec::new();
        };
        reference
            .leaf_keys()
            .into_iter()
            .filter(|key| target.lookup(key).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "footer": { "form": { "button": "Request a demo" }, "copyright": "© {year} Foundlab" },
        "veritasDemo": { "logs": { "ingestion": ["one", "two"] } },
        "aiEngineModal": {
            "parser": { "content": [ { "type": "p", "text": "x" } ] },
            "analyst": { "content": [ { "type": "p", "text": "y" }, { "type": "h3", "text": "z" } ] },
            "chiefStrategist": { "content": [] }
        },
        "stats": { "accuracy": 98.7 }
    }"#;

    #[test]
    fn lookup_walks_nested_tables() {
        let bundle = LocaleBundle::from_json_str(Language::En, SAMPLE).unwrap();
        assert_eq!(
            bundle.lookup("footer.form.button").and_then(LocaleValue::as_text),
            Some("Request a demo")
        );
        assert!(bundle.lookup("footer.form").unwrap().is_table());
        assert!(bundle.lookup("footer.form.button.extra").is_none());
        assert!(bundle.lookup("footer.missing").is_none());
        assert!(bundle.lookup("").is_none());
    }

    #[test]
    fn arrays_keep_their_shape() {
        let bundle = LocaleBundle::from_json_str(Language::En, SAMPLE).unwrap();
        assert_eq!(
            bundle.lookup("veritasDemo.logs.ingestion"),
            Some(&LocaleValue::Lines(vec!["one".into(), "two".into()]))
        );
        assert!(matches!(
            bundle.lookup("aiEngineModal.parser.content"),
            Some(LocaleValue::Blocks(blocks)) if blocks.len() == 1
        ));
        assert!(matches!(
            bundle.lookup("aiEngineModal.analyst.content"),
            Some(LocaleValue::Blocks(blocks)) if blocks.len() == 1
        ));
        assert_eq!(
            bundle.lookup("aiEngineModal.chiefStrategist.content"),
            Some(&LocaleValue::Lines(Vec::new()))
        );
        assert!(matches!(
            bundle.lookup("stats.accuracy"),
            Some(LocaleValue::Other(_))
        ));
    }

    #[test]
    fn top_level_must_be_object() {
        assert!(LocaleBundle::from_json_str(Language::Pt, "[\"a\"]").is_err());
        assert!(LocaleBundle::from_json_str(Language::Pt, "{not json").is_err());
    }

    #[test]
    fn leaf_keys_are_flattened() {
        let bundle = LocaleBundle::from_json_str(Language::En, SAMPLE).unwrap();
        let keys = bundle.leaf_keys();
        assert!(keys.contains(&"footer.form.button".to_string()));
        assert!(keys.contains(&"veritasDemo.logs.ingestion".to_string()));
        assert!(!keys.contains(&"footer.form".to_string()));
    }

    #[test]
    fn bom_prefixed_files_decode() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(br#"{"a": "b"}"#);
        let bundle = LocaleBundle::from_bytes(Language::En, &bytes).unwrap();
        assert_eq!(bundle.lookup("a").and_then(LocaleValue::as_text), Some("b"));
        assert_eq!(bundle.fingerprint().map(str::len), Some(64));
    }

    #[test]
    fn from_bundles_fills_missing_languages() {
        let en = LocaleBundle::from_json_str(Language::En, SAMPLE).unwrap();
        let set = BundleSet::from_bundles([en]);
        assert!(set.get(Language::Pt).unwrap().is_empty());
        assert!(set.missing_keys(Language::Pt, Language::En).len() >= 4);
        assert!(set.missing_keys(Language::En, Language::Pt).is_empty());
    }
}
