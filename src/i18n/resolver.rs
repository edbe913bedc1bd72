// SPDX-License-Identifier: PMPL-1.0-or-later

//! Dotted-key translation lookup with `{placeholder}` interpolation.

use super::bundle::{BundleSet, LocaleValue};
use crate::content::ContentBlock;
use crate::types::Language;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// Named substitution values for `{name}` tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    values: BTreeMap<String, String>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Args::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// A string leaf, interpolated when arguments were supplied.
    Text(String),
    /// An array or table, returned as-is for structured rendering.
    Structured(&'a LocaleValue),
    /// Key missing or bundles not loaded yet: carries the key itself.
    Fallback(String),
}

impl Resolved<'_> {
    /// Display string: the text, or the key for fallbacks and structured
    /// values.
    pub fn into_text(self, key: &str) -> String {
        match self {
            Resolved::Text(text) | Resolved::Fallback(text) => text,
            Resolved::Structured(_) => key.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolved::Fallback(_))
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"))
}

/// Replace every `{name}` with its argument; unknown names stay literal.
pub fn interpolate(template: &str, args: &Args) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures<'_>| match args.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Resolves keys against the active language's bundle.
///
/// Before bundles are installed every lookup falls back to the key, so the
/// page can render immediately and fill in once loading completes.
#[derive(Debug, Clone)]
pub struct Translator {
    bundles: Option<Arc<BundleSet>>,
    language: Language,
}

impl Translator {
    pub fn pending(language: Language) -> Self {
        Self {
            bundles: None,
            language,
        }
    }

    pub fn with_bundles(bundles: BundleSet, language: Language) -> Self {
        Self {
            bundles: Some(Arc::new(bundles)),
            language,
        }
    }

    pub fn install(&mut self, bundles: BundleSet) {
        self.bundles = Some(Arc::new(bundles));
    }

    pub fn is_loaded(&self) -> bool {
        self.bundles.is_some()
    }

    pub fn bundles(&self) -> Option<&BundleSet> {
        self.bundles.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch the lookup language. Persistence and the document attribute
    /// are handled by [`crate::context::SiteContext::set_language`].
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn resolve(&self, key: &str, args: Option<&Args>) -> Resolved<'_> {
        let Some(bundle) = self
            .bundles
            .as_deref()
            .and_then(|set| set.get(self.language))
        else {
            return Resolved::Fallback(key.to_string());
        };

        match bundle.lookup(key) {
            Some(LocaleValue::Text(text)) => match args {
                Some(args) => Resolved::Text(interpolate(text, args)),
                None => Resolved::Text(text.clone()),
            },
            Some(value) => Resolved::Structured(value),
            None => {
                trace!(key, language = %self.language, "translation key missing");
                Resolved::Fallback(key.to_string())
            }
        }
    }

    pub fn t(&self, key: &str) -> String {
        self.resolve(key, None).into_text(key)
    }

    pub fn t_with(&self, key: &str, args: &Args) -> String {
        self.resolve(key, Some(args)).into_text(key)
    }

    /// String array under `key`; empty when the key is missing or holds
    /// anything else.
    pub fn lines(&self, key: &str) -> Vec<String> {
        match self.resolve(key, None) {
            Resolved::Structured(LocaleValue::Lines(lines)) => lines.clone(),
            _ => Vec::new(),
        }
    }

    /// Content blocks under `key`. Any array counts: a string array or an
    /// empty one has no renderable blocks and yields an empty slice. `None`
    /// only when the key is missing or holds something other than an array.
    pub fn blocks(&self, key: &str) -> Option<&[ContentBlock]> {
        match self.resolve(key, None) {
            Resolved::Structured(LocaleValue::Blocks(blocks)) => Some(blocks.as_slice()),
            Resolved::Structured(LocaleValue::Lines(_)) => Some(&[]),
            _ => None,
        }
    }
}
