// SPDX-License-Identifier: PMPL-1.0-or-later

//! Internationalisation for the site.
//!
//! ## Supported languages
//!
//! | Code | Language   | `lang` attribute |
//! |------|------------|------------------|
//! | pt   | Portuguese | pt-BR            |
//! | en   | English    | en               |
//!
//! ## Design
//!
//! Translation keys use dotted namespaces: `"footer.form.button"`,
//! `"veritasDemo.logs.ingestion"`. A key resolves to a string, an array of
//! log lines, an array of content blocks, or a nested table. Missing keys
//! resolve to the key itself (fail-open, never panics), and so does every
//! key before the bundles have loaded.
//!
//! Bundles are JSON files read at startup, both languages in parallel. A
//! bundle that fails to load is replaced by an empty one.

mod bundle;
mod preference;
mod resolver;

pub use bundle::{BundleSet, LoadStatus, LocaleBundle, LocaleValue};
pub use preference::{
    environment_locale, initial_language, locale_language, FilePreferenceStore,
    MemoryPreferenceStore, PreferenceStore, LANGUAGE_KEY, THEME_KEY,
};
pub use resolver::{interpolate, Args, Resolved, Translator};
