// SPDX-License-Identifier: PMPL-1.0-or-later

//! `umbrella-site diagnostics`: sanity checks for a site checkout.

use crate::config::{ConfigSource, SiteConfig};
use crate::i18n::{BundleSet, LoadStatus};
use crate::types::Language;
use anyhow::{anyhow, Result};
use colored::*;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Missing keys listed per language before the rest are summarised.
const MISSING_KEY_PREVIEW: usize = 5;

pub fn run_diagnostics(config: &SiteConfig, source: &ConfigSource) -> Result<()> {
    println!("{}", "umbrella-site diagnostics".bold());
    let checks = collect(config, source);

    println!();
    for entry in &checks {
        entry.print();
    }

    if checks.iter().any(|entry| entry.level == Level::Error) {
        Err(anyhow!("diagnostics reported issues"))
    } else {
        Ok(())
    }
}

fn collect(config: &SiteConfig, source: &ConfigSource) -> Vec<Diagnostic> {
    let mut checks = vec![
        Diagnostic::ok(
            "version",
            format!("umbrella-site {}", env!("CARGO_PKG_VERSION")),
        ),
        Diagnostic::ok("config", source.to_string()),
    ];

    let public_dir = &config.public_dir;
    if !public_dir.is_dir() {
        checks.push(Diagnostic::error(
            "public dir",
            format!("{} missing", public_dir.display()),
        ));
        return checks;
    }
    checks.push(Diagnostic::ok(
        "public dir",
        format!("{} exists", public_dir.display()),
    ));
    checks.extend(check_locale_tree(public_dir));

    let bundles = BundleSet::load(public_dir);
    for &language in Language::all() {
        checks.push(check_bundle(&bundles, language));
    }
    checks.extend(check_parity(&bundles));
    checks.push(check_preferences(&config.preference_file));
    checks
}

/// Locale directories on disk that no supported language claims.
fn check_locale_tree(public_dir: &Path) -> Vec<Diagnostic> {
    let root = public_dir.join("locales");
    let mut out = Vec::new();
    for entry in WalkDir::new(&root)
        .min_depth(2)
        .max_depth(2)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name() == "translation.json")
    {
        let code = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        if Language::from_code(code).is_none() {
            out.push(Diagnostic::warning(
                "locale",
                format!("{} is not a supported language", entry.path().display()),
            ));
        }
    }
    out
}

fn check_bundle(bundles: &BundleSet, language: Language) -> Diagnostic {
    let label = match language {
        Language::En => "bundle en",
        Language::Pt => "bundle pt",
    };
    match bundles.status(language) {
        Some(LoadStatus::Loaded {
            path,
            fingerprint,
            keys,
        }) => {
            let short = fingerprint
                .as_deref()
                .map(|hash| &hash[..hash.len().min(12)])
                .unwrap_or("-");
            Diagnostic::ok(
                label,
                format!("{} ({} keys, sha256 {})", path.display(), keys, short),
            )
        }
        Some(LoadStatus::Fallback { path, reason }) => {
            Diagnostic::error(label, format!("{}: {}", path.display(), reason))
        }
        Some(LoadStatus::InMemory) | None => Diagnostic::warning(label, "not loaded from disk".into()),
    }
}

fn check_parity(bundles: &BundleSet) -> Vec<Diagnostic> {
    let pairs = [(Language::Pt, Language::En), (Language::En, Language::Pt)];
    pairs
        .iter()
        .map(|&(language, reference)| {
            let label = match language {
                Language::En => "keys en",
                Language::Pt => "keys pt",
            };
            let missing = bundles.missing_keys(language, reference);
            if missing.is_empty() {
                Diagnostic::ok(label, format!("all {} keys present", reference))
            } else {
                let mut detail = missing
                    .iter()
                    .take(MISSING_KEY_PREVIEW)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                if missing.len() > MISSING_KEY_PREVIEW {
                    detail.push_str(&format!(" and {} more", missing.len() - MISSING_KEY_PREVIEW));
                }
                Diagnostic::warning(
                    label,
                    format!("{} missing from {}: {}", missing.len(), reference, detail),
                )
            }
        })
        .collect()
}

fn check_preferences(path: &Path) -> Diagnostic {
    const LABEL: &str = "preferences";
    if !path.exists() {
        return Diagnostic::ok(
            LABEL,
            format!("{} not created yet (first run)", path.display()),
        );
    }
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&content) {
            Ok(values) => Diagnostic::ok(
                LABEL,
                format!("{} ({} entries)", path.display(), values.len()),
            ),
            Err(err) => Diagnostic::warning(
                LABEL,
                format!("{} is corrupt and will be rewritten: {}", path.display(), err),
            ),
        },
        Err(err) => Diagnostic::error(LABEL, format!("{} unreadable: {}", path.display(), err)),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Level {
    Ok,
    Warn,
    Error,
}

impl Level {
    fn tag(&self) -> ColoredString {
        match self {
            Level::Ok => "OK".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERR".red(),
        }
    }
}

#[derive(Debug)]
struct Diagnostic {
    label: &'static str,
    level: Level,
    detail: String,
}

impl Diagnostic {
    fn new(label: &'static str, level: Level, detail: String) -> Self {
        Self {
            label,
            level,
            detail,
        }
    }

    fn ok(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }

    fn print(&self) {
        println!("  [{}] {:14} {}", self.level.tag(), self.label, self.detail);
    }
}
