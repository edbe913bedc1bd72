// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation loading, lookup and language persistence against real files.

use proptest::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use umbrella_site::context::SiteContext;
use umbrella_site::i18n::{
    interpolate, Args, BundleSet, FilePreferenceStore, LocaleBundle, PreferenceStore, Translator,
    LANGUAGE_KEY,
};
use umbrella_site::lifecycle::ResourceTracker;
use umbrella_site::site;
use umbrella_site::types::Language;

fn shipped_public_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("public")
}

fn write_locale(public: &Path, code: &str, content: &[u8]) {
    let dir = public.join("locales").join(code);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("translation.json"), content).unwrap();
}

#[test]
fn shipped_bundles_load_with_matching_keys() {
    let bundles = BundleSet::load(&shipped_public_dir());
    for &language in Language::all() {
        let status = bundles.status(language).unwrap();
        assert!(!status.is_fallback(), "{} failed to load: {:?}", language, status);
    }
    assert!(bundles.missing_keys(Language::Pt, Language::En).is_empty());
    assert!(bundles.missing_keys(Language::En, Language::Pt).is_empty());
}

#[test]
fn shipped_copyright_interpolates_year() {
    let bundles = BundleSet::load(&shipped_public_dir());
    let en = Translator::with_bundles(bundles.clone(), Language::En);
    let pt = Translator::with_bundles(bundles, Language::Pt);
    assert_eq!(
        site::copyright(&en, 2026),
        "© 2026 Foundlab. All rights reserved."
    );
    assert_eq!(
        site::copyright(&pt, 2026),
        "© 2026 Foundlab. Todos os direitos reservados."
    );
}

#[test]
fn bundle_with_byte_order_mark_loads() {
    let dir = tempdir().unwrap();
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(br#"{"hero": {"title": "Trust"}}"#);
    write_locale(dir.path(), "en", &bytes);
    write_locale(dir.path(), "pt", br#"{"hero": {"title": "Confianca"}}"#);

    let translator = Translator::with_bundles(BundleSet::load(dir.path()), Language::En);
    assert_eq!(translator.t("hero.title"), "Trust");
    assert!(translator
        .bundles()
        .and_then(|set| set.get(Language::En))
        .and_then(LocaleBundle::fingerprint)
        .is_some());
}

#[test]
fn corrupt_bundle_only_affects_its_language() {
    let dir = tempdir().unwrap();
    write_locale(dir.path(), "en", br#"{"hero": {"title": "Trust"}}"#);
    write_locale(dir.path(), "pt", b"{ \"hero\": ");

    let bundles = BundleSet::load(dir.path());
    assert!(bundles.status(Language::Pt).unwrap().is_fallback());
    assert!(!bundles.status(Language::En).unwrap().is_fallback());

    let mut translator = Translator::with_bundles(bundles, Language::En);
    assert_eq!(translator.t("hero.title"), "Trust");
    translator.set_language(Language::Pt);
    assert_eq!(translator.t("hero.title"), "hero.title");
}

#[test]
fn missing_locale_directory_falls_back_to_keys() {
    let dir = tempdir().unwrap();
    let translator = Translator::with_bundles(BundleSet::load(dir.path()), Language::Pt);
    assert!(translator.is_loaded());
    assert_eq!(translator.t("footer.title"), "footer.title");
    assert!(translator.lines("veritasDemo.logs.ingestion").is_empty());
}

#[test]
fn language_choice_survives_reopen() {
    let dir = tempdir().unwrap();
    let prefs = dir.path().join("state").join("prefs.json");

    {
        let mut context = SiteContext::new(
            Box::new(FilePreferenceStore::open(&prefs)),
            Some("en_US.UTF-8"),
            Language::En,
            ResourceTracker::new(),
        );
        assert_eq!(context.language(), Language::En);
        context.set_language(Language::Pt).unwrap();
    }

    let reopened = FilePreferenceStore::open(&prefs);
    assert_eq!(reopened.get(LANGUAGE_KEY).as_deref(), Some("pt"));

    // The stored choice wins over the environment.
    let context = SiteContext::new(
        Box::new(reopened),
        Some("en_US.UTF-8"),
        Language::En,
        ResourceTracker::new(),
    );
    assert_eq!(context.language(), Language::Pt);
    assert_eq!(context.document_lang(), "pt-BR");
}

#[test]
fn corrupt_preference_file_is_rewritten() {
    let dir = tempdir().unwrap();
    let prefs = dir.path().join("prefs.json");
    fs::write(&prefs, "not json").unwrap();

    let context = SiteContext::new(
        Box::new(FilePreferenceStore::open(&prefs)),
        None,
        Language::Pt,
        ResourceTracker::new(),
    );
    assert_eq!(context.language(), Language::Pt);
    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&prefs).unwrap()).unwrap();
    assert_eq!(stored[LANGUAGE_KEY], "pt");
}

fn sample_translator() -> Translator {
    let en = LocaleBundle::from_json_str(
        Language::En,
        r#"{"hero": {"title": "Trust"}, "footer": {"copyright": "© {year} Foundlab"}}"#,
    )
    .unwrap();
    let pt = LocaleBundle::from_json_str(Language::Pt, r#"{"hero": {"title": "Confiança"}}"#)
        .unwrap();
    Translator::with_bundles(BundleSet::from_bundles([en, pt]), Language::En)
}

proptest! {
    #[test]
    fn unknown_keys_resolve_to_themselves(key in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}") {
        prop_assume!(key != "hero" && key != "footer");
        prop_assume!(!key.starts_with("hero.") && !key.starts_with("footer."));
        let translator = sample_translator();
        prop_assert_eq!(translator.t(&key), key.clone());
        prop_assert_eq!(Translator::pending(Language::Pt).t(&key), key);
    }

    #[test]
    fn templates_without_placeholders_are_unchanged(text in "[^{}]{0,64}", value in "[a-z0-9]{0,8}") {
        let args = Args::new().with("year", value);
        prop_assert_eq!(interpolate(&text, &args), text);
    }

    #[test]
    fn year_placeholder_is_substituted(year in 1900i32..3000) {
        let translator = sample_translator();
        let text = translator.t_with("footer.copyright", &Args::new().with("year", year));
        prop_assert_eq!(text, format!("© {} Foundlab", year));
    }
}
