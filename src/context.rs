// SPDX-License-Identifier: PMPL-1.0-or-later

//! Site-wide state owned by the top-level view and handed to everything
//! below it: active language, theme, stored preferences and the global
//! loading indicator.

use crate::i18n::{
    initial_language, Args, BundleSet, PreferenceStore, Translator, LANGUAGE_KEY, THEME_KEY,
};
use crate::lifecycle::ResourceTracker;
use crate::timer::Timeout;
use crate::types::{Language, Theme};
use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Thin progress bar shown while demo content refreshes.
#[derive(Debug, Default)]
pub struct LoadingIndicator {
    visible: bool,
    hide_timer: Timeout,
}

impl LoadingIndicator {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.hide_timer.cancel();
    }

    /// Show now and hide after `duration`. A pulse inside the window
    /// restarts it rather than stacking a second timer.
    pub fn pulse(&mut self, now: Instant, duration: Duration, tracker: &ResourceTracker) {
        self.visible = true;
        self.hide_timer.restart(now, duration, tracker);
    }

    /// Returns `true` when the indicator was hidden by this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.hide_timer.poll(now) {
            self.visible = false;
            return true;
        }
        false
    }
}

pub struct SiteContext {
    translator: Translator,
    preferences: Box<dyn PreferenceStore>,
    theme: Theme,
    document_lang: &'static str,
    loading: LoadingIndicator,
    tracker: ResourceTracker,
}

impl SiteContext {
    /// Resolve the starting language and theme from stored preferences and
    /// the environment, then record them back, as the site does on load.
    pub fn new(
        preferences: Box<dyn PreferenceStore>,
        environment_locale: Option<&str>,
        default_language: Language,
        tracker: ResourceTracker,
    ) -> Self {
        let language = initial_language(preferences.as_ref(), environment_locale, default_language);
        let theme = preferences
            .get(THEME_KEY)
            .and_then(|value| Theme::from_str(&value))
            .unwrap_or_default();
        let mut context = Self {
            translator: Translator::pending(language),
            preferences,
            theme,
            document_lang: language.html_lang(),
            loading: LoadingIndicator::default(),
            tracker,
        };
        if let Err(err) = context.store_language(language) {
            warn!("could not store language preference: {:#}", err);
        }
        context
    }

    pub fn install_bundles(&mut self, bundles: BundleSet) {
        self.translator.install(bundles);
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }

    pub fn t_with(&self, key: &str, args: &Args) -> String {
        self.translator.t_with(key, args)
    }

    pub fn language(&self) -> Language {
        self.translator.language()
    }

    /// Value of the document's `lang` attribute.
    pub fn document_lang(&self) -> &'static str {
        self.document_lang
    }

    /// Store the choice, then switch language and the document attribute.
    /// Nothing changes when the store rejects the write.
    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.store_language(language)?;
        if language != self.translator.language() {
            info!(from = %self.translator.language(), to = %language, "language changed");
        }
        self.use_language(language);
        Ok(())
    }

    /// Switch language for this session only; the stored preference is
    /// left alone.
    pub fn use_language(&mut self, language: Language) {
        self.translator.set_language(language);
        self.document_lang = language.html_lang();
    }

    fn store_language(&mut self, language: Language) -> Result<()> {
        let code = language.code();
        self.preferences
            .set(LANGUAGE_KEY, code)
            .with_context(|| format!("storing language '{}'", code))
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        self.preferences
            .set(THEME_KEY, next.as_str())
            .context("storing theme")?;
        self.theme = next;
        Ok(next)
    }

    pub fn preferences(&self) -> &dyn PreferenceStore {
        self.preferences.as_ref()
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    pub fn loading_mut(&mut self) -> &mut LoadingIndicator {
        &mut self.loading
    }

    /// Pulse the loading indicator using this context's tracker.
    pub fn pulse_loading(&mut self, now: Instant, duration: Duration) {
        self.loading.pulse(now, duration, &self.tracker);
    }

    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MemoryPreferenceStore;
    use anyhow::bail;

    struct ReadOnlyStore;

    impl PreferenceStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<()> {
            bail!("read-only store refused '{}'", key)
        }
    }

    #[test]
    fn new_context_records_initial_language() {
        let context = SiteContext::new(
            Box::new(MemoryPreferenceStore::new()),
            Some("pt_BR.UTF-8"),
            Language::En,
            ResourceTracker::new(),
        );
        assert_eq!(context.language(), Language::Pt);
        assert_eq!(context.document_lang(), "pt-BR");
        assert_eq!(
            context.preferences().get(LANGUAGE_KEY).as_deref(),
            Some("pt")
        );
    }

    #[test]
    fn set_language_updates_attribute_and_store() {
        let mut context = SiteContext::new(
            Box::new(MemoryPreferenceStore::new()),
            None,
            Language::Pt,
            ResourceTracker::new(),
        );
        context.set_language(Language::En).unwrap();
        assert_eq!(context.document_lang(), "en");
        assert_eq!(
            context.preferences().get(LANGUAGE_KEY).as_deref(),
            Some("en")
        );
    }

    #[test]
    fn theme_toggle_persists() {
        let mut context = SiteContext::new(
            Box::new(MemoryPreferenceStore::new()),
            None,
            Language::En,
            ResourceTracker::new(),
        );
        assert_eq!(context.theme(), Theme::Dark);
        assert_eq!(context.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(context.preferences().get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn rejected_write_keeps_language_and_theme() {
        let mut context = SiteContext::new(
            Box::new(ReadOnlyStore),
            None,
            Language::Pt,
            ResourceTracker::new(),
        );
        assert!(context.set_language(Language::En).is_err());
        assert_eq!(context.language(), Language::Pt);
        assert_eq!(context.document_lang(), "pt-BR");

        assert!(context.toggle_theme().is_err());
        assert_eq!(context.theme(), Theme::Dark);
    }

    #[test]
    fn loading_pulse_restarts() {
        let tracker = ResourceTracker::new();
        let mut loading = LoadingIndicator::default();
        let start = Instant::now();
        loading.pulse(start, Duration::from_millis(500), &tracker);
        loading.pulse(start + Duration::from_millis(400), Duration::from_millis(500), &tracker);
        assert!(!loading.tick(start + Duration::from_millis(600)));
        assert!(loading.is_visible());
        assert!(loading.tick(start + Duration::from_millis(900)));
        assert!(!loading.is_visible());

        loading.show();
        assert!(loading.is_visible());
        assert!(!loading.tick(start + Duration::from_secs(5)));
        loading.hide();
        assert!(!loading.is_visible());
        assert_eq!(tracker.total_live(), 0);
    }
}
