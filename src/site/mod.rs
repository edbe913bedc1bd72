// SPDX-License-Identifier: PMPL-1.0-or-later

//! Routes and page composition.
//!
//! | Path       | Page                                |
//! |------------|-------------------------------------|
//! | `/`        | Marketing home, twelve sections     |
//! | `/terms`   | Terms of service                    |
//! | `/privacy` | Privacy policy                      |

pub mod case_studies;
pub mod contact;
pub mod engines;
pub mod header;
pub mod layout;
pub mod legal;
pub mod modal;

use crate::i18n::{Args, Translator};
use case_studies::CASE_STUDIES_ANCHOR;
use chrono::Datelike;
use layout::HOME_SECTIONS;
use legal::{LegalDocument, LegalPage};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no page at '{0}'")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    Terms,
    Privacy,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Home, Route::Terms, Route::Privacy];

    /// Accepts a path with or without a trailing slash; query strings and
    /// fragments are ignored.
    pub fn from_path(path: &str) -> Result<Route, RouteError> {
        let bare = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = bare.trim_end_matches('/');
        match trimmed {
            "" => Ok(Route::Home),
            "/terms" => Ok(Route::Terms),
            "/privacy" => Ok(Route::Privacy),
            _ => Err(RouteError::NotFound(path.to_string())),
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Terms => "/terms",
            Route::Privacy => "/privacy",
        }
    }

    fn legal_page(&self) -> Option<LegalPage> {
        match self {
            Route::Home => None,
            Route::Terms => Some(LegalPage::Terms),
            Route::Privacy => Some(LegalPage::Privacy),
        }
    }
}

impl std::str::FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::from_path(s)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Footer navigation: in-page anchor and label key.
pub const FOOTER_NAV: [(&str, &str); 9] = [
    ("", "footer.nav.home"),
    ("pain-points", "footer.nav.challenges"),
    ("solucoes", "footer.nav.solutions"),
    ("porque-foundlab", "footer.nav.whyFoundlab"),
    ("motores-ia", "footer.nav.aiEngines"),
    ("casos-de-uso", "footer.nav.useCases"),
    ("tecnologia", "footer.nav.technology"),
    ("parcerias", "footer.nav.partners"),
    ("contato", "footer.nav.contact"),
];

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn copyright(translator: &Translator, year: i32) -> String {
    translator.t_with("footer.copyright", &Args::new().with("year", year))
}

pub fn footer_lines(translator: &Translator, year: i32) -> Vec<String> {
    let nav: Vec<String> = FOOTER_NAV
        .iter()
        .map(|(anchor, key)| format!("{} (#{})", translator.t(key), anchor))
        .collect();
    vec![
        nav.join("  "),
        String::new(),
        copyright(translator, year),
        format!(
            "{} ({})  {} ({})",
            translator.t("footer.terms"),
            Route::Terms.path(),
            translator.t("footer.privacy"),
            Route::Privacy.path()
        ),
    ]
}

/// Text of a page, headings first, followed by the shared footer.
pub fn page_lines(route: Route, translator: &Translator, year: i32) -> Vec<String> {
    let mut lines = Vec::new();
    match route.legal_page() {
        Some(page) => lines.extend(LegalDocument::compose(page, translator).lines()),
        None => {
            for section in HOME_SECTIONS {
                lines.push(format!("#{}", section.anchor));
                if let Some(key) = section.supertitle_key() {
                    lines.push(translator.t(&key).to_uppercase());
                }
                lines.push(translator.t(&section.title_key()));
                if let Some(key) = section.subtitle_key() {
                    lines.push(translator.t(&key));
                }
                if section.anchor == CASE_STUDIES_ANCHOR {
                    for card in case_studies::cards(translator) {
                        lines.push(format!("  {}: {}", card.title, card.description));
                    }
                }
                lines.push(String::new());
            }
        }
    }
    lines.push(String::new());
    lines.extend(footer_lines(translator, year));
    lines
}
