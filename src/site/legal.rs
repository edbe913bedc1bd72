// SPDX-License-Identifier: PMPL-1.0-or-later

//! Terms of service and privacy policy pages.

use crate::i18n::Translator;

pub const SECTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalPage {
    Terms,
    Privacy,
}

impl LegalPage {
    /// Top-level translation key holding the page copy.
    pub fn prefix(&self) -> &'static str {
        match self {
            LegalPage::Terms => "terms",
            LegalPage::Privacy => "privacy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalSection {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalDocument {
    pub title: String,
    pub intro: String,
    pub sections: Vec<LegalSection>,
}

impl LegalDocument {
    pub fn compose(page: LegalPage, translator: &Translator) -> Self {
        let prefix = page.prefix();
        let sections = (1..=SECTION_COUNT)
            .map(|n| LegalSection {
                title: translator.t(&format!("{}.section{}Title", prefix, n)),
                body: translator.t(&format!("{}.section{}", prefix, n)),
            })
            .collect();
        Self {
            title: translator.t(&format!("{}.title", prefix)),
            intro: translator.t(&format!("{}.intro", prefix)),
            sections,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone(), String::new(), self.intro.clone()];
        for section in &self.sections {
            lines.push(String::new());
            lines.push(section.title.clone());
            lines.push(section.body.clone());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;

    #[test]
    fn four_sections_in_order() {
        let doc = LegalDocument::compose(LegalPage::Privacy, &Translator::pending(Language::Pt));
        assert_eq!(doc.title, "privacy.title");
        assert_eq!(doc.sections.len(), SECTION_COUNT);
        assert_eq!(doc.sections[3].title, "privacy.section4Title");
        assert_eq!(doc.sections[3].body, "privacy.section4");
        assert_eq!(doc.lines().len(), 3 + SECTION_COUNT * 3);
    }
}
