// SPDX-License-Identifier: PMPL-1.0-or-later

//! Use-case cards and their detail dialog.
//!
//! Each study's dialog body is stored as individual keys under
//! `caseStudies.<id>.modalContent` (`p1`, `h4_1`, `li1`..`li4`, `h4_2`,
//! `quote`) and assembled into content blocks here.

use super::modal::Modal;
use crate::content::{render_plain, ContentBlock};
use crate::i18n::Translator;
use anyhow::{anyhow, Result};
use std::time::Duration;

pub const CASE_STUDIES_ANCHOR: &str = "casos-de-uso";
/// Stagger between card reveals.
pub const CARD_REVEAL_STEP: Duration = Duration::from_millis(200);
const LIST_ITEMS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseStudyId {
    AssetManagement,
    PrivateBanking,
    MergersAndAcquisitions,
    RegulatoryReporting,
}

impl CaseStudyId {
    pub const ALL: [CaseStudyId; 4] = [
        CaseStudyId::AssetManagement,
        CaseStudyId::PrivateBanking,
        CaseStudyId::MergersAndAcquisitions,
        CaseStudyId::RegulatoryReporting,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            CaseStudyId::AssetManagement => "assetManagement",
            CaseStudyId::PrivateBanking => "privateBanking",
            CaseStudyId::MergersAndAcquisitions => "mergersAndAcquisitions",
            CaseStudyId::RegulatoryReporting => "regulatoryReporting",
        }
    }

    fn position(&self) -> usize {
        CaseStudyId::ALL
            .iter()
            .position(|study| study == self)
            .unwrap_or_default()
    }

    /// Transition delay of the card, so the row fades in left to right.
    pub fn reveal_delay(&self) -> Duration {
        CARD_REVEAL_STEP * self.position() as u32
    }

    fn key(&self, leaf: &str) -> String {
        format!("caseStudies.{}.{}", self.id(), leaf)
    }

    pub fn card_title_key(&self) -> String {
        self.key("cardTitle")
    }

    pub fn card_description_key(&self) -> String {
        self.key("cardDescription")
    }

    pub fn modal_title_key(&self) -> String {
        self.key("modalTitle")
    }

    fn content_key(&self, part: &str) -> String {
        self.key(&format!("modalContent.{}", part))
    }
}

impl std::str::FromStr for CaseStudyId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        CaseStudyId::ALL
            .iter()
            .copied()
            .find(|study| study.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = CaseStudyId::ALL.iter().map(CaseStudyId::id).collect();
                anyhow!("unknown case study '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

impl std::fmt::Display for CaseStudyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

pub type CaseStudyModal = Modal<CaseStudyId>;

/// Card shown in the use-case grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseStudyCard {
    pub study: CaseStudyId,
    pub title: String,
    pub description: String,
    pub reveal_delay: Duration,
}

impl CaseStudyCard {
    pub fn compose(study: CaseStudyId, translator: &Translator) -> Self {
        Self {
            study,
            title: translator.t(&study.card_title_key()),
            description: translator.t(&study.card_description_key()),
            reveal_delay: study.reveal_delay(),
        }
    }
}

pub fn cards(translator: &Translator) -> Vec<CaseStudyCard> {
    CaseStudyId::ALL
        .iter()
        .map(|study| CaseStudyCard::compose(*study, translator))
        .collect()
}

/// Title and body of a case study's dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseStudyDetail {
    pub study: CaseStudyId,
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

impl CaseStudyDetail {
    pub fn compose(study: CaseStudyId, translator: &Translator) -> Self {
        let part = |name: &str| translator.t(&study.content_key(name));
        let items = (1..=LIST_ITEMS).map(|n| part(&format!("li{}", n))).collect();
        Self {
            study,
            title: translator.t(&study.modal_title_key()),
            blocks: vec![
                ContentBlock::Paragraph { text: part("p1") },
                ContentBlock::Heading { text: part("h4_1") },
                ContentBlock::List { items },
                ContentBlock::Heading { text: part("h4_2") },
                ContentBlock::Quote {
                    text: part("quote"),
                    text2: None,
                },
            ],
        }
    }

    pub fn plain_lines(&self) -> Vec<String> {
        render_plain(&self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{BundleSet, LocaleBundle};
    use crate::lifecycle::ResourceTracker;
    use crate::site::modal::MODAL_CLOSE_DELAY;
    use crate::types::Language;
    use std::time::Instant;

    #[test]
    fn cards_fade_in_left_to_right() {
        let delays: Vec<_> = CaseStudyId::ALL.iter().map(CaseStudyId::reveal_delay).collect();
        assert_eq!(
            delays,
            vec![
                Duration::ZERO,
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(600),
            ]
        );
    }

    #[test]
    fn ids_parse_case_insensitively() {
        assert_eq!(
            "privatebanking".parse::<CaseStudyId>().unwrap(),
            CaseStudyId::PrivateBanking
        );
        assert!("insurance".parse::<CaseStudyId>().is_err());
    }

    #[test]
    fn detail_assembles_blocks_from_keys() {
        let en = LocaleBundle::from_json_str(
            Language::En,
            r#"{"caseStudies": {"privateBanking": {
                "modalTitle": "Private banking",
                "modalContent": {
                    "p1": "Statements from <strong>twelve</strong> custodians.",
                    "h4_1": "What changed",
                    "li1": "a", "li2": "b", "li3": "c", "li4": "d",
                    "h4_2": "In their words",
                    "quote": "Faster."
                }
            }}}"#,
        )
        .unwrap();
        let t = Translator::with_bundles(BundleSet::from_bundles([en]), Language::En);
        let detail = CaseStudyDetail::compose(CaseStudyId::PrivateBanking, &t);
        assert_eq!(detail.title, "Private banking");
        let lines = detail.plain_lines();
        assert_eq!(lines[0], "Statements from twelve custodians.");
        assert!(lines.contains(&"  • d".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("  │ Faster."));

        // Missing studies fall back to their keys like any other lookup.
        let missing = CaseStudyDetail::compose(CaseStudyId::RegulatoryReporting, &t);
        assert_eq!(missing.title, "caseStudies.regulatoryReporting.modalTitle");
    }

    #[test]
    fn modal_clears_study_after_delay() {
        let tracker = ResourceTracker::new();
        let now = Instant::now();
        let mut modal = CaseStudyModal::new(MODAL_CLOSE_DELAY);
        modal.open(CaseStudyId::AssetManagement);
        modal.close(now, &tracker);
        assert_eq!(tracker.total_live(), 1);
        modal.tick(now + Duration::from_millis(299));
        assert_eq!(modal.active(), Some(CaseStudyId::AssetManagement));
        modal.tick(now + MODAL_CLOSE_DELAY);
        assert_eq!(modal.active(), None);
        assert_eq!(tracker.total_live(), 0);
    }
}
