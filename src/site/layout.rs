// SPDX-License-Identifier: PMPL-1.0-or-later

//! Geometry of each route's page, laid out top to bottom at a fixed width.

use super::Route;
use crate::demo::DemoStep;
use crate::dom::{Document, Element, ElementId};
use crate::observer::Rect;
use crate::reveal::DEFAULT_SELECTOR;

pub const SECTION_CLASS: &str = "section-container";
pub const DEMO_ANCHOR: &str = "veritas-demo";

pub const MARKER_OFFSET: f64 = 400.0;
pub const MARKER_SPACING: f64 = 420.0;
pub const MARKER_HEIGHT: f64 = 96.0;
const REVEAL_OFFSET: f64 = 120.0;
const REVEAL_SPACING: f64 = 200.0;
const REVEAL_HEIGHT: f64 = 160.0;
const LEGAL_HEIGHT: f64 = 1800.0;

/// One block of the home page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpec {
    pub anchor: &'static str,
    /// Translation key prefix for the section copy.
    pub prefix: &'static str,
    pub supertitle: bool,
    pub subtitle: bool,
    pub reveal_blocks: usize,
    pub height: f64,
}

impl SectionSpec {
    const fn new(anchor: &'static str, prefix: &'static str, height: f64) -> Self {
        Self {
            anchor,
            prefix,
            supertitle: true,
            subtitle: false,
            reveal_blocks: 3,
            height,
        }
    }

    const fn no_supertitle(mut self) -> Self {
        self.supertitle = false;
        self
    }

    const fn with_subtitle(mut self) -> Self {
        self.subtitle = true;
        self
    }

    pub fn title_key(&self) -> String {
        format!("{}.title", self.prefix)
    }

    pub fn supertitle_key(&self) -> Option<String> {
        self.supertitle.then(|| format!("{}.supertitle", self.prefix))
    }

    pub fn subtitle_key(&self) -> Option<String> {
        self.subtitle.then(|| format!("{}.subtitle", self.prefix))
    }
}

pub fn demo_section_height() -> f64 {
    MARKER_OFFSET + DemoStep::ALL.len() as f64 * MARKER_SPACING + 200.0
}

pub const HOME_SECTIONS: [SectionSpec; 12] = [
    SectionSpec::new("hero", "hero", 900.0).no_supertitle().with_subtitle(),
    SectionSpec::new("pain-points", "painPoints", 1000.0),
    SectionSpec::new("solucoes", "customerJourney", 1100.0),
    SectionSpec::new("porque-foundlab", "whyFoundlab", 1400.0),
    SectionSpec::new("ai-trust", "aiTrust", 1000.0).with_subtitle(),
    SectionSpec::new("performance", "performanceChart", 1000.0).with_subtitle(),
    SectionSpec::new("motores-ia", "aiEngines", 1600.0).with_subtitle(),
    SectionSpec::new("casos-de-uso", "caseStudies", 1000.0),
    SectionSpec::new(DEMO_ANCHOR, "veritasDemo", 2700.0).with_subtitle(),
    SectionSpec::new("tecnologia", "technology", 1200.0),
    SectionSpec::new("parcerias", "partners", 800.0).no_supertitle(),
    SectionSpec::new("contato", "footer", 1000.0)
        .no_supertitle()
        .with_subtitle(),
];

#[derive(Debug, Clone)]
pub struct PageLayout {
    pub route: Route,
    pub document: Document,
    pub sections: Vec<(SectionSpec, ElementId)>,
    pub markers: Vec<ElementId>,
}

impl PageLayout {
    pub fn build(route: Route, width: f64) -> Self {
        match route {
            Route::Home => Self::home(width),
            Route::Terms | Route::Privacy => Self::legal(route, width),
        }
    }

    fn home(width: f64) -> Self {
        let reveal_class = DEFAULT_SELECTOR.trim_start_matches('.');
        let mut document = Document::new();
        let mut sections = Vec::new();
        let mut markers = Vec::new();
        let mut top = 0.0;

        for section in HOME_SECTIONS {
            let tag = if section.anchor == "contato" {
                "footer"
            } else {
                "section"
            };
            let id = document.push(
                Element::new(tag)
                    .anchor(section.anchor)
                    .class(SECTION_CLASS)
                    .rect(Rect::new(0.0, top, width, section.height)),
            );
            sections.push((section, id));

            for block in 0..section.reveal_blocks {
                document.push(Element::new("div").class(reveal_class).rect(Rect::new(
                    0.0,
                    top + REVEAL_OFFSET + block as f64 * REVEAL_SPACING,
                    width,
                    REVEAL_HEIGHT,
                )));
            }

            if section.anchor == DEMO_ANCHOR {
                for (index, step) in DemoStep::ALL.iter().enumerate() {
                    markers.push(document.push(
                        Element::new("div").data("step-id", step.id()).rect(Rect::new(
                            0.0,
                            top + MARKER_OFFSET + index as f64 * MARKER_SPACING,
                            width / 2.0,
                            MARKER_HEIGHT,
                        )),
                    ));
                }
            }
            top += section.height;
        }

        Self {
            route: Route::Home,
            document,
            sections,
            markers,
        }
    }

    fn legal(route: Route, width: f64) -> Self {
        let mut document = Document::new();
        document.push(
            Element::new("article")
                .anchor(route.path().trim_start_matches('/'))
                .rect(Rect::new(0.0, 0.0, width, LEGAL_HEIGHT)),
        );
        Self {
            route,
            document,
            sections: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Top edge of the section with `anchor`.
    pub fn section_top(&self, anchor: &str) -> Option<f64> {
        self.document
            .find_anchor(anchor)
            .and_then(|id| self.document.rect(id))
            .map(|rect| rect.y)
    }

    pub fn height(&self) -> f64 {
        self.document.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_section_fits_its_markers() {
        let section = HOME_SECTIONS
            .iter()
            .find(|section| section.anchor == DEMO_ANCHOR)
            .unwrap();
        assert_eq!(section.height, demo_section_height());
    }

    #[test]
    fn home_layout_stacks_sections() {
        let layout = PageLayout::build(Route::Home, 1280.0);
        assert_eq!(layout.sections.len(), HOME_SECTIONS.len());
        assert_eq!(layout.markers.len(), DemoStep::ALL.len());
        assert_eq!(layout.section_top("hero"), Some(0.0));
        assert_eq!(layout.section_top("pain-points"), Some(900.0));
        let total: f64 = HOME_SECTIONS.iter().map(|section| section.height).sum();
        assert_eq!(layout.height(), total);
        assert_eq!(
            layout.document.query_selector_all(".section-container").unwrap().len(),
            HOME_SECTIONS.len()
        );
        assert_eq!(
            layout.document.query_selector_all("footer#contato").unwrap().len(),
            1
        );
    }

    #[test]
    fn legal_pages_have_no_markers() {
        let layout = PageLayout::build(Route::Terms, 1280.0);
        assert!(layout.markers.is_empty());
        assert_eq!(layout.section_top("terms"), Some(0.0));
    }
}
