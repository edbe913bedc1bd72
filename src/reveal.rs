// SPDX-License-Identifier: PMPL-1.0-or-later

//! Scroll-triggered entrance reveal.
//!
//! Elements matching a selector get the `visible` class once they cross the
//! configured intersection threshold. In one-shot mode an element is
//! unobserved right after its first reveal; otherwise the class follows the
//! element in and out of view on every pass.

use crate::dom::{Document, ElementId};
use crate::lifecycle::ResourceTracker;
use crate::observer::{IntersectionObserver, ObserverOptions, RootMargin, Viewport};
use anyhow::{Context, Result};
use tracing::debug;

pub const VISIBLE_CLASS: &str = "visible";
pub const DEFAULT_SELECTOR: &str = ".scroll-reveal";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
    pub trigger_once: bool,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin {
                bottom: crate::observer::Length::Px(-50.0),
                ..RootMargin::default()
            },
            trigger_once: true,
        }
    }
}

impl RevealOptions {
    pub fn with_margin(mut self, margin: &str) -> Result<Self> {
        self.root_margin = margin
            .parse()
            .with_context(|| format!("reveal root margin '{}'", margin))?;
        Ok(self)
    }

    pub fn toggling(mut self) -> Self {
        self.trigger_once = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealChange {
    pub element: ElementId,
    pub visible: bool,
}

pub struct RevealScheduler {
    selector: String,
    trigger_once: bool,
    observer: Option<IntersectionObserver>,
}

impl RevealScheduler {
    /// Observe every element currently matching `selector`. With no matches
    /// nothing is observed and no observer is allocated.
    pub fn attach(
        document: &Document,
        selector: &str,
        options: RevealOptions,
        tracker: &ResourceTracker,
    ) -> Result<Self> {
        let targets = document
            .query_selector_all(selector)
            .with_context(|| format!("reveal selector '{}'", selector))?;

        let observer = if targets.is_empty() {
            debug!(selector, "no reveal targets");
            None
        } else {
            let mut observer = IntersectionObserver::new(
                ObserverOptions {
                    threshold: options.threshold,
                    root_margin: options.root_margin,
                },
                tracker,
            );
            for target in &targets {
                observer.observe(*target);
            }
            debug!(
                selector,
                targets = targets.len(),
                trigger_once = options.trigger_once,
                "reveal attached"
            );
            Some(observer)
        };

        Ok(Self {
            selector: selector.to_string(),
            trigger_once: options.trigger_once,
            observer,
        })
    }

    /// Elements still being watched.
    pub fn observed(&self) -> usize {
        self.observer.as_ref().map_or(0, IntersectionObserver::observed)
    }

    /// Apply intersection changes for the current viewport. Returns the
    /// elements whose visibility actually changed.
    pub fn update(&mut self, document: &mut Document, viewport: &Viewport) -> Vec<RevealChange> {
        let Some(observer) = self.observer.as_mut() else {
            return Vec::new();
        };
        let mut changes = Vec::new();
        for entry in observer.take_records(document, viewport) {
            if entry.is_intersecting {
                if document.add_class(entry.target, VISIBLE_CLASS) {
                    changes.push(RevealChange {
                        element: entry.target,
                        visible: true,
                    });
                }
                if self.trigger_once {
                    observer.unobserve(entry.target);
                }
            } else if !self.trigger_once && document.remove_class(entry.target, VISIBLE_CLASS) {
                changes.push(RevealChange {
                    element: entry.target,
                    visible: false,
                });
            }
        }
        changes
    }

    /// Release the observer. Safe to call more than once.
    pub fn detach(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
            debug!(selector = %self.selector, "reveal detached");
        }
    }
}

impl Drop for RevealScheduler {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::lifecycle::ResourceKind;
    use crate::observer::Rect;

    fn page() -> (Document, ElementId) {
        let mut doc = Document::new();
        let id = doc.push(
            Element::new("div")
                .class("scroll-reveal")
                .rect(Rect::new(0.0, 1500.0, 800.0, 300.0)),
        );
        doc.push(Element::new("div").rect(Rect::new(0.0, 0.0, 800.0, 3000.0)));
        (doc, id)
    }

    #[test]
    fn default_options_match_site_hook() {
        let options = RevealOptions::default();
        assert_eq!(options.threshold, 0.1);
        assert!(options.trigger_once);
        assert_eq!(
            options.root_margin,
            "0px 0px -50px 0px".parse::<RootMargin>().unwrap()
        );
    }

    #[test]
    fn no_matches_allocates_nothing() {
        let tracker = ResourceTracker::new();
        let (doc, _) = page();
        let scheduler =
            RevealScheduler::attach(&doc, ".missing", RevealOptions::default(), &tracker).unwrap();
        assert_eq!(scheduler.observed(), 0);
        assert_eq!(tracker.live(ResourceKind::Observer), 0);
    }

    #[test]
    fn one_shot_unobserves_after_reveal() {
        let tracker = ResourceTracker::new();
        let (mut doc, id) = page();
        let mut scheduler =
            RevealScheduler::attach(&doc, ".scroll-reveal", RevealOptions::default(), &tracker)
                .unwrap();
        let mut viewport = Viewport::new(1200.0, 800.0);

        assert!(scheduler.update(&mut doc, &viewport).is_empty());
        viewport.scroll_to(1000.0, doc.height());
        let changes = scheduler.update(&mut doc, &viewport);
        assert_eq!(changes, vec![RevealChange { element: id, visible: true }]);
        assert_eq!(scheduler.observed(), 0);

        viewport.scroll_to(0.0, doc.height());
        assert!(scheduler.update(&mut doc, &viewport).is_empty());
        assert!(doc.has_class(id, VISIBLE_CLASS));
    }

    #[test]
    fn detach_releases_observer() {
        let tracker = ResourceTracker::new();
        let (doc, _) = page();
        let mut scheduler =
            RevealScheduler::attach(&doc, ".scroll-reveal", RevealOptions::default(), &tracker)
                .unwrap();
        assert_eq!(tracker.live(ResourceKind::Observer), 1);
        scheduler.detach();
        scheduler.detach();
        assert_eq!(tracker.live(ResourceKind::Observer), 0);
    }
}
