// SPDX-License-Identifier: PMPL-1.0-or-later

//! Scripted "Veritas Protocol" demo.
//!
//! The demo walks a sample brokerage statement through five stages. Which
//! stage is active depends only on scroll position: each stage has a marker
//! element, and the marker sitting in the middle fifth of the viewport wins.
//! Everything on screen (document highlights, terminal log, JSON output) is
//! a pure function of the active stage, see [`rules`] and [`frame`].

pub mod frame;
pub mod player;
pub mod render;
pub mod rules;
pub mod tui;

use crate::dom::{Document, ElementId};
use crate::lifecycle::ResourceTracker;
use crate::observer::{IntersectionObserver, ObserverOptions, RootMargin, Viewport};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub use frame::{DemoFrame, Span, Tone};
pub use rules::{DemoField, FieldRule, FieldState};

/// Selector for stage marker elements.
pub const STEP_MARKER_SELECTOR: &str = "[data-step-id]";
/// Root margin that leaves only the middle 20% of the viewport.
pub const STEP_BAND_MARGIN: &str = "-40% 0px -40% 0px";
pub const STEP_BAND_THRESHOLD: f64 = 0.7;

/// Stages of the scripted demo, in timeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoStep {
    Ingestion,
    Extraction,
    Validation,
    Analysis,
    Final,
}

impl DemoStep {
    pub const ALL: [DemoStep; 5] = [
        DemoStep::Ingestion,
        DemoStep::Extraction,
        DemoStep::Validation,
        DemoStep::Analysis,
        DemoStep::Final,
    ];

    /// Value of the marker's `data-step-id` attribute.
    pub fn id(&self) -> &'static str {
        match self {
            DemoStep::Ingestion => "ingestion",
            DemoStep::Extraction => "extraction",
            DemoStep::Validation => "validation",
            DemoStep::Analysis => "analysis",
            DemoStep::Final => "final",
        }
    }

    pub fn from_id(id: &str) -> Option<DemoStep> {
        DemoStep::ALL.iter().copied().find(|step| step.id() == id)
    }

    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn title_key(&self) -> &'static str {
        match self {
            DemoStep::Ingestion => "veritasDemo.timeline.ingestion",
            DemoStep::Extraction => "veritasDemo.timeline.extraction",
            DemoStep::Validation => "veritasDemo.timeline.validation",
            DemoStep::Analysis => "veritasDemo.timeline.analysis",
            DemoStep::Final => "veritasDemo.timeline.package",
        }
    }

    pub fn log_key(&self) -> &'static str {
        match self {
            DemoStep::Ingestion => "veritasDemo.logs.ingestion",
            DemoStep::Extraction => "veritasDemo.logs.extraction",
            DemoStep::Validation => "veritasDemo.logs.validation",
            DemoStep::Analysis => "veritasDemo.logs.analysis",
            DemoStep::Final => "veritasDemo.logs.final",
        }
    }
}

impl Default for DemoStep {
    fn default() -> Self {
        DemoStep::Ingestion
    }
}

impl std::fmt::Display for DemoStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTransition {
    pub from: DemoStep,
    pub to: DemoStep,
}

impl StepTransition {
    /// Steps jumped over by a fast scroll (0 for adjacent stages).
    pub fn skipped(&self) -> usize {
        self.from.ordinal().abs_diff(self.to.ordinal()).saturating_sub(1)
    }
}

/// Tracks the active stage from marker intersections.
pub struct StepSequencer {
    active: DemoStep,
    markers: BTreeMap<ElementId, DemoStep>,
    observer: Option<IntersectionObserver>,
}

impl StepSequencer {
    /// Observe every `[data-step-id]` marker in `document`. Markers with an
    /// unknown id are ignored.
    pub fn attach(document: &Document, tracker: &ResourceTracker) -> Result<Self> {
        let mut markers = BTreeMap::new();
        for id in document.query_selector_all(STEP_MARKER_SELECTOR)? {
            let raw = document
                .element(id)
                .and_then(|el| el.data_value("step-id"))
                .unwrap_or_default();
            match DemoStep::from_id(raw) {
                Some(step) => {
                    markers.insert(id, step);
                }
                None => warn!(step_id = raw, "ignoring marker with unknown step id"),
            }
        }

        let observer = if markers.is_empty() {
            None
        } else {
            let root_margin: RootMargin = STEP_BAND_MARGIN
                .parse()
                .context("step band root margin")?;
            let mut observer = IntersectionObserver::new(
                ObserverOptions {
                    threshold: STEP_BAND_THRESHOLD,
                    root_margin,
                },
                tracker,
            );
            for id in markers.keys() {
                observer.observe(*id);
            }
            Some(observer)
        };
        debug!(markers = markers.len(), "step sequencer attached");

        Ok(Self {
            active: DemoStep::default(),
            markers,
            observer,
        })
    }

    pub fn active(&self) -> DemoStep {
        self.active
    }

    pub fn markers(&self) -> usize {
        self.markers.len()
    }

    /// Replace the active stage. Returns the transition when it changed.
    pub fn set_active(&mut self, step: DemoStep) -> Option<StepTransition> {
        if step == self.active {
            return None;
        }
        let transition = StepTransition {
            from: self.active,
            to: step,
        };
        self.active = step;
        info!(
            from = %transition.from,
            to = %transition.to,
            skipped = transition.skipped(),
            "demo step changed"
        );
        Some(transition)
    }

    /// Check marker intersections. When several markers enter the band in
    /// one batch the last one in document order wins.
    pub fn update(&mut self, document: &Document, viewport: &Viewport) -> Option<StepTransition> {
        let observer = self.observer.as_mut()?;
        let candidate = observer
            .take_records(document, viewport)
            .into_iter()
            .filter(|entry| entry.is_intersecting)
            .filter_map(|entry| self.markers.get(&entry.target).copied())
            .last()?;
        self.set_active(candidate)
    }

    pub fn detach(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
        }
    }
}

impl Drop for StepSequencer {
    fn drop(&mut self) {
        self.detach();
    }
}
