// SPDX-License-Identifier: PMPL-1.0-or-later

//! AI engine carousel and detail modal.

use crate::content::{render_plain, ContentBlock};
use crate::i18n::Translator;
use crate::lifecycle::ResourceTracker;
use crate::timer::Interval;
use anyhow::{anyhow, Result};
use std::time::{Duration, Instant};
use tracing::debug;

pub use super::modal::{Modal, MODAL_CLOSE_DELAY};

pub const AUTOPLAY_PERIOD: Duration = Duration::from_millis(5000);
pub const CONTENT_UNAVAILABLE: &str = "Content is loading or could not be found for this engine.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineId {
    Orchestrator,
    Parser,
    Analyst,
    ChiefStrategist,
    ComplianceShield,
    SreAntifragile,
}

impl EngineId {
    pub const ALL: [EngineId; 6] = [
        EngineId::Orchestrator,
        EngineId::Parser,
        EngineId::Analyst,
        EngineId::ChiefStrategist,
        EngineId::ComplianceShield,
        EngineId::SreAntifragile,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            EngineId::Orchestrator => "orchestrator",
            EngineId::Parser => "parser",
            EngineId::Analyst => "analyst",
            EngineId::ChiefStrategist => "chiefStrategist",
            EngineId::ComplianceShield => "complianceShield",
            EngineId::SreAntifragile => "sreAntifragile",
        }
    }

    pub fn title_key(&self) -> String {
        format!("aiEngineModal.{}.title", self.id())
    }

    pub fn short_description_key(&self) -> String {
        format!("aiEngineCarousel.{}.shortDescription", self.id())
    }

    pub fn content_key(&self) -> String {
        format!("aiEngineModal.{}.content", self.id())
    }
}

impl std::str::FromStr for EngineId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        EngineId::ALL
            .iter()
            .copied()
            .find(|engine| engine.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = EngineId::ALL.iter().map(EngineId::id).collect();
                anyhow!("unknown engine '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

impl std::fmt::Display for EngineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Rotating engine cards. Starts on the middle card and advances on its own
/// until the pointer rests on it.
#[derive(Debug)]
pub struct EngineCarousel {
    index: usize,
    autoplay: Interval,
    paused: bool,
}

impl EngineCarousel {
    pub fn new(period: Duration) -> Self {
        Self {
            index: EngineId::ALL.len() / 2,
            autoplay: Interval::new(period),
            paused: false,
        }
    }

    pub fn current(&self) -> EngineId {
        EngineId::ALL[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.autoplay.is_running()
    }

    pub fn start(&mut self, now: Instant, tracker: &ResourceTracker) {
        self.paused = false;
        self.autoplay.start(now, tracker);
    }

    pub fn stop(&mut self) {
        self.autoplay.stop();
    }

    fn step(&mut self, forward: bool) {
        let len = EngineId::ALL.len();
        self.index = if forward {
            (self.index + 1) % len
        } else {
            (self.index + len - 1) % len
        };
    }

    /// Manual navigation restarts the autoplay period.
    pub fn next(&mut self, now: Instant, tracker: &ResourceTracker) -> EngineId {
        self.step(true);
        self.start(now, tracker);
        self.current()
    }

    pub fn prev(&mut self, now: Instant, tracker: &ResourceTracker) -> EngineId {
        self.step(false);
        self.start(now, tracker);
        self.current()
    }

    /// Pointer entered the carousel.
    pub fn pause(&mut self) {
        self.paused = true;
        self.autoplay.stop();
    }

    /// Pointer left the carousel.
    pub fn resume(&mut self, now: Instant, tracker: &ResourceTracker) {
        self.start(now, tracker);
    }

    /// Only the centred card is clickable.
    pub fn select(&self, index: usize) -> Option<EngineId> {
        (index == self.index).then(|| self.current())
    }

    /// Advance for every elapsed period. Returns whether the card changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let fired = self.autoplay.poll(now);
        for _ in 0..fired {
            self.step(true);
        }
        if fired > 0 {
            debug!(engine = %self.current(), "carousel advanced");
        }
        fired > 0
    }
}

pub type EngineModal = Modal<EngineId>;

/// Title and body of an engine's dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineDetail {
    pub engine: EngineId,
    pub title: String,
    pub summary: String,
    pub blocks: Option<Vec<ContentBlock>>,
}

impl EngineDetail {
    pub fn compose(engine: EngineId, translator: &Translator) -> Self {
        Self {
            engine,
            title: translator.t(&engine.title_key()),
            summary: translator.t(&engine.short_description_key()),
            blocks: translator.blocks(&engine.content_key()).map(<[_]>::to_vec),
        }
    }

    pub fn plain_lines(&self) -> Vec<String> {
        match &self.blocks {
            Some(blocks) => render_plain(blocks),
            None => vec![CONTENT_UNAVAILABLE.to_string()],
        }
    }
}
