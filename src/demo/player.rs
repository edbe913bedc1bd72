// SPDX-License-Identifier: PMPL-1.0-or-later

//! Scripted playback: scroll the demo section from top to bottom on a
//! virtual clock and record every stage change.

use super::{DemoFrame, DemoStep, StepTransition};
use crate::site::layout::DEMO_ANCHOR;
use crate::view::SiteView;
use anyhow::{anyhow, Result};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackEvent {
    pub scroll_y: f64,
    pub elapsed: Duration,
    /// `None` for the opening frame.
    pub transition: Option<StepTransition>,
    pub frame: DemoFrame,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Playback {
    pub events: Vec<PlaybackEvent>,
}

impl Playback {
    /// Stages in the order they became active, starting with the first.
    pub fn visited(&self) -> Vec<DemoStep> {
        self.events.iter().map(|event| event.frame.step).collect()
    }
}

/// Scroll through the demo section in `step_px` increments, one `tick` of
/// virtual time apart.
pub fn play(view: &mut SiteView, step_px: f64, tick: Duration, start: Instant) -> Result<Playback> {
    if step_px <= 0.0 {
        return Err(anyhow!("scroll step must be positive, got {}", step_px));
    }
    let top = view
        .layout()
        .section_top(DEMO_ANCHOR)
        .ok_or_else(|| anyhow!("the demo is only mounted on the home page"))?;
    let bottom = view
        .layout()
        .document
        .find_anchor(DEMO_ANCHOR)
        .and_then(|id| view.layout().document.rect(id))
        .map_or(top, |rect| rect.bottom());
    let from = (top - view.viewport().height).max(0.0);
    let to = bottom.min(view.max_scroll());

    let mut now = start;
    view.scroll_to(from, now);
    view.tick(now);
    let mut playback = Playback::default();
    let opening = view
        .demo_frame()
        .ok_or_else(|| anyhow!("demo not mounted"))?;
    playback.events.push(PlaybackEvent {
        scroll_y: view.viewport().scroll_y,
        elapsed: Duration::ZERO,
        transition: None,
        frame: opening,
    });

    let mut y = from;
    while y < to {
        y = (y + step_px).min(to);
        now += tick;
        let update = view.scroll_to(y, now);
        view.tick(now);
        if let Some(transition) = update.transition {
            if let Some(frame) = view.demo_frame() {
                playback.events.push(PlaybackEvent {
                    scroll_y: view.viewport().scroll_y,
                    elapsed: now - start,
                    transition: Some(transition),
                    frame,
                });
            }
        }
    }
    debug!(events = playback.events.len(), "playback finished");
    Ok(playback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::context::SiteContext;
    use crate::i18n::MemoryPreferenceStore;
    use crate::lifecycle::ResourceTracker;
    use crate::types::Language;

    fn view() -> SiteView {
        let context = SiteContext::new(
            Box::new(MemoryPreferenceStore::new()),
            None,
            Language::En,
            ResourceTracker::new(),
        );
        let config = SiteConfig {
            reduced_motion: true,
            ..SiteConfig::default()
        };
        SiteView::mount(context, &config, Instant::now()).unwrap()
    }

    #[test]
    fn top_to_bottom_visits_every_step_in_order() {
        let mut view = view();
        let playback = play(&mut view, 40.0, Duration::from_millis(16), Instant::now()).unwrap();
        assert_eq!(playback.visited(), DemoStep::ALL.to_vec());
        assert!(playback.events[1..]
            .iter()
            .all(|event| event.transition.map(|t| t.skipped()) == Some(0)));
        assert!(playback.events[1].frame.loading);
    }

    #[test]
    fn rejects_zero_step() {
        let mut view = view();
        assert!(play(&mut view, 0.0, Duration::from_millis(16), Instant::now()).is_err());
    }
}
