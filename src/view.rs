// SPDX-License-Identifier: PMPL-1.0-or-later

//! The mounted site: owns the page layout, the viewport and every
//! subscription hung off them.
//!
//! All time flows in through `now` arguments, so the view runs the same
//! under a scripted clock and a real one.

use crate::ambient::{mount_background, ParticleField};
use crate::config::SiteConfig;
use crate::context::SiteContext;
use crate::demo::{DemoFrame, DemoStep, StepSequencer, StepTransition};
use crate::lifecycle::{ResourceKind, Scope};
use crate::observer::Viewport;
use crate::reveal::{RevealChange, RevealOptions, RevealScheduler, DEFAULT_SELECTOR};
use crate::site::case_studies::{CaseStudyId, CaseStudyModal};
use crate::site::engines::{EngineCarousel, EngineId, EngineModal};
use crate::site::header::Header;
use crate::site::layout::{PageLayout, SECTION_CLASS};
use crate::site::Route;
use crate::types::{Language, MotionPreference, Theme};
use anyhow::{anyhow, Context, Result};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Root margin of the whole-section fade.
pub const SECTION_MARGIN: &str = "0px 0px -10% 0px";

/// What a scroll changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollUpdate {
    pub sections: Vec<RevealChange>,
    pub revealed: Vec<RevealChange>,
    pub transition: Option<StepTransition>,
    pub header_changed: bool,
}

/// What a tick changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickUpdate {
    pub loader_hidden: bool,
    pub carousel_advanced: bool,
}

pub struct SiteView {
    context: SiteContext,
    layout: PageLayout,
    viewport: Viewport,
    sections: Option<RevealScheduler>,
    reveals: Option<RevealScheduler>,
    sequencer: Option<StepSequencer>,
    carousel: EngineCarousel,
    modal: EngineModal,
    case_study: CaseStudyModal,
    header: Header,
    particles: Option<ParticleField>,
    listeners: Scope,
    loader: Duration,
    motion: MotionPreference,
    particle_count: usize,
    last_frame: Option<Instant>,
    mounted: bool,
}

impl SiteView {
    /// Lay out the home page and attach everything it needs.
    pub fn mount(context: SiteContext, config: &SiteConfig, now: Instant) -> Result<Self> {
        config.validate()?;
        let layout = PageLayout::build(Route::Home, config.viewport.width);
        let mut view = Self {
            context,
            layout,
            viewport: Viewport::new(config.viewport.width, config.viewport.height),
            sections: None,
            reveals: None,
            sequencer: None,
            carousel: EngineCarousel::new(config.carousel_interval()),
            modal: EngineModal::new(config.modal_close()),
            case_study: CaseStudyModal::new(config.modal_close()),
            header: Header::default(),
            particles: None,
            listeners: Scope::new(),
            loader: config.loader(),
            motion: config.motion(),
            particle_count: config.particle_count,
            last_frame: None,
            mounted: true,
        };

        let tracker = view.context.tracker().clone();
        // scroll, keydown (Escape), pointer move
        for _ in 0..3 {
            view.listeners.hold(tracker.acquire(ResourceKind::Listener));
        }
        view.header = Header::attach(view.viewport.scroll_y, &tracker);
        view.particles = mount_background(view.particle_count, view.motion, &tracker);
        view.attach_page(now).context("mounting home page")?;
        info!(
            language = %view.context.language(),
            resources = tracker.total_live(),
            "site mounted"
        );
        Ok(view)
    }

    fn attach_page(&mut self, now: Instant) -> Result<()> {
        let tracker = self.context.tracker().clone();
        let section_selector = format!(".{}", SECTION_CLASS);
        let section_options = RevealOptions::default()
            .with_margin(SECTION_MARGIN)?
            .toggling();
        self.sections = Some(RevealScheduler::attach(
            &self.layout.document,
            &section_selector,
            section_options,
            &tracker,
        )?);
        self.reveals = Some(RevealScheduler::attach(
            &self.layout.document,
            DEFAULT_SELECTOR,
            RevealOptions::default(),
            &tracker,
        )?);

        if self.layout.route == Route::Home {
            self.sequencer = Some(StepSequencer::attach(&self.layout.document, &tracker)?);
            self.carousel.start(now, &tracker);
        }

        // First observation pass. A stage picked here is the initial state,
        // so the loading indicator stays down.
        self.apply_scroll();
        Ok(())
    }

    fn detach_page(&mut self) {
        self.sections = None;
        self.reveals = None;
        self.sequencer = None;
        self.carousel.stop();
        self.modal.cancel_timers();
        self.case_study.cancel_timers();
    }

    fn apply_scroll(&mut self) -> ScrollUpdate {
        let mut update = ScrollUpdate::default();
        if let Some(sections) = self.sections.as_mut() {
            update.sections = sections.update(&mut self.layout.document, &self.viewport);
        }
        if let Some(reveals) = self.reveals.as_mut() {
            update.revealed = reveals.update(&mut self.layout.document, &self.viewport);
        }
        if let Some(sequencer) = self.sequencer.as_mut() {
            update.transition = sequencer.update(&self.layout.document, &self.viewport);
        }
        update
    }

    pub fn scroll_to(&mut self, y: f64, now: Instant) -> ScrollUpdate {
        if !self.mounted {
            return ScrollUpdate::default();
        }
        self.viewport.scroll_to(y, self.layout.height());
        let mut update = self.apply_scroll();
        update.header_changed = self.header.on_scroll(self.viewport.scroll_y);
        if update.transition.is_some() {
            self.context.pulse_loading(now, self.loader);
        }
        update
    }

    /// Wheel or key scroll. The page stays put while the mobile menu is open.
    pub fn scroll_by(&mut self, delta: f64, now: Instant) -> ScrollUpdate {
        if self.header.locks_scroll() {
            return ScrollUpdate::default();
        }
        self.scroll_to(self.viewport.scroll_y + delta, now)
    }

    /// Jump so that the section with `anchor` starts at the top.
    pub fn scroll_to_anchor(&mut self, anchor: &str, now: Instant) -> Result<ScrollUpdate> {
        let top = self
            .layout
            .section_top(anchor)
            .ok_or_else(|| anyhow!("no section '#{}' on {}", anchor, self.layout.route))?;
        Ok(self.scroll_to(top, now))
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.layout.height() - self.viewport.height).max(0.0)
    }

    /// Advance timers and the background by one frame.
    pub fn tick(&mut self, now: Instant) -> TickUpdate {
        if !self.mounted {
            return TickUpdate::default();
        }
        let update = TickUpdate {
            loader_hidden: self.context.loading_mut().tick(now),
            carousel_advanced: self.carousel.tick(now),
        };
        self.modal.tick(now);
        self.case_study.tick(now);
        if let Some(particles) = self.particles.as_mut() {
            let dt = self
                .last_frame
                .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f64());
            particles.frame(dt);
        }
        self.last_frame = Some(now);
        update
    }

    /// Swap the page. The viewport returns to the top.
    pub fn navigate(&mut self, route: Route, now: Instant) -> Result<()> {
        if !self.mounted {
            return Err(anyhow!("view has been torn down"));
        }
        self.detach_page();
        self.header.close_menu();
        self.layout = PageLayout::build(route, self.viewport.width);
        self.viewport.scroll_to(0.0, self.layout.height());
        self.header.on_scroll(self.viewport.scroll_y);
        self.attach_page(now)
            .with_context(|| format!("mounting {}", route))?;
        debug!(route = %route, "navigated");
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.context.set_language(language)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.context.toggle_theme()
    }

    pub fn active_step(&self) -> Option<DemoStep> {
        self.sequencer.as_ref().map(StepSequencer::active)
    }

    /// Current state of the protocol demo. Off the home page the demo is
    /// not mounted and this is `None`.
    pub fn demo_frame(&self) -> Option<DemoFrame> {
        let step = self.active_step()?;
        Some(DemoFrame::compose(
            step,
            self.context.translator(),
            self.context.loading().is_visible(),
        ))
    }

    pub fn carousel(&self) -> &EngineCarousel {
        &self.carousel
    }

    pub fn carousel_next(&mut self, now: Instant) -> EngineId {
        let tracker = self.context.tracker().clone();
        self.carousel.next(now, &tracker)
    }

    pub fn carousel_prev(&mut self, now: Instant) -> EngineId {
        let tracker = self.context.tracker().clone();
        self.carousel.prev(now, &tracker)
    }

    pub fn pointer_enter_carousel(&mut self) {
        self.carousel.pause();
    }

    pub fn pointer_leave_carousel(&mut self, now: Instant) {
        let tracker = self.context.tracker().clone();
        self.carousel.resume(now, &tracker);
    }

    /// Click on carousel card `index`. Only the centred card opens.
    pub fn click_engine(&mut self, index: usize) -> Option<EngineId> {
        let engine = self.carousel.select(index)?;
        self.modal.open(engine);
        Some(engine)
    }

    pub fn modal(&self) -> &EngineModal {
        &self.modal
    }

    pub fn close_modal(&mut self, now: Instant) {
        let tracker = self.context.tracker().clone();
        self.modal.close(now, &tracker);
    }

    pub fn open_case_study(&mut self, study: CaseStudyId) {
        self.case_study.open(study);
    }

    pub fn case_study(&self) -> &CaseStudyModal {
        &self.case_study
    }

    pub fn close_case_study(&mut self, now: Instant) {
        let tracker = self.context.tracker().clone();
        self.case_study.close(now, &tracker);
    }

    /// Escape closes whichever dialog is open.
    pub fn press_escape(&mut self, now: Instant) -> bool {
        let tracker = self.context.tracker().clone();
        let engine = self.modal.escape(now, &tracker);
        let study = self.case_study.escape(now, &tracker);
        engine || study
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.header.toggle_menu()
    }

    /// Follow a header link to a home-page section, closing the menu.
    pub fn follow_header_link(&mut self, anchor: &str, now: Instant) -> Result<ScrollUpdate> {
        let href = self.header.follow(anchor);
        debug!(%href, "header link");
        if self.layout.route != Route::Home {
            self.navigate(Route::Home, now)?;
        }
        self.scroll_to_anchor(anchor, now)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(particles) = self.particles.as_mut() {
            particles.set_pointer(x, y);
        }
    }

    pub fn context(&self) -> &SiteContext {
        &self.context
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn route(&self) -> Route {
        self.layout.route
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        self.particles.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Release every observer, timer, listener and frame loop. Idempotent.
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.detach_page();
        self.header.detach();
        self.particles = None;
        self.context.loading_mut().hide();
        self.listeners.dispose();
        self.mounted = false;
        info!(
            remaining = self.context.tracker().total_live(),
            "site torn down"
        );
    }
}

impl Drop for SiteView {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MemoryPreferenceStore;
    use crate::lifecycle::ResourceTracker;
    use crate::site::layout::{DEMO_ANCHOR, MARKER_OFFSET, MARKER_SPACING};

    fn mount(reduced_motion: bool) -> (SiteView, ResourceTracker, Instant) {
        let tracker = ResourceTracker::new();
        let context = SiteContext::new(
            Box::new(MemoryPreferenceStore::new()),
            None,
            Language::En,
            tracker.clone(),
        );
        let config = SiteConfig {
            reduced_motion,
            particle_count: 32,
            ..SiteConfig::default()
        };
        let now = Instant::now();
        let view = SiteView::mount(context, &config, now).unwrap();
        (view, tracker, now)
    }

    fn centre_marker(view: &SiteView, step: DemoStep) -> f64 {
        let demo_top = view.layout().section_top(DEMO_ANCHOR).unwrap();
        demo_top + MARKER_OFFSET + step.ordinal() as f64 * MARKER_SPACING - 350.0
    }

    #[test]
    fn mount_acquires_everything_and_teardown_releases_it() {
        let (mut view, tracker, _) = mount(false);
        assert_eq!(tracker.live(ResourceKind::Observer), 3);
        assert_eq!(tracker.live(ResourceKind::Timer), 1);
        assert_eq!(tracker.live(ResourceKind::AnimationFrame), 1);
        assert_eq!(tracker.live(ResourceKind::Listener), 5);
        view.teardown();
        assert_eq!(tracker.total_live(), 0);
        view.teardown();
        assert!(!view.is_mounted());
    }

    #[test]
    fn reduced_motion_skips_background() {
        let (view, tracker, _) = mount(true);
        assert!(view.particles().is_none());
        assert_eq!(tracker.live(ResourceKind::AnimationFrame), 0);
        drop(view);
        assert_eq!(tracker.total_live(), 0);
    }

    #[test]
    fn hero_is_revealed_on_mount_without_loader() {
        let (view, _, _) = mount(true);
        assert_eq!(view.active_step(), Some(DemoStep::Ingestion));
        assert!(!view.context().loading().is_visible());
        let hero = view.layout().document.find_anchor("hero").unwrap();
        assert!(view.layout().document.has_class(hero, "visible"));
    }

    #[test]
    fn step_transition_pulses_loader() {
        let (mut view, tracker, now) = mount(true);
        let y = centre_marker(&view, DemoStep::Validation);
        let update = view.scroll_to(y, now);
        assert_eq!(update.transition.map(|t| t.to), Some(DemoStep::Validation));
        assert!(view.context().loading().is_visible());

        let later = now + Duration::from_millis(300);
        let y = centre_marker(&view, DemoStep::Analysis);
        view.scroll_to(y, later);
        assert!(!view.tick(now + Duration::from_millis(600)).loader_hidden);
        assert!(view.tick(later + Duration::from_millis(500)).loader_hidden);
        assert!(!view.context().loading().is_visible());
        assert_eq!(tracker.live(ResourceKind::Timer), 1);
    }

    #[test]
    fn navigate_resets_scroll_and_drops_demo() {
        let (mut view, _, now) = mount(true);
        view.scroll_to_anchor(DEMO_ANCHOR, now).unwrap();
        assert!(view.viewport().scroll_y > 0.0);
        view.navigate(Route::Privacy, now).unwrap();
        assert_eq!(view.viewport().scroll_y, 0.0);
        assert!(view.demo_frame().is_none());
        assert!(view.scroll_to_anchor(DEMO_ANCHOR, now).is_err());
        view.navigate(Route::Home, now).unwrap();
        assert_eq!(view.active_step(), Some(DemoStep::Ingestion));
    }

    #[test]
    fn header_follows_scroll_and_menu_locks_it() {
        let (mut view, _, now) = mount(true);
        assert!(!view.header().is_scrolled());
        assert!(view.scroll_by(120.0, now).header_changed);
        assert!(view.header().is_scrolled());

        assert!(view.toggle_menu());
        assert_eq!(view.scroll_by(500.0, now), ScrollUpdate::default());
        assert_eq!(view.viewport().scroll_y, 120.0);

        view.navigate(Route::Terms, now).unwrap();
        assert!(!view.header().is_menu_open());
        assert!(!view.header().is_scrolled());

        view.follow_header_link("casos-de-uso", now).unwrap();
        assert_eq!(view.route(), Route::Home);
        assert!(view.header().is_scrolled());
    }

    #[test]
    fn escape_closes_the_case_study() {
        let (mut view, tracker, now) = mount(true);
        view.open_case_study(CaseStudyId::MergersAndAcquisitions);
        assert!(view.case_study().is_open());
        assert!(view.press_escape(now));
        assert!(!view.case_study().is_open());
        view.tick(now + Duration::from_millis(300));
        assert_eq!(view.case_study().active(), None);
        view.open_case_study(CaseStudyId::PrivateBanking);
        view.close_case_study(now);
        view.teardown();
        assert_eq!(tracker.total_live(), 0);
    }

    #[test]
    fn modal_flow() {
        let (mut view, _, now) = mount(true);
        assert_eq!(view.click_engine(0), None);
        assert_eq!(view.click_engine(3), Some(EngineId::ChiefStrategist));
        assert!(view.press_escape(now));
        view.tick(now + Duration::from_millis(300));
        assert_eq!(view.modal().active(), None);
    }
}
