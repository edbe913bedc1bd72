// SPDX-License-Identifier: PMPL-1.0-or-later

//! Veritas protocol demo: scripted playback and field rules.

use std::path::Path;
use std::time::{Duration, Instant};
use umbrella_site::config::SiteConfig;
use umbrella_site::context::SiteContext;
use umbrella_site::demo::frame::TRUST_SCORE;
use umbrella_site::demo::{player, DemoField, DemoStep, FieldState, Tone};
use umbrella_site::i18n::{BundleSet, MemoryPreferenceStore};
use umbrella_site::lifecycle::ResourceTracker;
use umbrella_site::site::layout::DEMO_ANCHOR;
use umbrella_site::types::Language;
use umbrella_site::view::SiteView;

const TICK: Duration = Duration::from_millis(16);

fn mount(language: Language, viewport_height: f64) -> (SiteView, ResourceTracker) {
    let tracker = ResourceTracker::new();
    let mut context = SiteContext::new(
        Box::new(MemoryPreferenceStore::new()),
        None,
        language,
        tracker.clone(),
    );
    context.install_bundles(BundleSet::load(
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("public"),
    ));
    let mut config = SiteConfig {
        reduced_motion: true,
        ..SiteConfig::default()
    };
    config.viewport.height = viewport_height;
    let view = SiteView::mount(context, &config, Instant::now()).unwrap();
    (view, tracker)
}

#[test]
fn playback_visits_every_stage_in_order() {
    let (mut view, _) = mount(Language::En, 800.0);
    let playback = player::play(&mut view, 40.0, TICK, Instant::now()).unwrap();
    assert_eq!(playback.visited(), DemoStep::ALL.to_vec());
    for event in &playback.events[1..] {
        let transition = event.transition.unwrap();
        assert_eq!(transition.skipped(), 0);
        assert!(event.frame.loading, "loader shows on {:?}", transition.to);
    }
}

#[test]
fn playback_holds_on_a_tall_viewport() {
    let (mut view, _) = mount(Language::En, 1080.0);
    let playback = player::play(&mut view, 24.0, TICK, Instant::now()).unwrap();
    assert_eq!(playback.visited(), DemoStep::ALL.to_vec());
}

#[test]
fn scrolling_back_up_rewinds_the_stage() {
    let (mut view, _) = mount(Language::En, 800.0);
    player::play(&mut view, 40.0, TICK, Instant::now()).unwrap();
    assert_eq!(view.active_step(), Some(DemoStep::Final));

    view.scroll_to_anchor(DEMO_ANCHOR, Instant::now()).unwrap();
    assert_eq!(view.active_step(), Some(DemoStep::Ingestion));
}

#[test]
fn final_frame_is_localized_and_complete() {
    let (mut view, tracker) = mount(Language::Pt, 800.0);
    let playback = player::play(&mut view, 40.0, TICK, Instant::now()).unwrap();
    let last = &playback.events.last().unwrap().frame;

    assert_eq!(last.step, DemoStep::Final);
    assert_eq!(last.document_title, "extrato-exemplo-01.pdf");
    assert_eq!(last.logs.last().map(String::as_str), Some("Concluído"));
    assert!(last.timeline.iter().filter(|item| item.active).count() == 1);

    let json: serde_json::Value = serde_json::from_str(&last.json_text()).unwrap();
    assert_eq!(json["trustScore"], TRUST_SCORE);
    assert!(last
        .document_spans()
        .any(|span| span.tone == Tone::Struck || span.tone == Tone::Invalid));

    view.teardown();
    assert_eq!(tracker.total_live(), 0);
}

#[test]
fn first_frame_hides_analysis_output() {
    let (mut view, _) = mount(Language::En, 800.0);
    let playback = player::play(&mut view, 40.0, TICK, Instant::now()).unwrap();
    let first = &playback.events[0].frame;
    assert_eq!(first.step, DemoStep::Ingestion);
    assert!(!first.json_text().contains(TRUST_SCORE));
    assert!(!first.loading);
}

#[test]
fn field_states_never_regress() {
    for field in DemoField::ALL {
        let mut shown = false;
        let mut invalid = false;
        for step in DemoStep::ALL {
            let state = field.state_at(step);
            if shown {
                assert!(state.is_shown(), "{:?} hid again at {:?}", field, step);
            }
            if invalid {
                assert_eq!(state, FieldState::Invalid, "{:?} at {:?}", field, step);
            }
            shown |= state.is_shown();
            invalid |= state == FieldState::Invalid;
        }
        assert!(shown, "{:?} is never revealed", field);
    }
}
