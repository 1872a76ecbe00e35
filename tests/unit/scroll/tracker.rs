use super::*;
use crate::{
    page::SimulatedPage,
    scroll::trigger::{ActivationState, TriggerConfig},
};

fn vp(scroll_y: f64) -> ViewportSnapshot {
    ViewportSnapshot::new(scroll_y, 1000.0, 800.0).unwrap()
}

fn page() -> SimulatedPage {
    SimulatedPage::new()
        .with_element("block", Rect::new(0.0, 1600.0, 1000.0, 2000.0))
        .with_element("gallery", Rect::new(0.0, 3000.0, 1000.0, 3800.0))
        .with_content("track", Rect::new(0.0, 3000.0, 3000.0, 3800.0), 3000.0)
}

fn registry() -> (TriggerRegistry, TriggerId) {
    let mut reg = TriggerRegistry::new();
    let id = reg
        .register(TriggerConfig::scrub(
            "block",
            "top bottom".parse().unwrap(),
            "bottom top".parse().unwrap(),
        ))
        .unwrap();
    (reg, id)
}

#[test]
fn sample_resolves_lazily_and_reports_progress() {
    let page = page();
    let (mut reg, id) = registry();

    let report = ScrollTracker::sample(&mut reg, &page, &vp(800.0), 0.0);
    assert_eq!(report.updates.len(), 1);
    assert!(report.updates[0].resolved.is_some());

    // Range is [800, 2000].
    let t = reg.get(id).unwrap();
    assert_eq!(t.range().unwrap().start, 800.0);
    assert_eq!(t.progress(), 0.0);

    let report = ScrollTracker::sample(&mut reg, &page, &vp(1400.0), 0.0);
    assert!(report.updates[0].progress_changed);
    assert!(report.updates[0].resolved.is_none());
    assert_eq!(reg.get(id).unwrap().progress(), 0.5);
}

#[test]
fn progress_is_clamped_and_monotonic_in_scroll() {
    let page = page();
    let (mut reg, id) = registry();
    let mut last = -1.0;
    for step in 0..60 {
        let y = f64::from(step) * 50.0;
        ScrollTracker::sample(&mut reg, &page, &vp(y), 0.0);
        let p = reg.get(id).unwrap().progress();
        assert!((0.0..=1.0).contains(&p));
        assert!(p >= last);
        last = p;
    }
    assert_eq!(last, 1.0);
}

#[test]
fn stale_elements_are_skipped_without_state_change() {
    let mut page = page();
    let (mut reg, id) = registry();
    ScrollTracker::sample(&mut reg, &page, &vp(1400.0), 0.0);
    ScrollTracker::sample(&mut reg, &page, &vp(1400.0), 0.0);
    assert_eq!(reg.get(id).unwrap().state(), ActivationState::Active);

    page.detach("block");
    let report = ScrollTracker::sample(&mut reg, &page, &vp(0.0), 0.0);
    assert_eq!(report.skipped, 1);
    assert!(report.updates.is_empty());
    let t = reg.get(id).unwrap();
    assert_eq!(t.progress(), 0.5);
    assert_eq!(t.state(), ActivationState::Active);
}

#[test]
fn zero_height_region_is_degenerate() {
    let page = SimulatedPage::new().with_element("line", Rect::new(0.0, 500.0, 1000.0, 500.0));
    let mut reg = TriggerRegistry::new();
    let id = reg
        .register(TriggerConfig::scrub(
            "line",
            "top top".parse().unwrap(),
            "bottom top".parse().unwrap(),
        ))
        .unwrap();
    for y in [0.0, 500.0, 900.0] {
        ScrollTracker::sample(&mut reg, &page, &vp(y), 0.0);
    }
    let t = reg.get(id).unwrap();
    assert!(t.is_degenerate());
    assert_eq!(t.state(), ActivationState::Inactive);
}

#[test]
fn pinned_resolution_reports_travel() {
    let page = page();
    let mut reg = TriggerRegistry::new();
    let id = reg
        .register(
            TriggerConfig::scrub(
                "gallery",
                "top top".parse().unwrap(),
                crate::scroll::offsets::EndRule::PinTravel,
            )
            .pinned("track"),
        )
        .unwrap();
    let resolved = ScrollTracker::resolve_all(&mut reg, &page, &vp(0.0));
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].1.travel, Some(2000.0));
    let range = reg.get(id).unwrap().range().unwrap();
    assert_eq!(range.start, 3000.0);
    assert_eq!(range.end, 3800.0 + 2000.0);
}

#[test]
fn coalescer_yields_latest_scroll_once_per_frame() {
    let mut c = FrameCoalescer::new();
    assert!(c.take().is_none());

    c.record_resize(1280.0, 720.0, true);
    c.record_scroll(10.0);
    c.record_scroll(25.0);
    c.record_scroll(40.0);
    let f = c.take().unwrap();
    assert_eq!(f.viewport.scroll_y, 40.0);
    assert_eq!(f.viewport.viewport_width, 1280.0);
    assert!(f.refresh);
    assert_eq!(f.events, 4);

    let idle = c.take().unwrap();
    assert_eq!(idle.events, 0);
    assert!(!idle.refresh);
    assert_eq!(idle.viewport.scroll_y, 40.0);
}

#[test]
fn geometry_change_forces_refresh() {
    let mut c = FrameCoalescer::new();
    c.record_resize(800.0, 600.0, false);
    assert!(!c.take().unwrap().refresh);
    c.record_geometry_change();
    assert!(c.take().unwrap().refresh);
}

#[test]
fn scroll_before_first_resize_waits_for_a_size() {
    let mut c = FrameCoalescer::new();
    c.record_scroll(0.0);
    assert!(c.viewport().is_none());
    assert!(c.take().is_none());

    c.record_scroll(600.0);
    c.record_resize(1000.0, 800.0, true);
    let f = c.take().unwrap();
    assert_eq!(f.viewport.scroll_y, 600.0);
    assert_eq!(f.viewport.viewport_height, 800.0);
    assert!(f.refresh);
    assert_eq!(f.events, 3);
}

#[test]
fn collapsed_region_reports_its_walk_back() {
    let mut page = page();
    let mut reg = TriggerRegistry::new();
    let id = reg
        .register(TriggerConfig::scrub(
            "block",
            "top top".parse().unwrap(),
            "bottom top".parse().unwrap(),
        ))
        .unwrap();
    // Range is [1600, 2000].
    ScrollTracker::sample(&mut reg, &page, &vp(1800.0), 0.0);
    ScrollTracker::sample(&mut reg, &page, &vp(1800.0), 0.0);
    assert_eq!(reg.get(id).unwrap().state(), ActivationState::Active);

    page.layout.set_rect("block", Rect::new(0.0, 1600.0, 1000.0, 1600.0));
    let resolved = ScrollTracker::resolve_all(&mut reg, &page, &vp(1800.0));
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].1.transitions.len(), 2);
    let t = reg.get(id).unwrap();
    assert!(t.is_degenerate());
    assert_eq!(t.state(), ActivationState::Inactive);
    assert!(ScrollTracker::sample(&mut reg, &page, &vp(1800.0), 0.0).updates.is_empty());
}
