use super::*;
use crate::{
    foundation::core::{Rect, ViewportSnapshot},
    page::{PageEvent, SimulatedPage},
    scroll::{
        offsets::EndRule,
        orchestrator::{OrchestratorConfig, ScrollOrchestrator},
        registry::TriggerRegistry,
        tracker::ScrollTracker,
        trigger::{ActivationState, TriggerConfig},
    },
};

#[test]
fn offset_matches_travel_fraction() {
    assert_eq!(horizontal_offset(0.0, 2000.0), 0.0);
    assert_eq!(horizontal_offset(0.5, 2000.0), -1000.0);
    assert_eq!(horizontal_offset(1.0, 2000.0), -2000.0);
    assert_eq!(horizontal_offset(0.5, -300.0), 0.0);
    assert_eq!(horizontal_offset(0.5, 0.0), 0.0);
}

struct Rig {
    page: SimulatedPage,
    reg: TriggerRegistry,
    pins: PinController,
    id: TriggerId,
    vp: ViewportSnapshot,
}

impl Rig {
    fn new(content_width: f64) -> Self {
        let page = SimulatedPage::new()
            .with_element("gallery", Rect::new(0.0, 1000.0, 1000.0, 1800.0))
            .with_content("track", Rect::new(0.0, 1000.0, content_width, 1800.0), content_width);
        let mut reg = TriggerRegistry::new();
        let id = reg
            .register(
                TriggerConfig::scrub("gallery", "top top".parse().unwrap(), EndRule::PinTravel)
                    .pinned("track"),
            )
            .unwrap();
        let mut pins = PinController::new();
        pins.track(id, "gallery".into(), "track".into());
        let vp = ViewportSnapshot::new(0.0, 1000.0, 800.0).unwrap();
        let resolved = ScrollTracker::resolve_all(&mut reg, &page, &vp);
        for (rid, res) in resolved {
            pins.measure(rid, &res, reg.get(rid).unwrap().range());
        }
        Self {
            page,
            reg,
            pins,
            id,
            vp,
        }
    }

    fn resize(&mut self, width: f64) {
        self.vp = ViewportSnapshot::new(self.vp.scroll_y, width, self.vp.viewport_height).unwrap();
        let resolved = ScrollTracker::resolve_all(&mut self.reg, &self.page, &self.vp);
        for (rid, res) in resolved {
            self.pins.measure(rid, &res, self.reg.get(rid).unwrap().range());
        }
    }

    fn scroll(&mut self, y: f64) {
        ScrollTracker::sample(&mut self.reg, &self.page, &self.vp.with_scroll(y), 0.0);
        let trigger = self.reg.get(self.id).unwrap();
        self.pins
            .update(trigger, &self.page.layout, &mut self.page.styles);
    }
}

#[test]
fn measure_sets_travel_and_spacer() {
    let rig = Rig::new(3000.0);
    let entry = rig.pins.get(rig.id).unwrap();
    assert_eq!(entry.travel, 2000.0);
    // Range is [1000, 3800]: element height 800 plus 2800 of scroll.
    assert_eq!(entry.spacer_height, 800.0 + 2800.0);
}

#[test]
fn pin_engages_inside_range_and_releases_at_edges() {
    let mut rig = Rig::new(3000.0);
    rig.scroll(500.0);
    assert!(!rig.page.is_pinned("gallery"));

    rig.scroll(1100.0);
    assert!(rig.page.is_pinned("gallery"));
    assert_eq!(
        rig.page.pin_layout("gallery").unwrap().spacer_height,
        3600.0
    );

    // Midpoint of [1000, 3800].
    rig.scroll(2400.0);
    assert_eq!(rig.page.style("track", Property::X), Some(-1000.0));

    rig.scroll(5000.0);
    assert!(!rig.page.is_pinned("gallery"));
    assert_eq!(rig.page.style("track", Property::X), Some(-2000.0));
    assert!(rig.page.log().iter().any(|e| matches!(
        e,
        PageEvent::Unpin {
            edge: PinEdge::End,
            ..
        }
    )));

    rig.scroll(2400.0);
    assert!(rig.page.is_pinned("gallery"));
    assert_eq!(rig.page.style("track", Property::X), Some(-1000.0));

    rig.scroll(0.0);
    assert!(!rig.page.is_pinned("gallery"));
    assert_eq!(rig.page.style("track", Property::X), Some(0.0));
}

#[test]
fn narrow_content_still_pins_without_motion() {
    let mut rig = Rig::new(600.0);
    assert_eq!(rig.pins.get(rig.id).unwrap().travel, -400.0);

    rig.scroll(1400.0);
    assert!(rig.page.is_pinned("gallery"));
    assert_eq!(rig.page.style("track", Property::X), Some(0.0));
}

#[test]
fn release_forgets_without_writing() {
    let mut rig = Rig::new(3000.0);
    rig.scroll(1500.0);
    let before = rig.page.log().len();
    let entry = rig.pins.release(rig.id).unwrap();
    assert!(entry.engaged);
    assert!(rig.pins.release(rig.id).is_none());
    rig.scroll(0.0);
    assert_eq!(rig.page.log().len(), before);
}

#[test]
fn resize_while_pinned_hands_host_the_new_spacer() {
    let mut rig = Rig::new(3000.0);
    rig.scroll(1500.0);
    assert_eq!(rig.page.pin_layout("gallery").unwrap().spacer_height, 3600.0);

    // Wider viewport: travel 1000, range [1000, 2800].
    rig.resize(2000.0);
    assert_eq!(rig.pins.get(rig.id).unwrap().spacer_height, 2600.0);
    rig.scroll(1500.0);
    assert!(rig.page.is_pinned("gallery"));
    assert_eq!(rig.page.pin_layout("gallery").unwrap().spacer_height, 2600.0);

    // Same layout again is not re-sent.
    let before = rig.page.log().len();
    rig.scroll(1500.0);
    assert_eq!(rig.page.log().len(), before);
}

#[test]
fn region_collapsing_mid_pin_releases_it() {
    let mut page = SimulatedPage::new()
        .with_element("region", Rect::new(0.0, 1000.0, 1000.0, 1800.0))
        .with_content("strip", Rect::new(0.0, 1000.0, 3000.0, 1800.0), 3000.0);
    let mut orch = ScrollOrchestrator::init(OrchestratorConfig::default());
    orch.on_resize(1000.0, 800.0);
    let handle = orch
        .register(
            TriggerConfig::scrub(
                "region",
                "top top".parse().unwrap(),
                "bottom top".parse().unwrap(),
            )
            .pinned("strip"),
            &page,
        )
        .unwrap();

    orch.on_scroll(1400.0);
    page.frame(&mut orch, 0.0);
    assert!(page.is_pinned("region"));

    page.layout
        .set_rect("region", Rect::new(0.0, 1000.0, 1000.0, 1000.0));
    orch.on_geometry_change();
    let report = page.frame(&mut orch, 0.1);
    assert!(report.refreshed);
    assert!(!page.is_pinned("region"));
    assert!(page.log().iter().any(|e| matches!(
        e,
        PageEvent::Unpin {
            edge: PinEdge::Start,
            ..
        }
    )));
    assert_eq!(
        report.transitions.last().map(|t| t.to),
        Some(ActivationState::Inactive)
    );
    let trigger = orch.trigger(handle.id()).unwrap();
    assert!(trigger.is_degenerate());
    assert_eq!(trigger.state(), ActivationState::Inactive);

    orch.on_scroll(0.0);
    page.frame(&mut orch, 0.2);
    assert!(!page.is_pinned("region"));
    assert!(!orch.pins().get(handle.id()).unwrap().engaged);
}
