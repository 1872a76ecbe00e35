use std::sync::mpsc;

use crate::{
    foundation::{
        core::{BindingId, ElementId, TriggerId, ViewportSnapshot},
        error::{ScrollError, ScrollResult},
    },
    presets::SectionPreset,
    scroll::{
        binder::AnimationBinder,
        host::{LayoutHost, PinEdge, StyleSink},
        pin::PinController,
        property::PropertySpec,
        registry::TriggerRegistry,
        tracker::{FrameCoalescer, ScrollTracker},
        trigger::{ActivationState, Transitions, Trigger, TriggerConfig},
    },
};

/// Host-tunable orchestrator settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Re-resolve every trigger's offsets when the viewport resizes.
    pub refresh_on_resize: bool,
    /// Registrations beyond this count are rejected.
    pub max_triggers: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            refresh_on_resize: true,
            max_triggers: 1024,
        }
    }
}

/// Scoped registration. Dropping the handle unregisters its trigger before
/// the next frame writes anything, and that frame unpins a region the
/// trigger still held.
#[must_use = "dropping a TriggerHandle unregisters its trigger"]
#[derive(Debug)]
pub struct TriggerHandle {
    id: TriggerId,
    release: Option<mpsc::Sender<TriggerId>>,
}

impl TriggerHandle {
    pub fn id(&self) -> TriggerId {
        self.id
    }

    /// Keep the trigger alive past this handle; it then lives until
    /// [`ScrollOrchestrator::unregister`] is called.
    pub fn detach(mut self) -> TriggerId {
        self.release = None;
        self.id
    }
}

impl Drop for TriggerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.release.take() {
            // The orchestrator may already be gone, which releases everything anyway.
            let _ = tx.send(self.id);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TriggerTransition {
    pub trigger: TriggerId,
    pub from: ActivationState,
    pub to: ActivationState,
}

/// Summary of one [`ScrollOrchestrator::frame`] call.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub scroll_y: f64,
    /// Raw events coalesced into this frame.
    pub events: usize,
    pub refreshed: bool,
    pub sampled: usize,
    pub skipped: usize,
    pub writes: usize,
    pub released: usize,
    pub transitions: Vec<TriggerTransition>,
}

/// Owns the trigger registry, binder and pin controller, and runs the
/// per-frame pipeline: coalesce -> resolve -> sample -> bind -> pin.
#[derive(Debug)]
pub struct ScrollOrchestrator {
    config: OrchestratorConfig,
    registry: TriggerRegistry,
    binder: AnimationBinder,
    pins: PinController,
    coalescer: FrameCoalescer,
    release_tx: mpsc::Sender<TriggerId>,
    release_rx: mpsc::Receiver<TriggerId>,
    /// Regions still pinned on the page when their trigger went away.
    orphaned_pins: Vec<ElementId>,
    frames: u64,
}

impl ScrollOrchestrator {
    /// One-time setup performed by the host at startup.
    pub fn init(config: OrchestratorConfig) -> Self {
        let (release_tx, release_rx) = mpsc::channel();
        tracing::debug!(?config, "scroll orchestrator initialized");
        Self {
            config,
            registry: TriggerRegistry::new(),
            binder: AnimationBinder::new(),
            pins: PinController::new(),
            coalescer: FrameCoalescer::new(),
            release_tx,
            release_rx,
            orphaned_pins: Vec::new(),
            frames: 0,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Register a region. Offsets resolve immediately when the viewport is
    /// known, otherwise on the first frame.
    pub fn register(
        &mut self,
        config: TriggerConfig,
        layout: &dyn LayoutHost,
    ) -> ScrollResult<TriggerHandle> {
        self.drain_released();
        if self.registry.len() >= self.config.max_triggers {
            return Err(ScrollError::validation(format!(
                "trigger limit of {} reached",
                self.config.max_triggers
            )));
        }

        let pin = config.pin.clone();
        let region = config.element.clone();
        let id = self.registry.register(config)?;
        if let Some(pin) = pin {
            self.pins.track(id, region, pin.content);
        }

        if let Some(viewport) = self.coalescer.viewport() {
            if let Some(trigger) = self.registry.get_mut(id) {
                if let Some(res) = ScrollTracker::resolve(trigger, layout, &viewport) {
                    let range = trigger.range();
                    self.pins.measure(id, &res, range);
                }
            }
        }

        Ok(TriggerHandle {
            id,
            release: Some(self.release_tx.clone()),
        })
    }

    /// Drop a trigger with its bindings and pin. Returns `false` if it was
    /// already gone.
    ///
    /// Nothing is written here. A region that was still pinned is released
    /// with [`PinEdge::Start`] at the start of the next frame.
    pub fn unregister(&mut self, id: TriggerId) -> bool {
        let removed = self.registry.unregister(id).is_some();
        self.binder.unbind_trigger(id);
        if let Some(entry) = self.pins.release(id) {
            if entry.engaged {
                self.orphaned_pins.push(entry.region);
            }
        }
        removed
    }

    pub fn bind(
        &mut self,
        trigger: TriggerId,
        target: impl Into<ElementId>,
        spec: PropertySpec,
    ) -> ScrollResult<BindingId> {
        self.binder.bind(&self.registry, trigger, target.into(), spec)
    }

    pub fn bind_staggered(
        &mut self,
        trigger: TriggerId,
        targets: impl IntoIterator<Item = ElementId>,
        spec: &PropertySpec,
        amount_secs: f64,
    ) -> ScrollResult<Vec<BindingId>> {
        self.binder
            .bind_staggered(&self.registry, trigger, targets, spec, amount_secs)
    }

    /// Register a preset's trigger and all of its bindings. Nothing stays
    /// registered if a binding fails.
    pub fn install(
        &mut self,
        preset: SectionPreset,
        layout: &dyn LayoutHost,
    ) -> ScrollResult<TriggerHandle> {
        let handle = self.register(preset.trigger, layout)?;
        for group in preset.bindings {
            if let Err(err) =
                self.bind_staggered(handle.id(), group.targets, &group.spec, group.stagger_secs)
            {
                self.unregister(handle.detach());
                return Err(err);
            }
        }
        Ok(handle)
    }

    pub fn on_scroll(&mut self, scroll_y: f64) {
        self.coalescer.record_scroll(scroll_y);
    }

    pub fn on_resize(&mut self, viewport_width: f64, viewport_height: f64) {
        self.coalescer
            .record_resize(viewport_width, viewport_height, self.config.refresh_on_resize);
    }

    /// Layout changed without a resize (lazy images, fonts).
    pub fn on_geometry_change(&mut self) {
        self.coalescer.record_geometry_change();
    }

    pub fn viewport(&self) -> Option<ViewportSnapshot> {
        self.coalescer.viewport()
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&Trigger> {
        self.registry.get(id)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.registry.iter()
    }

    pub fn binder(&self) -> &AnimationBinder {
        &self.binder
    }

    pub fn pins(&self) -> &PinController {
        &self.pins
    }

    /// Run one animation frame. Call once per display frame, however many
    /// events arrived since the last one.
    #[tracing::instrument(skip(self, layout, sink))]
    pub fn frame(
        &mut self,
        now_secs: f64,
        layout: &dyn LayoutHost,
        sink: &mut dyn StyleSink,
    ) -> FrameReport {
        let released = self.drain_released();
        self.frames += 1;
        let mut report = FrameReport {
            frame: self.frames,
            released,
            ..FrameReport::default()
        };
        for region in self.orphaned_pins.drain(..) {
            sink.unpin(&region, PinEdge::Start);
            report.writes += 1;
            tracing::debug!(%region, "orphaned pin released");
        }

        let Some(pending) = self.coalescer.take() else {
            return report;
        };
        report.scroll_y = pending.viewport.scroll_y;
        report.events = pending.events;

        if pending.refresh {
            let resolved = ScrollTracker::resolve_all(&mut self.registry, layout, &pending.viewport);
            for (id, res) in &resolved {
                let range = self.registry.get(*id).and_then(Trigger::range);
                self.pins.measure(*id, res, range);
            }
            self.binder.invalidate();
            self.pins.invalidate();
            // Triggers that collapsed while live settle now; sampling skips them.
            for (id, res) in &resolved {
                if res.transitions.is_empty() {
                    continue;
                }
                let Some(trigger) = self.registry.get(*id) else {
                    continue;
                };
                report.writes += self.binder.apply(trigger, now_secs, layout, sink);
                report.writes += self.pins.update(trigger, layout, sink);
                record_transitions(&mut report, *id, &res.transitions);
            }
            report.refreshed = true;
            tracing::debug!(triggers = resolved.len(), "offsets refreshed");
        }

        let sample = ScrollTracker::sample(&mut self.registry, layout, &pending.viewport, now_secs);
        report.sampled = sample.updates.len();
        report.skipped = sample.skipped;

        for update in sample.updates {
            let Some(trigger) = self.registry.get(update.id) else {
                continue;
            };
            if let Some(res) = update.resolved {
                self.pins.measure(update.id, &res, trigger.range());
            }
            report.writes += self.binder.apply(trigger, now_secs, layout, sink);
            report.writes += self.pins.update(trigger, layout, sink);
            record_transitions(&mut report, update.id, &update.transitions);
        }
        report
    }

    fn drain_released(&mut self) -> usize {
        let mut released = 0;
        while let Ok(id) = self.release_rx.try_recv() {
            if self.unregister(id) {
                released += 1;
            }
        }
        released
    }
}

fn record_transitions(report: &mut FrameReport, trigger: TriggerId, edges: &Transitions) {
    report
        .transitions
        .extend(edges.iter().map(|t| TriggerTransition {
            trigger,
            from: t.from,
            to: t.to,
        }));
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/orchestrator.rs"]
mod tests;
