use crate::{
    foundation::core::{Rect, TriggerId, ViewportSnapshot},
    scroll::{
        host::LayoutHost,
        offsets::resolve_range,
        registry::TriggerRegistry,
        trigger::{Transitions, Trigger},
    },
};

/// Geometry read while resolving one trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub rect: Rect,
    /// `contentWidth - viewportWidth` for pinned triggers; may be negative.
    pub travel: Option<f64>,
    /// Edges walked because the new range collapsed under a live trigger.
    pub transitions: Transitions,
}

/// Outcome of sampling one trigger.
#[derive(Clone, Debug)]
pub struct TriggerUpdate {
    pub id: TriggerId,
    pub progress_changed: bool,
    pub transitions: Transitions,
    /// Set when the trigger had to be resolved during this sample.
    pub resolved: Option<Resolution>,
}

#[derive(Clone, Debug, Default)]
pub struct SampleReport {
    pub updates: Vec<TriggerUpdate>,
    /// Triggers whose element reference was stale.
    pub skipped: usize,
}

/// Maps scroll position to per-trigger progress.
pub struct ScrollTracker;

impl ScrollTracker {
    /// Re-read layout for one trigger and store its range.
    ///
    /// Returns `None` when the element (or its pin content) is stale.
    pub fn resolve(
        trigger: &mut Trigger,
        layout: &dyn LayoutHost,
        viewport: &ViewportSnapshot,
    ) -> Option<Resolution> {
        let rect = layout.element_rect(trigger.element())?;
        let travel = match &trigger.config.pin {
            Some(pin) => Some(layout.content_width(&pin.content)? - viewport.viewport_width),
            None => None,
        };
        let range = resolve_range(
            trigger.config.start,
            trigger.config.end,
            rect,
            viewport,
            travel.unwrap_or(0.0),
        );
        let transitions = trigger.set_range(range);
        if trigger.is_degenerate() {
            tracing::debug!(
                id = %trigger.id(),
                start = range.start,
                end = range.end,
                "degenerate range; trigger stays inactive"
            );
        }
        Some(Resolution {
            rect,
            travel,
            transitions,
        })
    }

    /// Re-resolve every trigger, e.g. after a resize.
    #[tracing::instrument(skip(registry, layout))]
    pub fn resolve_all(
        registry: &mut TriggerRegistry,
        layout: &dyn LayoutHost,
        viewport: &ViewportSnapshot,
    ) -> Vec<(TriggerId, Resolution)> {
        registry
            .iter_mut()
            .filter(|t| !t.is_degenerate())
            .filter_map(|t| Self::resolve(t, layout, viewport).map(|r| (t.id(), r)))
            .collect()
    }

    /// One pass over all triggers: `progress = clamp((y - start) / (end - start))`.
    ///
    /// Stale elements are skipped without touching their trigger.
    pub fn sample(
        registry: &mut TriggerRegistry,
        layout: &dyn LayoutHost,
        viewport: &ViewportSnapshot,
        now_secs: f64,
    ) -> SampleReport {
        let mut report = SampleReport::default();
        for trigger in registry.iter_mut() {
            if trigger.is_degenerate() {
                continue;
            }
            if layout.element_rect(trigger.element()).is_none() {
                tracing::trace!(id = %trigger.id(), "stale element; sample skipped");
                report.skipped += 1;
                continue;
            }

            let mut resolved = None;
            if trigger.range().is_none() {
                resolved = Self::resolve(trigger, layout, viewport);
                if resolved.is_none() {
                    report.skipped += 1;
                    continue;
                }
            }
            let Some(range) = trigger.range() else {
                // Resolved to a degenerate range just now.
                continue;
            };

            let before = trigger.progress();
            let transitions = trigger.advance(range.progress_at(viewport.scroll_y), now_secs);
            for edge in &transitions {
                tracing::debug!(id = %trigger.id(), from = ?edge.from, to = ?edge.to, "transition");
            }
            report.updates.push(TriggerUpdate {
                id: trigger.id(),
                progress_changed: trigger.progress() != before,
                transitions,
                resolved,
            });
        }
        report
    }
}

/// Folds scroll/resize/geometry notifications into one recompute per frame.
///
/// Scroll positions recorded before the first resize are kept; no frame runs
/// until the viewport size is known.
#[derive(Clone, Debug, Default)]
pub struct FrameCoalescer {
    scroll_y: f64,
    size: Option<(f64, f64)>,
    refresh: bool,
    events: usize,
}

/// What a frame should do, after coalescing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingFrame {
    pub viewport: ViewportSnapshot,
    /// Offsets must be re-resolved before sampling.
    pub refresh: bool,
    /// Raw events folded into this frame.
    pub events: usize,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_scroll(&mut self, scroll_y: f64) {
        self.events += 1;
        self.scroll_y = if scroll_y.is_finite() {
            scroll_y.max(0.0)
        } else {
            0.0
        };
    }

    pub fn record_resize(&mut self, viewport_width: f64, viewport_height: f64, refresh: bool) {
        self.events += 1;
        self.size = Some((viewport_width.max(0.0), viewport_height.max(0.0)));
        self.refresh |= refresh;
    }

    pub fn record_geometry_change(&mut self) {
        self.events += 1;
        self.refresh = true;
    }

    /// Latest viewport, once a size has been reported.
    pub fn viewport(&self) -> Option<ViewportSnapshot> {
        let (viewport_width, viewport_height) = self.size?;
        Some(ViewportSnapshot {
            scroll_y: self.scroll_y,
            viewport_width,
            viewport_height,
        })
    }

    /// Hand out the coalesced state and reset the per-frame counters.
    ///
    /// Events keep accumulating while no size is known.
    pub fn take(&mut self) -> Option<PendingFrame> {
        let viewport = self.viewport()?;
        let pending = PendingFrame {
            viewport,
            refresh: self.refresh,
            events: self.events,
        };
        self.refresh = false;
        self.events = 0;
        Some(pending)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/tracker.rs"]
mod tests;
