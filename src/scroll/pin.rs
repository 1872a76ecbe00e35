use std::collections::BTreeMap;

use crate::{
    foundation::core::{ElementId, ScrollRange, TriggerId},
    scroll::{
        host::{LayoutHost, PinEdge, PinLayout, StyleSink},
        property::{Property, StyleWrite},
        tracker::Resolution,
        trigger::Trigger,
    },
};

/// Horizontal content offset for a pinned gallery.
///
/// Non-positive travel (content narrower than the viewport) yields no motion.
pub fn horizontal_offset(progress: f64, travel: f64) -> f64 {
    if travel <= 0.0 {
        return 0.0;
    }
    0.0 - progress.clamp(0.0, 1.0) * travel
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PinEntry {
    pub region: ElementId,
    pub content: ElementId,
    /// `contentWidth - viewportWidth`, fixed between measurements.
    pub travel: f64,
    pub spacer_height: f64,
    pub engaged: bool,
    /// Spacer last handed to the host while engaged.
    #[serde(skip)]
    pinned_spacer: Option<f64>,
    #[serde(skip)]
    last_offset: Option<f64>,
}

/// Holds pinned regions in place while their trigger is in range.
#[derive(Debug, Default)]
pub struct PinController {
    pins: BTreeMap<TriggerId, PinEntry>,
}

impl PinController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, id: TriggerId, region: ElementId, content: ElementId) {
        self.pins.insert(
            id,
            PinEntry {
                region,
                content,
                travel: 0.0,
                spacer_height: 0.0,
                engaged: false,
                pinned_spacer: None,
                last_offset: None,
            },
        );
    }

    /// Recompute travel and spacer; only called on register/resize/refresh.
    pub fn measure(&mut self, id: TriggerId, resolution: &Resolution, range: Option<ScrollRange>) {
        let Some(entry) = self.pins.get_mut(&id) else {
            return;
        };
        entry.travel = resolution.travel.unwrap_or(0.0);
        entry.spacer_height = resolution.rect.height() + range.map_or(0.0, |r| r.len());
        entry.last_offset = None;
        tracing::debug!(
            %id,
            travel = entry.travel,
            spacer = entry.spacer_height,
            "pin measured"
        );
    }

    /// Forget a pin without touching the page; the caller unpins if needed.
    pub fn release(&mut self, id: TriggerId) -> Option<PinEntry> {
        self.pins.remove(&id)
    }

    pub fn get(&self, id: TriggerId) -> Option<&PinEntry> {
        self.pins.get(&id)
    }

    pub fn invalidate(&mut self) {
        for entry in self.pins.values_mut() {
            entry.last_offset = None;
        }
    }

    /// Engage or release the pin and move its content; returns mutations made.
    ///
    /// An engaged pin whose spacer was re-measured is pinned again with the
    /// new layout.
    pub fn update(
        &mut self,
        trigger: &Trigger,
        layout: &dyn LayoutHost,
        sink: &mut dyn StyleSink,
    ) -> usize {
        let Some(entry) = self.pins.get_mut(&trigger.id()) else {
            return 0;
        };
        let progress = trigger.progress();
        let mut mutations = 0;

        let engage = trigger.state().is_live() && progress > 0.0 && progress < 1.0;
        if engage && (!entry.engaged || entry.pinned_spacer != Some(entry.spacer_height)) {
            sink.pin(
                &entry.region,
                PinLayout {
                    spacer_height: entry.spacer_height,
                },
            );
            let repin = entry.engaged;
            entry.engaged = true;
            entry.pinned_spacer = Some(entry.spacer_height);
            mutations += 1;
            tracing::debug!(
                id = %trigger.id(),
                region = %entry.region,
                spacer = entry.spacer_height,
                repin,
                "pin engaged"
            );
        } else if !engage && entry.engaged {
            let edge = if progress >= 1.0 {
                PinEdge::End
            } else {
                PinEdge::Start
            };
            sink.unpin(&entry.region, edge);
            entry.engaged = false;
            entry.pinned_spacer = None;
            mutations += 1;
            tracing::debug!(id = %trigger.id(), region = %entry.region, ?edge, "pin released");
        }

        let offset = horizontal_offset(progress, entry.travel);
        if entry.last_offset != Some(offset) && layout.element_rect(&entry.content).is_some() {
            sink.write(StyleWrite {
                target: entry.content.clone(),
                property: Property::X,
                value: offset,
            });
            entry.last_offset = Some(offset);
            mutations += 1;
        }
        mutations
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/pin.rs"]
mod tests;
