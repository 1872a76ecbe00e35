use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::{
    foundation::{
        core::{BindingId, ElementId, TriggerId},
        error::{ScrollError, ScrollResult},
    },
    scroll::{
        host::{LayoutHost, StyleSink},
        property::{PropertySpec, StyleWrite},
        registry::TriggerRegistry,
        trigger::Trigger,
    },
};

/// A target element whose properties follow one trigger.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Binding {
    pub(crate) id: BindingId,
    pub(crate) trigger: TriggerId,
    pub(crate) target: ElementId,
    pub(crate) spec: PropertySpec,
    pub(crate) delay_secs: f64,
    pub(crate) last_drive: Option<f64>,
}

impl Binding {
    pub fn id(&self) -> BindingId {
        self.id
    }

    pub fn trigger(&self) -> TriggerId {
        self.trigger
    }

    pub fn target(&self) -> &ElementId {
        &self.target
    }

    pub fn spec(&self) -> &PropertySpec {
        &self.spec
    }

    /// Extra playback delay (stagger) for reveal triggers.
    pub fn delay_secs(&self) -> f64 {
        self.delay_secs
    }
}

/// Turns trigger drive values into style writes.
#[derive(Debug, Default)]
pub struct AnimationBinder {
    bindings: BTreeMap<BindingId, Binding>,
    by_trigger: BTreeMap<TriggerId, SmallVec<[BindingId; 4]>>,
    next_id: u64,
}

impl AnimationBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &mut self,
        registry: &TriggerRegistry,
        trigger: TriggerId,
        target: ElementId,
        spec: PropertySpec,
    ) -> ScrollResult<BindingId> {
        self.bind_delayed(registry, trigger, target, spec, 0.0)
    }

    pub fn bind_delayed(
        &mut self,
        registry: &TriggerRegistry,
        trigger: TriggerId,
        target: ElementId,
        spec: PropertySpec,
        delay_secs: f64,
    ) -> ScrollResult<BindingId> {
        if !registry.contains(trigger) {
            return Err(ScrollError::binding(format!(
                "cannot bind '{target}' to unknown {trigger}"
            )));
        }
        if !(delay_secs.is_finite() && delay_secs >= 0.0) {
            return Err(ScrollError::validation(
                "binding delay must be finite and >= 0",
            ));
        }
        spec.validate()?;

        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.bindings.insert(
            id,
            Binding {
                id,
                trigger,
                target,
                spec,
                delay_secs,
                last_drive: None,
            },
        );
        self.by_trigger.entry(trigger).or_default().push(id);
        Ok(id)
    }

    /// Bind the same spec to several targets, spreading `amount_secs` of
    /// delay evenly from the first target to the last.
    pub fn bind_staggered(
        &mut self,
        registry: &TriggerRegistry,
        trigger: TriggerId,
        targets: impl IntoIterator<Item = ElementId>,
        spec: &PropertySpec,
        amount_secs: f64,
    ) -> ScrollResult<Vec<BindingId>> {
        let targets: Vec<ElementId> = targets.into_iter().collect();
        let last = targets.len().saturating_sub(1);
        targets
            .into_iter()
            .enumerate()
            .map(|(i, target)| {
                let delay = if last == 0 {
                    0.0
                } else {
                    amount_secs * (i as f64) / (last as f64)
                };
                self.bind_delayed(registry, trigger, target, spec.clone(), delay)
            })
            .collect()
    }

    /// Drop every binding of `trigger`; returns how many were removed.
    pub fn unbind_trigger(&mut self, trigger: TriggerId) -> usize {
        let Some(ids) = self.by_trigger.remove(&trigger) else {
            return 0;
        };
        for id in &ids {
            self.bindings.remove(id);
        }
        ids.len()
    }

    pub fn bindings_for(&self, trigger: TriggerId) -> impl Iterator<Item = &Binding> {
        self.by_trigger
            .get(&trigger)
            .into_iter()
            .flatten()
            .filter_map(|id| self.bindings.get(id))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Forget what was last written so the next apply rewrites everything.
    pub fn invalidate(&mut self) {
        for binding in self.bindings.values_mut() {
            binding.last_drive = None;
        }
    }

    /// Write `tween(drive)` for each binding of `trigger` whose drive moved.
    ///
    /// Detached targets are left alone and retried on a later frame.
    pub fn apply(
        &mut self,
        trigger: &Trigger,
        now_secs: f64,
        layout: &dyn LayoutHost,
        sink: &mut dyn StyleSink,
    ) -> usize {
        let Some(ids) = self.by_trigger.get(&trigger.id()) else {
            return 0;
        };
        let mut writes = 0;
        for id in ids {
            let Some(binding) = self.bindings.get_mut(id) else {
                continue;
            };
            let drive = trigger.drive(now_secs, binding.delay_secs);
            if binding.last_drive == Some(drive) {
                continue;
            }
            if layout.element_rect(&binding.target).is_none() {
                tracing::trace!(target_el = %binding.target, "stale binding target; write skipped");
                continue;
            }
            for (property, tween) in binding.spec.iter() {
                sink.write(StyleWrite {
                    target: binding.target.clone(),
                    property,
                    value: tween.value_at(drive),
                });
                writes += 1;
            }
            binding.last_drive = Some(drive);
        }
        writes
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/binder.rs"]
mod tests;
