use std::collections::BTreeMap;

use crate::{
    foundation::{core::TriggerId, error::ScrollResult},
    scroll::trigger::{Trigger, TriggerConfig},
};

/// Owns the set of live triggers. Iteration order is registration order.
#[derive(Debug, Default)]
pub struct TriggerRegistry {
    triggers: BTreeMap<TriggerId, Trigger>,
    next_id: u64,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a trigger. Geometry is resolved later by the
    /// tracker; a degenerate range is not an error here.
    pub fn register(&mut self, config: TriggerConfig) -> ScrollResult<TriggerId> {
        config.validate()?;
        let id = TriggerId(self.next_id);
        self.next_id += 1;
        self.triggers.insert(id, Trigger::new(id, config));
        tracing::debug!(%id, "trigger registered");
        Ok(id)
    }

    /// Drop a trigger. Calling this again for the same id is a no-op.
    pub fn unregister(&mut self, id: TriggerId) -> Option<Trigger> {
        let removed = self.triggers.remove(&id);
        if removed.is_some() {
            tracing::debug!(%id, "trigger unregistered");
        }
        removed
    }

    pub fn contains(&self, id: TriggerId) -> bool {
        self.triggers.contains_key(&id)
    }

    pub fn get(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TriggerId) -> Option<&mut Trigger> {
        self.triggers.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Trigger> {
        self.triggers.values_mut()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
