use smallvec::SmallVec;

use crate::{
    foundation::{
        core::{ElementId, ScrollRange, TriggerId},
        error::{ScrollError, ScrollResult},
    },
    scroll::offsets::{EndRule, ScrollPosition},
};

/// One-shot entrance parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RevealSpec {
    /// Progress at which the reveal latches; `0` latches on first entry.
    #[serde(default)]
    pub threshold: f64,
    /// Playback length after the latch, in seconds.
    #[serde(default = "default_reveal_duration")]
    pub duration_secs: f64,
    #[serde(default)]
    pub delay_secs: f64,
}

fn default_reveal_duration() -> f64 {
    1.0
}

impl Default for RevealSpec {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            duration_secs: default_reveal_duration(),
            delay_secs: 0.0,
        }
    }
}

/// Replay behaviour of a trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerKind {
    /// Progress tracks scroll in both directions.
    #[default]
    Scrub,
    /// Plays once after latching and never reverses.
    Reveal(RevealSpec),
}

/// Pin the trigger element and slide `content` horizontally through it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PinSpec {
    pub content: ElementId,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerConfig {
    pub element: ElementId,
    pub start: ScrollPosition,
    pub end: EndRule,
    #[serde(default)]
    pub kind: TriggerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<PinSpec>,
}

impl TriggerConfig {
    pub fn scrub(element: impl Into<ElementId>, start: ScrollPosition, end: EndRule) -> Self {
        Self {
            element: element.into(),
            start,
            end,
            kind: TriggerKind::Scrub,
            pin: None,
        }
    }

    pub fn reveal(
        element: impl Into<ElementId>,
        start: ScrollPosition,
        end: EndRule,
        reveal: RevealSpec,
    ) -> Self {
        Self {
            element: element.into(),
            start,
            end,
            kind: TriggerKind::Reveal(reveal),
            pin: None,
        }
    }

    pub fn pinned(mut self, content: impl Into<ElementId>) -> Self {
        self.pin = Some(PinSpec {
            content: content.into(),
        });
        self
    }

    pub fn validate(&self) -> ScrollResult<()> {
        if self.element.as_str().trim().is_empty() {
            return Err(ScrollError::validation("trigger element id must be non-empty"));
        }
        if let TriggerKind::Reveal(r) = self.kind {
            if !(0.0..=1.0).contains(&r.threshold) {
                return Err(ScrollError::validation(
                    "reveal threshold must lie in [0, 1]",
                ));
            }
            if !(r.duration_secs.is_finite() && r.duration_secs >= 0.0) {
                return Err(ScrollError::validation(
                    "reveal duration must be finite and >= 0",
                ));
            }
            if !(r.delay_secs.is_finite() && r.delay_secs >= 0.0) {
                return Err(ScrollError::validation(
                    "reveal delay must be finite and >= 0",
                ));
            }
            if self.pin.is_some() {
                return Err(ScrollError::validation(
                    "pinned triggers must scrub; a reveal cannot pin",
                ));
            }
        }
        if self.end.needs_travel() && self.pin.is_none() {
            return Err(ScrollError::validation(
                "end rule '+=travel' requires a pin content element",
            ));
        }
        Ok(())
    }
}

/// Activation cycle: `Inactive -> Entering -> Active -> Leaving -> Inactive`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationState {
    #[default]
    Inactive,
    Entering,
    Active,
    Leaving,
}

/// One edge walked by the activation cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transition {
    pub from: ActivationState,
    pub to: ActivationState,
}

pub type Transitions = SmallVec<[Transition; 2]>;

impl ActivationState {
    pub fn next(self) -> Self {
        match self {
            Self::Inactive => Self::Entering,
            Self::Entering => Self::Active,
            Self::Active => Self::Leaving,
            Self::Leaving => Self::Inactive,
        }
    }

    pub fn is_live(self) -> bool {
        matches!(self, Self::Entering | Self::Active)
    }

    fn admits(self, progress: f64) -> bool {
        self.is_live() == (progress > 0.0)
    }

    /// Walk the cycle until the state agrees with `progress`.
    ///
    /// `Entering` and `Leaving` last one sample: when they already agree they
    /// advance to `Active` / `Inactive`.
    pub fn step(self, progress: f64) -> (Self, Transitions) {
        let mut edges = Transitions::new();
        let mut state = self;
        if state.admits(progress) {
            if matches!(state, Self::Entering | Self::Leaving) {
                let to = state.next();
                edges.push(Transition { from: state, to });
                state = to;
            }
            return (state, edges);
        }
        loop {
            let to = state.next();
            edges.push(Transition { from: state, to });
            state = to;
            if state.admits(progress) {
                return (state, edges);
            }
        }
    }

    fn walk_to(self, target: Self) -> (Self, Transitions) {
        let mut edges = Transitions::new();
        let mut state = self;
        while state != target {
            let to = state.next();
            edges.push(Transition { from: state, to });
            state = to;
        }
        (state, edges)
    }
}

/// Registered trigger with its live orchestration state.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Trigger {
    pub(crate) id: TriggerId,
    pub(crate) config: TriggerConfig,
    pub(crate) range: Option<ScrollRange>,
    pub(crate) degenerate: bool,
    pub(crate) progress: f64,
    pub(crate) state: ActivationState,
    pub(crate) latched_at: Option<f64>,
}

impl Trigger {
    pub(crate) fn new(id: TriggerId, config: TriggerConfig) -> Self {
        Self {
            id,
            config,
            range: None,
            degenerate: false,
            progress: 0.0,
            state: ActivationState::Inactive,
            latched_at: None,
        }
    }

    pub fn id(&self) -> TriggerId {
        self.id
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    pub fn element(&self) -> &ElementId {
        &self.config.element
    }

    /// Resolved range, once the element has been measured.
    pub fn range(&self) -> Option<ScrollRange> {
        self.range
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    /// Permanently inactive because its range resolved empty.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn is_latched(&self) -> bool {
        self.latched_at.is_some()
    }

    pub fn is_pinned(&self) -> bool {
        self.config.pin.is_some()
    }

    /// Record a freshly resolved range and return the edges it forced.
    ///
    /// A trigger that ever resolves empty stays inert from then on. If it was
    /// live it walks back to `Inactive` right away. A latched reveal keeps its
    /// last range, since its playback runs on the clock.
    pub(crate) fn set_range(&mut self, range: ScrollRange) -> Transitions {
        if self.degenerate {
            return Transitions::new();
        }
        if range.is_degenerate() {
            if self.latched_at.is_some() {
                return Transitions::new();
            }
            self.degenerate = true;
            self.range = None;
            self.progress = 0.0;
            let (state, edges) = self.state.walk_to(ActivationState::Inactive);
            self.state = state;
            return edges;
        }
        self.range = Some(range);
        Transitions::new()
    }

    /// Feed a sampled progress value; returns the edges walked.
    pub(crate) fn advance(&mut self, progress: f64, now_secs: f64) -> Transitions {
        if self.degenerate || self.latched_at.is_some() {
            return Transitions::new();
        }
        let progress = progress.clamp(0.0, 1.0);

        if let TriggerKind::Reveal(reveal) = self.config.kind {
            if progress > 0.0 && progress >= reveal.threshold {
                self.progress = 1.0;
                self.latched_at = Some(now_secs);
                let (state, edges) = self.state.walk_to(ActivationState::Active);
                self.state = state;
                return edges;
            }
        }

        self.progress = progress;
        let (state, edges) = self.state.step(progress);
        self.state = state;
        edges
    }

    /// Value fed to bound tweens. Scrubs follow progress; reveals follow
    /// playback time since the latch.
    pub(crate) fn drive(&self, now_secs: f64, binding_delay_secs: f64) -> f64 {
        match self.config.kind {
            TriggerKind::Scrub => self.progress,
            TriggerKind::Reveal(reveal) => {
                let Some(t0) = self.latched_at else {
                    return 0.0;
                };
                let elapsed = now_secs - t0 - reveal.delay_secs - binding_delay_secs;
                if reveal.duration_secs <= 0.0 {
                    return if elapsed >= 0.0 { 1.0 } else { 0.0 };
                }
                (elapsed / reveal.duration_secs).clamp(0.0, 1.0)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/trigger.rs"]
mod tests;
