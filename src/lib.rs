//! Lumina Scroll drives scroll-synchronized reveal, parallax and pinning
//! animations for a photography studio site.
//!
//! The host page owns the DOM and the clock. It reports scroll and resize
//! events to a [`ScrollOrchestrator`], answers geometry queries through
//! [`LayoutHost`] and receives style mutations through [`StyleSink`]:
//!
//! - Register a trigger region (or install a [`SectionPreset`])
//! - Feed raw events as they arrive
//! - Call [`ScrollOrchestrator::frame`] once per display frame
#![forbid(unsafe_code)]

pub mod animation;
pub mod foundation;
pub mod page;
pub mod presets;
pub mod scene;
pub mod scroll;

pub use crate::animation::{ease::Ease, tween::Tween};
pub use crate::foundation::core::{
    BindingId, ElementId, Rect, ScrollRange, TriggerId, ViewportSnapshot,
};
pub use crate::foundation::error::{ScrollError, ScrollResult};
pub use crate::page::{PageEvent, SimulatedPage};
pub use crate::presets::{PresetBinding, SectionPreset};
pub use crate::scene::{MountedScene, Scene, SectionSpec};
pub use crate::scroll::host::{LayoutHost, PinEdge, PinLayout, StyleSink};
pub use crate::scroll::offsets::{Anchor, EndRule, ScrollPosition};
pub use crate::scroll::orchestrator::{
    FrameReport, OrchestratorConfig, ScrollOrchestrator, TriggerHandle,
};
pub use crate::scroll::property::{Property, PropertySpec, StyleWrite};
pub use crate::scroll::trigger::{
    ActivationState, PinSpec, RevealSpec, Trigger, TriggerConfig, TriggerKind,
};
