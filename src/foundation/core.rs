use crate::foundation::error::{ScrollError, ScrollResult};

pub use kurbo::Rect;

/// Stable host-side reference to a page element.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    /// Build an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry-assigned trigger id. Never reused within one orchestrator.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TriggerId(pub u64);

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trigger#{}", self.0)
    }
}

/// Binder-assigned binding id.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BindingId(pub u64);

/// Scroll and viewport state at one sample tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportSnapshot {
    /// Document scroll offset in px.
    pub scroll_y: f64,
    /// Viewport width in px.
    pub viewport_width: f64,
    /// Viewport height in px.
    pub viewport_height: f64,
}

impl ViewportSnapshot {
    /// Validated constructor: every field must be finite and non-negative.
    pub fn new(scroll_y: f64, viewport_width: f64, viewport_height: f64) -> ScrollResult<Self> {
        for (name, v) in [
            ("scroll_y", scroll_y),
            ("viewport_width", viewport_width),
            ("viewport_height", viewport_height),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ScrollError::validation(format!(
                    "viewport {name} must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(Self {
            scroll_y,
            viewport_width,
            viewport_height,
        })
    }

    /// Same viewport, different scroll position.
    pub fn with_scroll(self, scroll_y: f64) -> Self {
        Self {
            scroll_y: scroll_y.max(0.0),
            ..self
        }
    }
}

/// Resolved `[start, end]` scroll interval of a trigger, in document px.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollRange {
    pub start: f64,
    pub end: f64,
}

impl ScrollRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn len(self) -> f64 {
        self.end - self.start
    }

    /// Zero, negative or non-finite ranges can never produce progress.
    pub fn is_degenerate(self) -> bool {
        !(self.start.is_finite() && self.end.is_finite()) || self.end <= self.start
    }

    /// Normalized position of `scroll_y` inside the range, clamped to `[0, 1]`.
    pub fn progress_at(self, scroll_y: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        ((scroll_y - self.start) / self.len()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
