use crate::{
    animation::ease::Ease,
    foundation::error::{ScrollError, ScrollResult},
};

/// Interpolation rule for a single scalar property.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    #[serde(default)]
    pub ease: Ease,
    /// Sub-range `[start, end]` of the drive that plays the whole tween.
    /// Outside it the value holds at `from` or `to`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<[f64; 2]>,
}

impl Tween {
    pub fn new(from: f64, to: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            ease,
            window: None,
        }
    }

    pub fn linear(from: f64, to: f64) -> Self {
        Self::new(from, to, Ease::Linear)
    }

    /// Play the tween only while the drive crosses `[start, end]`.
    pub fn over(mut self, start: f64, end: f64) -> Self {
        self.window = Some([start, end]);
        self
    }

    pub fn validate(&self) -> ScrollResult<()> {
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(ScrollError::validation("tween endpoints must be finite"));
        }
        if let Some([start, end]) = self.window {
            if !(start.is_finite() && end.is_finite() && 0.0 <= start && start < end && end <= 1.0)
            {
                return Err(ScrollError::validation(
                    "tween window must satisfy 0 <= start < end <= 1",
                ));
            }
        }
        self.ease.validate()
    }

    /// `from + (to - from) * ease(local)`, where `local` is the drive
    /// rescaled into the window; pure in `drive`.
    pub fn value_at(&self, drive: f64) -> f64 {
        let local = match self.window {
            Some([start, _]) if drive <= start => 0.0,
            Some([_, end]) if drive >= end => 1.0,
            Some([start, end]) => (drive - start) / (end - start),
            None => drive,
        };
        self.from + (self.to - self.from) * self.ease.apply(local)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
