use std::collections::BTreeMap;

use crate::{
    animation::tween::Tween,
    foundation::{
        core::ElementId,
        error::{ScrollError, ScrollResult},
    },
};

/// Animatable style channels.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Horizontal translation in px.
    X,
    /// Vertical translation in px.
    Y,
    /// Horizontal translation as a percentage of the element's own width.
    XPercent,
    /// Vertical translation as a percentage of the element's own height.
    YPercent,
    Opacity,
    Scale,
    /// Rotation about the z axis in degrees.
    RotateZ,
    /// Host-defined on/off state such as a class name, written as 0 or 1.
    Toggle,
}

impl Property {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::XPercent => "x_percent",
            Self::YPercent => "y_percent",
            Self::Opacity => "opacity",
            Self::Scale => "scale",
            Self::RotateZ => "rotate_z",
            Self::Toggle => "toggle",
        }
    }
}

/// Per-property interpolation rules for one binding.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PropertySpec(pub BTreeMap<Property, Tween>);

impl PropertySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: Property, tween: Tween) -> Self {
        self.0.insert(property, tween);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &Tween)> {
        self.0.iter().map(|(p, t)| (*p, t))
    }

    pub fn validate(&self) -> ScrollResult<()> {
        if self.0.is_empty() {
            return Err(ScrollError::validation(
                "property spec must animate at least one property",
            ));
        }
        for (property, tween) in &self.0 {
            tween.validate().map_err(|e| {
                ScrollError::validation(format!("property '{}': {e}", property.as_str()))
            })?;
        }
        Ok(())
    }
}

/// A single style mutation emitted to the host.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleWrite {
    pub target: ElementId,
    pub property: Property,
    pub value: f64,
}
