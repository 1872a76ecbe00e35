//! Start/end offset rules and their resolution against live layout.
//!
//! Rules use the familiar two-anchor notation: `"top bottom"` means "when the
//! element's top meets the viewport's bottom". End rules additionally accept
//! `"+=N"` (N px after the start) and `"+=travel"` (past the element's bottom
//! by the pinned content's horizontal overflow).

use std::{fmt, str::FromStr};

use crate::foundation::{
    core::{Rect, ScrollRange, ViewportSnapshot},
    error::{ScrollError, ScrollResult},
};

/// A point along an element or the viewport, measured from its top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    Top,
    Center,
    Bottom,
    Percent(f64),
    Px(f64),
}

impl Anchor {
    /// Distance from the top edge for a box of the given extent.
    pub fn offset(self, extent: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => extent * 0.5,
            Self::Bottom => extent,
            Self::Percent(p) => extent * p / 100.0,
            Self::Px(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = ScrollError;

    fn from_str(s: &str) -> ScrollResult<Self> {
        let s = s.trim();
        let parsed = match s {
            "top" => Self::Top,
            "center" => Self::Center,
            "bottom" => Self::Bottom,
            _ => {
                if let Some(num) = s.strip_suffix('%') {
                    Self::Percent(parse_finite(num, s)?)
                } else {
                    Self::Px(parse_finite(s.strip_suffix("px").unwrap_or(s), s)?)
                }
            }
        };
        Ok(parsed)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Center => f.write_str("center"),
            Self::Bottom => f.write_str("bottom"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Px(px) => write!(f, "{px}px"),
        }
    }
}

fn parse_finite(num: &str, whole: &str) -> ScrollResult<f64> {
    let v: f64 = num
        .trim()
        .parse()
        .map_err(|_| ScrollError::validation(format!("invalid offset anchor '{whole}'")))?;
    if !v.is_finite() {
        return Err(ScrollError::validation(format!(
            "offset anchor '{whole}' must be finite"
        )));
    }
    Ok(v)
}

/// `"<element anchor> <viewport anchor>"`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScrollPosition {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl ScrollPosition {
    pub const fn new(element: Anchor, viewport: Anchor) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which the two anchors coincide.
    pub fn resolve(self, rect: Rect, viewport: &ViewportSnapshot) -> f64 {
        rect.y0 + self.element.offset(rect.height()) - self.viewport.offset(viewport.viewport_height)
    }
}

impl FromStr for ScrollPosition {
    type Err = ScrollError;

    fn from_str(s: &str) -> ScrollResult<Self> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(element), Some(viewport), None) => Ok(Self {
                element: element.parse()?,
                viewport: viewport.parse()?,
            }),
            _ => Err(ScrollError::validation(format!(
                "scroll position '{s}' must be '<element> <viewport>'"
            ))),
        }
    }
}

impl fmt::Display for ScrollPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl TryFrom<String> for ScrollPosition {
    type Error = ScrollError;

    fn try_from(value: String) -> ScrollResult<Self> {
        value.parse()
    }
}

impl From<ScrollPosition> for String {
    fn from(value: ScrollPosition) -> Self {
        value.to_string()
    }
}

/// Where a trigger's range ends.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EndRule {
    At(ScrollPosition),
    /// Fixed distance after the resolved start.
    Distance(f64),
    /// Element bottom plus the pinned content's horizontal overflow.
    PinTravel,
}

impl EndRule {
    pub fn needs_travel(self) -> bool {
        matches!(self, Self::PinTravel)
    }
}

impl FromStr for EndRule {
    type Err = ScrollError;

    fn from_str(s: &str) -> ScrollResult<Self> {
        let trimmed = s.trim();
        let Some(rel) = trimmed.strip_prefix("+=") else {
            return Ok(Self::At(trimmed.parse()?));
        };
        let rel = rel.trim();
        if rel == "travel" {
            return Ok(Self::PinTravel);
        }
        let px = parse_finite(rel.strip_suffix("px").unwrap_or(rel), s)?;
        if px < 0.0 {
            return Err(ScrollError::validation(format!(
                "relative end '{s}' must not be negative"
            )));
        }
        Ok(Self::Distance(px))
    }
}

impl fmt::Display for EndRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(pos) => pos.fmt(f),
            Self::Distance(px) => write!(f, "+={px}"),
            Self::PinTravel => f.write_str("+=travel"),
        }
    }
}

impl TryFrom<String> for EndRule {
    type Error = ScrollError;

    fn try_from(value: String) -> ScrollResult<Self> {
        value.parse()
    }
}

impl From<EndRule> for String {
    fn from(value: EndRule) -> Self {
        value.to_string()
    }
}

/// Resolve both rules into a document-space range.
///
/// `travel` is only consulted by [`EndRule::PinTravel`]; negative travel
/// contributes nothing to the range.
pub fn resolve_range(
    start: ScrollPosition,
    end: EndRule,
    rect: Rect,
    viewport: &ViewportSnapshot,
    travel: f64,
) -> ScrollRange {
    let s = start.resolve(rect, viewport);
    let e = match end {
        EndRule::At(pos) => pos.resolve(rect, viewport),
        EndRule::Distance(px) => s + px,
        EndRule::PinTravel => rect.y0 + rect.height() + travel.max(0.0),
    };
    ScrollRange::new(s, e)
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/offsets.rs"]
mod tests;
