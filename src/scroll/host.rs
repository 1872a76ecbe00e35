use crate::{
    foundation::core::{ElementId, Rect},
    scroll::property::StyleWrite,
};

/// Read-only geometry queries answered by the hosting page.
///
/// Rects are in document coordinates and describe the element's place in
/// normal flow; a pinned region keeps reporting its flow position.
pub trait LayoutHost {
    /// `None` means the reference is stale (unmounted or detached).
    fn element_rect(&self, id: &ElementId) -> Option<Rect>;

    /// Full scrollable width of an element's content.
    fn content_width(&self, id: &ElementId) -> Option<f64>;
}

/// Space reserved in document flow while a region is pinned.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PinLayout {
    pub spacer_height: f64,
}

/// Which end of its range a pin was released at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinEdge {
    /// Scrolled back above the range.
    Start,
    /// Scrolled past the end of the range.
    End,
}

/// Receives every mutation the orchestrator makes to the page.
pub trait StyleSink {
    fn write(&mut self, write: StyleWrite);

    /// Switch `region` to a fixed overlay and insert a spacer in its place.
    ///
    /// Called again for a region that is already pinned when its spacer
    /// changes; the new layout replaces the old one.
    fn pin(&mut self, region: &ElementId, layout: PinLayout);

    /// Restore `region` to normal flow.
    fn unpin(&mut self, region: &ElementId, edge: PinEdge);
}
