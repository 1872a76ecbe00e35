//! In-memory page host.
//!
//! [`SimulatedPage`] stands in for a browser document. Its [`PageLayout`]
//! answers geometry queries and its [`StyleRecorder`] keeps the current
//! computed style of every element plus an ordered log of mutations. The two
//! halves are separate fields so a frame can read one while writing the other.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::core::{ElementId, Rect},
    scroll::{
        host::{LayoutHost, PinEdge, PinLayout, StyleSink},
        orchestrator::{FrameReport, ScrollOrchestrator},
        property::{Property, StyleWrite},
    },
};

#[derive(Clone, Debug, PartialEq)]
struct PageElement {
    rect: Rect,
    content_width: Option<f64>,
    detached: bool,
}

/// Element geometry, in document coordinates.
#[derive(Clone, Debug, Default)]
pub struct PageLayout {
    elements: BTreeMap<ElementId, PageElement>,
}

impl PageLayout {
    pub fn insert(&mut self, id: impl Into<ElementId>, rect: Rect, content_width: Option<f64>) {
        self.elements.insert(
            id.into(),
            PageElement {
                rect,
                content_width,
                detached: false,
            },
        );
    }

    /// Move or resize an element, as after an image finishes loading.
    pub fn set_rect(&mut self, id: impl Into<ElementId>, rect: Rect) -> bool {
        match self.elements.get_mut(&id.into()) {
            Some(el) => {
                el.rect = rect;
                true
            }
            None => false,
        }
    }

    pub fn set_content_width(&mut self, id: impl Into<ElementId>, width: f64) -> bool {
        match self.elements.get_mut(&id.into()) {
            Some(el) => {
                el.content_width = Some(width);
                true
            }
            None => false,
        }
    }

    /// Make every geometry query for `id` fail, as for an unmounted node.
    pub fn detach(&mut self, id: impl Into<ElementId>) {
        if let Some(el) = self.elements.get_mut(&id.into()) {
            el.detached = true;
        }
    }

    pub fn reattach(&mut self, id: impl Into<ElementId>) {
        if let Some(el) = self.elements.get_mut(&id.into()) {
            el.detached = false;
        }
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }
}

impl LayoutHost for PageLayout {
    fn element_rect(&self, id: &ElementId) -> Option<Rect> {
        self.elements
            .get(id)
            .filter(|el| !el.detached)
            .map(|el| el.rect)
    }

    fn content_width(&self, id: &ElementId) -> Option<f64> {
        let el = self.elements.get(id).filter(|el| !el.detached)?;
        Some(el.content_width.unwrap_or_else(|| el.rect.width()))
    }
}

/// One observed mutation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PageEvent {
    Write(StyleWrite),
    Pin { region: ElementId, layout: PinLayout },
    Unpin { region: ElementId, edge: PinEdge },
}

impl PageEvent {
    pub fn element(&self) -> &ElementId {
        match self {
            Self::Write(w) => &w.target,
            Self::Pin { region, .. } | Self::Unpin { region, .. } => region,
        }
    }
}

/// Computed styles, pinned regions and the mutation log.
#[derive(Clone, Debug, Default)]
pub struct StyleRecorder {
    styles: BTreeMap<ElementId, BTreeMap<Property, f64>>,
    pinned: BTreeMap<ElementId, PinLayout>,
    log: Vec<PageEvent>,
}

impl StyleRecorder {
    /// Last value written for a property, if any.
    pub fn style(&self, id: &ElementId, property: Property) -> Option<f64> {
        self.styles.get(id)?.get(&property).copied()
    }

    pub fn pin_layout(&self, id: &ElementId) -> Option<PinLayout> {
        self.pinned.get(id).copied()
    }

    pub fn pinned_regions(&self) -> BTreeSet<ElementId> {
        self.pinned.keys().cloned().collect()
    }

    pub fn log(&self) -> &[PageEvent] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<PageEvent> {
        std::mem::take(&mut self.log)
    }

    /// Number of logged mutations that touched `id`.
    pub fn events_for(&self, id: &ElementId) -> usize {
        self.log.iter().filter(|e| e.element() == id).count()
    }
}

impl StyleSink for StyleRecorder {
    fn write(&mut self, write: StyleWrite) {
        self.styles
            .entry(write.target.clone())
            .or_default()
            .insert(write.property, write.value);
        self.log.push(PageEvent::Write(write));
    }

    fn pin(&mut self, region: &ElementId, layout: PinLayout) {
        self.pinned.insert(region.clone(), layout);
        self.log.push(PageEvent::Pin {
            region: region.clone(),
            layout,
        });
    }

    fn unpin(&mut self, region: &ElementId, edge: PinEdge) {
        self.pinned.remove(region);
        self.log.push(PageEvent::Unpin {
            region: region.clone(),
            edge,
        });
    }
}

#[derive(Clone, Debug, Default)]
pub struct SimulatedPage {
    pub layout: PageLayout,
    pub styles: StyleRecorder,
}

impl SimulatedPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, id: impl Into<ElementId>, rect: Rect) -> Self {
        self.layout.insert(id, rect, None);
        self
    }

    /// Element whose content is `content_width` px wide (e.g. a gallery track).
    pub fn with_content(mut self, id: impl Into<ElementId>, rect: Rect, content_width: f64) -> Self {
        self.layout.insert(id, rect, Some(content_width));
        self
    }

    /// Run one orchestrator frame against this page.
    pub fn frame(&mut self, orchestrator: &mut ScrollOrchestrator, now_secs: f64) -> FrameReport {
        orchestrator.frame(now_secs, &self.layout, &mut self.styles)
    }

    pub fn detach(&mut self, id: impl Into<ElementId>) {
        self.layout.detach(id);
    }

    pub fn reattach(&mut self, id: impl Into<ElementId>) {
        self.layout.reattach(id);
    }

    pub fn style(&self, id: impl Into<ElementId>, property: Property) -> Option<f64> {
        self.styles.style(&id.into(), property)
    }

    pub fn is_pinned(&self, id: impl Into<ElementId>) -> bool {
        self.styles.pin_layout(&id.into()).is_some()
    }

    pub fn pin_layout(&self, id: impl Into<ElementId>) -> Option<PinLayout> {
        self.styles.pin_layout(&id.into())
    }

    pub fn log(&self) -> &[PageEvent] {
        self.styles.log()
    }

    pub fn events_for(&self, id: impl Into<ElementId>) -> usize {
        self.styles.events_for(&id.into())
    }
}

impl LayoutHost for SimulatedPage {
    fn element_rect(&self, id: &ElementId) -> Option<Rect> {
        self.layout.element_rect(id)
    }

    fn content_width(&self, id: &ElementId) -> Option<f64> {
        self.layout.content_width(id)
    }
}
