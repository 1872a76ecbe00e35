//! JSON scene documents: a viewport, a set of page elements and the scroll
//! sections wired to them.

use std::collections::BTreeSet;

use crate::{
    foundation::{
        core::{ElementId, Rect},
        error::{ScrollError, ScrollResult},
    },
    page::SimulatedPage,
    presets::{self, SectionPreset},
    scroll::orchestrator::{FrameReport, OrchestratorConfig, ScrollOrchestrator, TriggerHandle},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneViewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SceneRect {
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneElement {
    pub id: ElementId,
    pub rect: SceneRect,
    /// Scrollable content width, for gallery tracks wider than their box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_width: Option<f64>,
}

fn default_split_threshold() -> f64 {
    0.1
}

fn default_header_threshold() -> f64 {
    presets::HEADER_SCROLL_THRESHOLD
}

/// A scroll section, either a named site preset or a hand-built trigger.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionSpec {
    Parallax {
        container: ElementId,
        image: ElementId,
    },
    Gallery {
        section: ElementId,
        track: ElementId,
    },
    SplitText {
        element: ElementId,
        chars: Vec<ElementId>,
        #[serde(default = "default_split_threshold")]
        threshold: f64,
    },
    FadeInUp {
        element: ElementId,
    },
    HeroIntro {
        image: ElementId,
    },
    /// Footer driven by whole-page scroll progress; `document` spans the page.
    PageFooter {
        document: ElementId,
        footer: ElementId,
    },
    ScrolledHeader {
        document: ElementId,
        header: ElementId,
        #[serde(default = "default_header_threshold")]
        threshold_px: f64,
    },
    /// Cards entering one after another, each on its own trigger.
    CardGrid {
        cards: Vec<ElementId>,
    },
    Custom(SectionPreset),
}

impl SectionSpec {
    /// Presets to install for this section, one trigger each.
    pub fn to_presets(&self) -> Vec<SectionPreset> {
        let preset = match self {
            Self::Parallax { container, image } => {
                presets::parallax_image(container.clone(), image.clone())
            }
            Self::Gallery { section, track } => {
                presets::horizontal_gallery(section.clone(), track.clone())
            }
            Self::SplitText {
                element,
                chars,
                threshold,
            } => presets::split_text_reveal(element.clone(), chars.iter().cloned(), *threshold),
            Self::FadeInUp { element } => presets::fade_in_up(element.clone()),
            Self::HeroIntro { image } => presets::hero_intro(image.clone()),
            Self::PageFooter { document, footer } => {
                presets::page_footer(document.clone(), footer.clone())
            }
            Self::ScrolledHeader {
                document,
                header,
                threshold_px,
            } => presets::scrolled_header(document.clone(), header.clone(), *threshold_px),
            Self::CardGrid { cards } => return presets::card_entrances(cards.iter().cloned()),
            Self::Custom(preset) => preset.clone(),
        };
        vec![preset]
    }
}

fn referenced_elements(preset: &SectionPreset) -> impl Iterator<Item = &ElementId> {
    std::iter::once(&preset.trigger.element)
        .chain(preset.trigger.pin.iter().map(|p| &p.content))
        .chain(preset.bindings.iter().flat_map(|b| b.targets.iter()))
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub viewport: SceneViewport,
    #[serde(default)]
    pub config: OrchestratorConfig,
    pub elements: Vec<SceneElement>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

impl Scene {
    pub fn from_json(s: &str) -> ScrollResult<Self> {
        let scene: Self = serde_json::from_str(s)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn validate(&self) -> ScrollResult<()> {
        let SceneViewport { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ScrollError::scene("viewport width/height must be > 0"));
        }

        let mut ids = BTreeSet::new();
        for el in &self.elements {
            if el.id.as_str().trim().is_empty() {
                return Err(ScrollError::scene("element id must be non-empty"));
            }
            if !ids.insert(&el.id) {
                return Err(ScrollError::scene(format!("duplicate element id '{}'", el.id)));
            }
            let r = el.rect;
            let finite = [r.x, r.y, r.width, r.height].iter().all(|v| v.is_finite());
            if !finite || r.width < 0.0 || r.height < 0.0 {
                return Err(ScrollError::scene(format!(
                    "element '{}' has an invalid rect",
                    el.id
                )));
            }
            if let Some(w) = el.content_width {
                if !(w.is_finite() && w >= 0.0) {
                    return Err(ScrollError::scene(format!(
                        "element '{}' content_width must be finite and >= 0",
                        el.id
                    )));
                }
            }
        }

        for (index, section) in self.sections.iter().enumerate() {
            for preset in section.to_presets() {
                preset
                    .trigger
                    .validate()
                    .map_err(|e| ScrollError::scene(format!("section {index}: {e}")))?;
                for id in referenced_elements(&preset) {
                    if !ids.contains(id) {
                        return Err(ScrollError::scene(format!(
                            "section {index} references undeclared element '{id}'"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn page(&self) -> SimulatedPage {
        let mut page = SimulatedPage::new();
        for el in &self.elements {
            page.layout
                .insert(el.id.clone(), el.rect.to_rect(), el.content_width);
        }
        page
    }

    /// Build the page, initialize an orchestrator sized to the viewport and
    /// install every section.
    #[tracing::instrument(skip(self), fields(sections = self.sections.len()))]
    pub fn mount(&self) -> ScrollResult<MountedScene> {
        self.validate()?;
        let page = self.page();
        let mut orchestrator = ScrollOrchestrator::init(self.config.clone());
        orchestrator.on_resize(self.viewport.width, self.viewport.height);

        let mut handles = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            for preset in section.to_presets() {
                handles.push(orchestrator.install(preset, &page.layout)?);
            }
        }
        Ok(MountedScene {
            page,
            orchestrator,
            handles,
        })
    }
}

/// A scene wired up and ready to be scrolled.
#[derive(Debug)]
pub struct MountedScene {
    pub page: SimulatedPage,
    pub orchestrator: ScrollOrchestrator,
    pub handles: Vec<TriggerHandle>,
}

impl MountedScene {
    /// Scroll to `scroll_y` and run one frame at `now_secs`.
    pub fn scroll_to(&mut self, scroll_y: f64, now_secs: f64) -> FrameReport {
        self.orchestrator.on_scroll(scroll_y);
        self.page.frame(&mut self.orchestrator, now_secs)
    }

    pub fn resize(&mut self, width: f64, height: f64, now_secs: f64) -> FrameReport {
        self.orchestrator.on_resize(width, height);
        self.page.frame(&mut self.orchestrator, now_secs)
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
