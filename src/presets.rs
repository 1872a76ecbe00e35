//! Ready-made sections of the studio site.
//!
//! Each preset packages a trigger with the bindings the corresponding page
//! component animates, so a host only supplies element ids.

use crate::{
    animation::{ease::Ease, tween::Tween},
    foundation::core::ElementId,
    scroll::{
        offsets::{Anchor, EndRule, ScrollPosition},
        property::{Property, PropertySpec},
        trigger::{RevealSpec, TriggerConfig},
    },
};

/// Targets sharing one property spec, optionally staggered.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PresetBinding {
    pub targets: Vec<ElementId>,
    pub spec: PropertySpec,
    /// Total delay spread across `targets`, first to last.
    #[serde(default)]
    pub stagger_secs: f64,
}

impl PresetBinding {
    pub fn single(target: impl Into<ElementId>, spec: PropertySpec) -> Self {
        Self {
            targets: vec![target.into()],
            spec,
            stagger_secs: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionPreset {
    pub trigger: TriggerConfig,
    pub bindings: Vec<PresetBinding>,
}

const TOP_BOTTOM: ScrollPosition = ScrollPosition::new(Anchor::Top, Anchor::Bottom);
const BOTTOM_TOP: ScrollPosition = ScrollPosition::new(Anchor::Bottom, Anchor::Top);
const TOP_TOP: ScrollPosition = ScrollPosition::new(Anchor::Top, Anchor::Top);
const BOTTOM_BOTTOM: ScrollPosition = ScrollPosition::new(Anchor::Bottom, Anchor::Bottom);

/// Scroll distance after which the site header counts as scrolled.
pub const HEADER_SCROLL_THRESHOLD: f64 = 50.0;

/// Seconds between neighbouring cards of a grid entrance.
pub const CARD_STAGGER_SECS: f64 = 0.15;

const CARD_SPRING: Ease = Ease::Spring {
    stiffness: 40.0,
    damping: 20.0,
    mass: 1.0,
};

/// Image drifting inside its frame while the frame crosses the viewport.
pub fn parallax_image(container: impl Into<ElementId>, image: impl Into<ElementId>) -> SectionPreset {
    SectionPreset {
        trigger: TriggerConfig::scrub(container, TOP_BOTTOM, EndRule::At(BOTTOM_TOP)),
        bindings: vec![PresetBinding::single(
            image,
            PropertySpec::new().with(Property::YPercent, Tween::linear(-15.0, 15.0)),
        )],
    }
}

/// Section pinned at the top of the viewport while its track slides left by
/// the track's overflow.
pub fn horizontal_gallery(section: impl Into<ElementId>, track: impl Into<ElementId>) -> SectionPreset {
    SectionPreset {
        trigger: TriggerConfig::scrub(section, TOP_TOP, EndRule::PinTravel).pinned(track),
        bindings: Vec::new(),
    }
}

/// Heading whose characters rise into place once its top passes
/// `(1 - threshold)` of the viewport height.
pub fn split_text_reveal(
    element: impl Into<ElementId>,
    chars: impl IntoIterator<Item = ElementId>,
    threshold: f64,
) -> SectionPreset {
    let line = (100.0 - threshold.clamp(0.0, 1.0) * 100.0).max(0.0);
    let start = ScrollPosition::new(Anchor::Top, Anchor::Percent(line));
    SectionPreset {
        trigger: TriggerConfig::reveal(
            element,
            start,
            EndRule::Distance(1.0),
            RevealSpec {
                threshold: 0.0,
                duration_secs: 1.8,
                delay_secs: 0.0,
            },
        ),
        bindings: vec![PresetBinding {
            targets: chars.into_iter().collect(),
            spec: PropertySpec::new()
                .with(Property::YPercent, Tween::new(130.0, 0.0, Ease::OutQuint))
                .with(Property::Opacity, Tween::new(0.0, 1.0, Ease::OutQuint))
                .with(Property::RotateZ, Tween::new(2.0, 0.0, Ease::OutQuint)),
            stagger_secs: 0.5,
        }],
    }
}

/// Block that settles upward with a heavy spring once 100px of it is on screen.
pub fn fade_in_up(element: impl Into<ElementId>) -> SectionPreset {
    let element = element.into();
    SectionPreset {
        trigger: TriggerConfig::reveal(
            element.clone(),
            TOP_BOTTOM,
            EndRule::Distance(100.0),
            RevealSpec {
                threshold: 1.0,
                duration_secs: 1.2,
                delay_secs: 0.0,
            },
        ),
        bindings: vec![PresetBinding::single(
            element,
            PropertySpec::new()
                .with(Property::Opacity, Tween::new(0.0, 1.0, Ease::HEAVY_SPRING))
                .with(Property::Y, Tween::new(60.0, 0.0, Ease::HEAVY_SPRING)),
        )],
    }
}

/// Slow zoom-out and fade-in of the hero backdrop.
pub fn hero_intro(image: impl Into<ElementId>) -> SectionPreset {
    let image = image.into();
    SectionPreset {
        trigger: TriggerConfig::reveal(
            image.clone(),
            TOP_BOTTOM,
            EndRule::At(BOTTOM_TOP),
            RevealSpec {
                threshold: 0.0,
                duration_secs: 3.0,
                delay_secs: 0.0,
            },
        ),
        bindings: vec![PresetBinding::single(
            image,
            PropertySpec::new()
                .with(Property::Scale, Tween::new(1.15, 1.0, Ease::CINEMATIC))
                .with(Property::Opacity, Tween::new(0.0, 1.0, Ease::CINEMATIC)),
        )],
    }
}

/// Footer that fades, grows and drops into place over the last fifth of the
/// whole page's scroll.
///
/// `document` is the page root: its range runs from scroll 0 to the bottom
/// of the document, so progress is whole-page scroll progress.
pub fn page_footer(document: impl Into<ElementId>, footer: impl Into<ElementId>) -> SectionPreset {
    SectionPreset {
        trigger: TriggerConfig::scrub(document, TOP_TOP, EndRule::At(BOTTOM_BOTTOM)),
        bindings: vec![PresetBinding::single(
            footer,
            PropertySpec::new()
                .with(Property::Opacity, Tween::linear(0.0, 1.0).over(0.8, 1.0))
                .with(Property::Scale, Tween::linear(0.95, 1.0).over(0.8, 1.0))
                .with(Property::Y, Tween::linear(-30.0, 0.0).over(0.8, 1.0)),
        )],
    }
}

/// Header flag that switches on once the page is scrolled past
/// `threshold_px` and off again above it.
pub fn scrolled_header(
    document: impl Into<ElementId>,
    header: impl Into<ElementId>,
    threshold_px: f64,
) -> SectionPreset {
    // Starts when the document top sits `threshold_px` above the viewport top.
    let start = ScrollPosition::new(Anchor::Top, Anchor::Px(-threshold_px.max(0.0)));
    SectionPreset {
        trigger: TriggerConfig::scrub(document, start, EndRule::Distance(1.0)),
        bindings: vec![PresetBinding::single(
            header,
            PropertySpec::new().with(Property::Toggle, Tween::new(0.0, 1.0, Ease::StepStart)),
        )],
    }
}

/// One entrance per card: each rises on a soft spring once 100px of it is
/// on screen, delayed by its position in the grid.
pub fn card_entrances(cards: impl IntoIterator<Item = ElementId>) -> Vec<SectionPreset> {
    cards
        .into_iter()
        .enumerate()
        .map(|(i, card)| SectionPreset {
            trigger: TriggerConfig::reveal(
                card.clone(),
                TOP_BOTTOM,
                EndRule::Distance(100.0),
                RevealSpec {
                    threshold: 1.0,
                    duration_secs: 1.6,
                    delay_secs: i as f64 * CARD_STAGGER_SECS,
                },
            ),
            bindings: vec![PresetBinding::single(
                card,
                PropertySpec::new()
                    .with(Property::Opacity, Tween::new(0.0, 1.0, CARD_SPRING))
                    .with(Property::Y, Tween::new(100.0, 0.0, CARD_SPRING)),
            )],
        })
        .collect()
}
