use super::*;
use crate::scroll::property::Property;

const SCENE: &str = r#"{
  "viewport": { "width": 1000, "height": 800 },
  "elements": [
    { "id": "frame", "rect": { "x": 0, "y": 1200, "width": 600, "height": 600 } },
    { "id": "img", "rect": { "x": 0, "y": 1110, "width": 600, "height": 780 } },
    { "id": "gallery", "rect": { "x": 0, "y": 3000, "width": 1000, "height": 800 } },
    { "id": "track", "rect": { "x": 0, "y": 3000, "width": 1000, "height": 800 }, "content_width": 3000 }
  ],
  "sections": [
    { "type": "parallax", "container": "frame", "image": "img" },
    { "type": "gallery", "section": "gallery", "track": "track" }
  ]
}"#;

#[test]
fn parses_and_mounts() {
    let scene = Scene::from_json(SCENE).unwrap();
    assert_eq!(scene.elements.len(), 4);
    assert_eq!(scene.config, OrchestratorConfig::default());

    let mut mounted = scene.mount().unwrap();
    assert_eq!(mounted.handles.len(), 2);
    let report = mounted.scroll_to(1100.0, 0.0);
    assert!(report.refreshed);
    assert_eq!(report.sampled, 2);
    assert_eq!(mounted.page.style("img", Property::YPercent), Some(0.0));
}

#[test]
fn gallery_section_pins_mid_range() {
    let mut mounted = Scene::from_json(SCENE).unwrap().mount().unwrap();
    // Gallery range is [3000, 3000 + 800 + 2000].
    mounted.scroll_to(3000.0 + 1400.0, 0.0);
    assert!(mounted.page.is_pinned("gallery"));
    assert_eq!(mounted.page.style("track", Property::X), Some(-1000.0));
}

#[test]
fn split_text_threshold_defaults() {
    let section: SectionSpec =
        serde_json::from_str(r#"{ "type": "split_text", "element": "title", "chars": ["a", "b"] }"#)
            .unwrap();
    let SectionSpec::SplitText { threshold, .. } = &section else {
        panic!("expected split_text");
    };
    assert_eq!(*threshold, 0.1);
    assert_eq!(section.to_presets()[0].trigger.start.to_string(), "top 90%");
}

#[test]
fn rejects_duplicate_ids() {
    let json = r#"{
      "viewport": { "width": 1000, "height": 800 },
      "elements": [
        { "id": "a", "rect": { "x": 0, "y": 0, "width": 10, "height": 10 } },
        { "id": "a", "rect": { "x": 0, "y": 0, "width": 10, "height": 10 } }
      ]
    }"#;
    let err = Scene::from_json(json).unwrap_err();
    assert!(matches!(err, ScrollError::Scene(_)));
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn rejects_undeclared_section_element() {
    let json = r#"{
      "viewport": { "width": 1000, "height": 800 },
      "elements": [
        { "id": "frame", "rect": { "x": 0, "y": 0, "width": 10, "height": 10 } }
      ],
      "sections": [ { "type": "parallax", "container": "frame", "image": "missing" } ]
    }"#;
    let err = Scene::from_json(json).unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn rejects_empty_viewport() {
    let json = r#"{ "viewport": { "width": 0, "height": 800 }, "elements": [] }"#;
    assert!(matches!(
        Scene::from_json(json).unwrap_err(),
        ScrollError::Scene(_)
    ));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        Scene::from_json("{ not json").unwrap_err(),
        ScrollError::Serde(_)
    ));
}

#[test]
fn custom_section_round_trips_through_json() {
    let preset = presets::fade_in_up("card");
    let section = SectionSpec::Custom(preset.clone());
    let json = serde_json::to_string(&section).unwrap();
    let back: SectionSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(back.to_presets(), vec![preset]);
}

const CHROME: &str = r#"{
  "viewport": { "width": 1000, "height": 800 },
  "elements": [
    { "id": "page", "rect": { "x": 0, "y": 0, "width": 1000, "height": 4800 } },
    { "id": "header", "rect": { "x": 0, "y": 0, "width": 1000, "height": 96 } },
    { "id": "card-0", "rect": { "x": 0, "y": 1200, "width": 300, "height": 400 } },
    { "id": "card-1", "rect": { "x": 350, "y": 1200, "width": 300, "height": 400 } },
    { "id": "card-2", "rect": { "x": 700, "y": 1200, "width": 300, "height": 400 } },
    { "id": "footer", "rect": { "x": 0, "y": 4400, "width": 1000, "height": 400 } }
  ],
  "sections": [
    { "type": "scrolled_header", "document": "page", "header": "header" },
    { "type": "card_grid", "cards": ["card-0", "card-1", "card-2"] },
    { "type": "page_footer", "document": "page", "footer": "footer" }
  ]
}"#;

#[test]
fn card_grid_mounts_one_trigger_per_card() {
    let scene = Scene::from_json(CHROME).unwrap();
    let SectionSpec::ScrolledHeader { threshold_px, .. } = &scene.sections[0] else {
        panic!("expected scrolled_header");
    };
    assert_eq!(*threshold_px, 50.0);
    assert_eq!(scene.sections[1].to_presets().len(), 3);
    let mounted = scene.mount().unwrap();
    assert_eq!(mounted.handles.len(), 5);
}

#[test]
fn header_flag_flips_just_past_fifty_pixels() {
    let mut m = Scene::from_json(CHROME).unwrap().mount().unwrap();
    m.scroll_to(0.0, 0.0);
    assert_eq!(m.page.style("header", Property::Toggle), Some(0.0));
    m.scroll_to(50.0, 0.1);
    assert_eq!(m.page.style("header", Property::Toggle), Some(0.0));
    m.scroll_to(51.0, 0.2);
    assert_eq!(m.page.style("header", Property::Toggle), Some(1.0));
    m.scroll_to(2000.0, 0.3);
    assert_eq!(m.page.style("header", Property::Toggle), Some(1.0));
    m.scroll_to(10.0, 0.4);
    assert_eq!(m.page.style("header", Property::Toggle), Some(0.0));
}

#[test]
fn footer_waits_for_the_last_fifth_of_the_page() {
    let mut m = Scene::from_json(CHROME).unwrap().mount().unwrap();
    // Page progress runs over [0, 4800 - 800].
    m.scroll_to(3200.0, 0.0);
    assert_eq!(m.page.style("footer", Property::Opacity), Some(0.0));
    assert_eq!(m.page.style("footer", Property::Scale), Some(0.95));
    assert_eq!(m.page.style("footer", Property::Y), Some(-30.0));

    m.scroll_to(3600.0, 0.1);
    let opacity = m.page.style("footer", Property::Opacity).unwrap();
    let y = m.page.style("footer", Property::Y).unwrap();
    assert!((opacity - 0.5).abs() < 1e-9, "opacity {opacity}");
    assert!((y + 15.0).abs() < 1e-9, "y {y}");

    m.scroll_to(4000.0, 0.2);
    assert_eq!(m.page.style("footer", Property::Opacity), Some(1.0));
    assert_eq!(m.page.style("footer", Property::Scale), Some(1.0));
    assert_eq!(m.page.style("footer", Property::Y), Some(0.0));

    m.scroll_to(3200.0, 0.3);
    assert_eq!(m.page.style("footer", Property::Opacity), Some(0.0));
}

#[test]
fn cards_enter_in_order_after_a_shared_latch() {
    let mut m = Scene::from_json(CHROME).unwrap().mount().unwrap();
    // Cards latch once 100px of them is on screen: scroll 500.
    m.scroll_to(450.0, 0.0);
    assert_eq!(m.page.style("card-0", Property::Opacity), Some(0.0));
    m.scroll_to(500.0, 1.0);
    m.scroll_to(500.0, 1.4);
    let first = m.page.style("card-0", Property::Opacity).unwrap();
    let last = m.page.style("card-2", Property::Opacity).unwrap();
    assert!(first > last, "card-0 {first} should lead card-2 {last}");

    m.scroll_to(500.0, 5.0);
    for card in ["card-0", "card-1", "card-2"] {
        assert_eq!(m.page.style(card, Property::Opacity), Some(1.0));
        assert_eq!(m.page.style(card, Property::Y), Some(0.0));
    }
}
