use super::*;
use crate::test_support::system_font;

#[test]
fn cue_duration_matches_segment() {
    let cue = CaptionRenderer::cue(3, "hello there", 11.5);
    assert_eq!(cue.segment_index, 3);
    assert_eq!(cue.text, "hello there");
    assert_eq!(cue.duration_sec, 11.5);
}

#[test]
fn style_follows_config_defaults() {
    let style = CaptionStyle::from_config(&RenderConfig::default());
    assert_eq!(style.font_size, 50.0);
    assert_eq!(style.width, 900);
    assert_eq!(style.line_spacing, 20.0);
    assert_eq!(style.margin, 150);
    assert_eq!(style.color, Rgb8::new(255, 255, 255));
}

#[test]
fn overlay_pads_text_with_margin() {
    let Some(path) = system_font() else {
        eprintln!("skipping: no system font found");
        return;
    };
    let renderer = CaptionRenderer::new(
        CaptionStyle::from_config(&RenderConfig::default()),
        FontSource::load(&path).unwrap(),
    );
    let mut engine = TextLayoutEngine::new();
    let overlay = renderer
        .layout(CaptionRenderer::cue(1, "a short caption", 8.0), &mut engine)
        .unwrap();
    assert_eq!(overlay.width, 900.0);
    assert_eq!(overlay.margin, 150.0);
    assert!((overlay.height - (f64::from(overlay.text.height) + 300.0)).abs() < 1e-6);
    assert_eq!(overlay.cue.duration_sec, 8.0);

    let long = "words ".repeat(200);
    let big = renderer
        .layout(CaptionRenderer::cue(2, &long, 8.0), &mut engine)
        .unwrap();
    assert!(big.text.line_count > overlay.text.line_count);
    assert!(big.height > overlay.height);
}

#[test]
fn overlay_rejects_non_positive_duration() {
    let Some(path) = system_font() else {
        eprintln!("skipping: no system font found");
        return;
    };
    let renderer = CaptionRenderer::new(
        CaptionStyle::from_config(&RenderConfig::default()),
        FontSource::load(&path).unwrap(),
    );
    let mut engine = TextLayoutEngine::new();
    let err = renderer
        .layout(CaptionRenderer::cue(4, "x", 0.0), &mut engine)
        .unwrap_err();
    assert_eq!(err.segment(), Some(4));
}
