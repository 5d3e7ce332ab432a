use super::*;
use crate::assets::text::FontSource;
use crate::test_support::{fake_timeline, system_font};

const CANVAS: Canvas = Canvas {
    width: 1080,
    height: 1920,
};

fn label_layer(start: f64, duration: f64, fade: f64) -> Layer {
    Layer {
        name: "title".to_string(),
        kind: LayerKind::Content,
        placement: Placement::Fill,
        start_offset_sec: start,
        duration_sec: duration,
        fade_in_sec: fade,
    }
}

#[test]
fn opacity_follows_offset_and_fade() {
    let plain = label_layer(0.0, 10.0, 0.0);
    assert_eq!(plain.opacity_at(0.0), 1.0);
    assert_eq!(plain.opacity_at(9.99), 1.0);
    assert_eq!(plain.opacity_at(10.0), 0.0);

    let faded = label_layer(1.0, 9.0, 2.0);
    assert_eq!(faded.opacity_at(0.5), 0.0);
    assert_eq!(faded.opacity_at(1.0), 0.0);
    assert!((faded.opacity_at(2.0) - 0.5).abs() < 1e-6);
    assert_eq!(faded.opacity_at(3.0), 1.0);
}

#[test]
fn five_segment_timeline_has_1248_frames_at_24fps() {
    let tl = fake_timeline(&[8.0, 10.0, 11.0, 11.0, 12.0], CANVAS, 24);
    assert_eq!(tl.total_duration_sec, 52.0);
    assert_eq!(tl.total_frames(), 1248);
}

#[test]
fn plan_reports_centered_content_and_bottom_captions() {
    let tl = fake_timeline(&[2.0, 3.0], CANVAS, 24);
    let plan = tl.plan();
    assert_eq!(plan.total_frames, 120);
    assert_eq!(plan.segments.len(), 2);

    let first = &plan.segments[0];
    assert_eq!((first.image_width, first.image_height), (1000, 750));
    assert_eq!(first.image_origin, [40.0, 585.0]);
    assert_eq!(first.caption_origin, [90.0, 1920.0 - 360.0]);
    assert_eq!(plan.segments[1].start_sec, 2.0);

    let names: Vec<&str> = plan.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["background", "content", "captions"]);
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["layers"][0]["kind"]["type"], "background");
}

#[test]
fn compose_stacks_layers_in_fixed_order() {
    let Some(path) = system_font() else {
        eprintln!("skipping: no system font found");
        return;
    };
    let font = FontSource::load(&path).unwrap();
    let fonts = FontSet {
        title: font.clone(),
        caption: font,
    };
    let cfg = RenderConfig {
        channel_label: "Daily Brief".to_string(),
        label_fade_in_sec: 0.5,
        ..RenderConfig::default()
    };
    let base = fake_timeline(&[2.0, 3.0], CANVAS, 24);
    let compositor = Compositor::new(cfg, fonts.clone()).unwrap();
    let mut engine = TextLayoutEngine::new();

    let tl = compositor
        .compose(
            "Headline",
            base.content.clone(),
            base.captions.clone(),
            &mut engine,
        )
        .unwrap();
    let names: Vec<&str> = tl.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["background", "content", "captions", "author", "title"]
    );
    assert_eq!(tl.total_duration_sec, 5.0);
    let title = tl.layers.last().unwrap();
    assert_eq!(title.fade_in_sec, 0.5);
    assert_eq!(title.duration_sec, 5.0);
    assert_eq!(
        title.placement,
        Placement::TopLeft {
            margin_x: 60.0,
            margin_y: 180.0
        }
    );

    let quiet = Compositor::new(RenderConfig::default(), fonts).unwrap();
    let tl = quiet
        .compose("Headline", base.content, base.captions, &mut engine)
        .unwrap();
    assert!(tl.layers.iter().all(|l| l.name != "author"));
}

#[test]
fn compose_rejects_mismatched_tracks() {
    let font = FontSource::from_bytes("unused.ttf", vec![0]);
    let fonts = FontSet {
        title: font.clone(),
        caption: font,
    };
    let a = fake_timeline(&[2.0, 3.0], CANVAS, 24);
    let b = fake_timeline(&[2.0], CANVAS, 24);
    let compositor = Compositor::new(RenderConfig::default(), fonts).unwrap();
    let err = compositor
        .compose("t", a.content, b.captions, &mut TextLayoutEngine::new())
        .unwrap_err();
    assert!(matches!(err, NewsreelError::Validation(_)));
}
