use super::*;

#[test]
fn defaults_match_reference_layout() {
    let cfg = RenderConfig::default();
    assert_eq!(cfg.canvas(), Canvas { width: 1080, height: 1920 });
    assert_eq!(cfg.content_box(), PixelSize::new(1000, 800));
    assert_eq!(cfg.background_rgb, Rgb8::new(42, 195, 8));
    assert_eq!(cfg.fps().unwrap(), Fps::integer(24).unwrap());
    cfg.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg =
        RenderConfig::from_json_slice(br#"{"frame_rate": 30, "channel_label": "Daily"}"#).unwrap();
    assert_eq!(cfg.frame_rate, 30);
    assert_eq!(cfg.channel_label, "Daily");
    assert_eq!(cfg.canvas_width, 1080);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = RenderConfig::from_json_slice(br#"{"fps": 30}"#).unwrap_err();
    assert!(matches!(err, NewsreelError::Serde(_)));
}

#[test]
fn validation_catches_bad_values() {
    let odd = RenderConfig {
        canvas_width: 1081,
        ..RenderConfig::default()
    };
    assert!(odd.validate().is_err());

    let no_fps = RenderConfig {
        frame_rate: 0,
        ..RenderConfig::default()
    };
    assert!(no_fps.validate().is_err());

    let wide_caption = RenderConfig {
        caption_width: 1080,
        ..RenderConfig::default()
    };
    assert!(wide_caption.validate().is_err());

    let empty_box = RenderConfig {
        content_box_height: 0,
        ..RenderConfig::default()
    };
    assert!(empty_box.validate().is_err());

    let negative_fade = RenderConfig {
        label_fade_in_sec: -1.0,
        ..RenderConfig::default()
    };
    assert!(negative_fade.validate().is_err());
}

#[test]
fn fonts_are_required_for_text() {
    let cfg = RenderConfig::default();
    assert!(cfg.validate_fonts().is_err());

    let cfg = RenderConfig {
        title_font: Some("fonts/title.ttf".into()),
        content_font: Some("fonts/body.ttf".into()),
        ..RenderConfig::default()
    };
    cfg.validate_fonts().unwrap();
}
