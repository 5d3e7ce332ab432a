use std::path::PathBuf;

use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        NewsreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        NewsreelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        NewsreelError::encode("x")
            .to_string()
            .contains("encode failed:")
    );
    assert!(
        NewsreelError::segment_build(3, "zero duration")
            .to_string()
            .contains("segment 3 build failed")
    );
}

#[test]
fn with_segment_fills_missing_index_only() {
    let asset = PathBuf::from("audio2.wav");
    let err = NewsreelError::unreadable(&asset, "bad header").with_segment(2);
    assert_eq!(err.segment(), Some(2));
    assert!(err.to_string().contains("(segment 2)"));
    assert!(err.to_string().contains("audio2.wav"));

    let err = err.with_segment(5);
    assert_eq!(err.segment(), Some(2));

    let err = NewsreelError::empty(&asset).with_segment(4);
    assert_eq!(err.segment(), Some(4));
    assert!(matches!(err, NewsreelError::AssetEmpty { .. }));
}

#[test]
fn count_mismatch_reports_all_counts() {
    let err = NewsreelError::AssetCountMismatch {
        segments: 5,
        images: 4,
        audios: 5,
    };
    let msg = err.to_string();
    assert!(msg.contains("5 segments"));
    assert!(msg.contains("4 images"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = NewsreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
