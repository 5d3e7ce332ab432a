use super::*;
use crate::test_support::{scratch_dir, write_wav};

#[test]
fn probe_wav_reports_duration_from_header() {
    let dir = scratch_dir("media_probe_wav");
    let path = dir.join("audio1.wav");
    write_wav(&path, 24_000, 1, 24_000 * 3, 1000);

    let probed = probe_wav(&path).unwrap();
    assert_eq!(probed.sample_rate, 24_000);
    assert_eq!(probed.channels, 1);
    assert!((probed.duration_sec - 3.0).abs() < 1e-9);
}

#[test]
fn probe_wav_rejects_zero_length_clip() {
    let dir = scratch_dir("media_probe_empty");
    let path = dir.join("audio1.wav");
    write_wav(&path, 24_000, 1, 0, 0);

    let err = probe_wav(&path).unwrap_err();
    assert!(matches!(err, NewsreelError::AssetEmpty { .. }), "{err}");
}

#[test]
fn probe_wav_reports_unreadable_for_missing_or_garbage_files() {
    let dir = scratch_dir("media_probe_bad");
    let missing = dir.join("nope.wav");
    assert!(matches!(
        probe_wav(&missing),
        Err(NewsreelError::AssetUnreadable { .. })
    ));

    let garbage = dir.join("garbage.wav");
    std::fs::write(&garbage, b"not a riff file").unwrap();
    let err = probe_wav(&garbage).unwrap_err();
    match err {
        NewsreelError::AssetUnreadable { asset, .. } => assert!(asset.ends_with("garbage.wav")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn decode_wav_normalizes_int_samples() {
    let dir = scratch_dir("media_decode_wav");
    let path = dir.join("audio1.wav");
    write_wav(&path, 8_000, 2, 100, 16_384);

    let pcm = decode_wav(&path).unwrap();
    assert_eq!(pcm.sample_rate, 8_000);
    assert_eq!(pcm.channels, 2);
    assert_eq!(pcm.frames(), 100);
    assert!((pcm.duration_sec() - 0.0125).abs() < 1e-9);
    assert!(pcm.interleaved_f32.iter().all(|&s| (s - 0.5).abs() < 1e-6));
}

#[test]
fn audio_file_dispatch_uses_extension() {
    assert!(is_wav(Path::new("a/audio1.WAV")));
    assert!(!is_wav(Path::new("a/audio1.mp3")));

    #[cfg(not(feature = "media-ffmpeg"))]
    assert!(matches!(
        probe_audio_file(Path::new("a/audio1.mp3")),
        Err(NewsreelError::AssetUnreadable { .. })
    ));
}
