use std::sync::Arc;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::assets::media::AudioPcm;
use crate::assets::text::TextBlock;
use crate::caption::renderer::CaptionRenderer;
use crate::foundation::core::Rgb8;
use crate::layout::fit::FitResult;

fn clip(index: u32, duration_sec: f64) -> SegmentClip {
    SegmentClip {
        segment_index: index,
        duration_sec,
        image_size: FitResult {
            width: 1,
            height: 1,
        },
        caption_text: format!("s{index}"),
        image: PreparedImage {
            width: 1,
            height: 1,
            rgba8_premul: Arc::new(vec![0, 0, 0, 255]),
        },
        voice: Arc::new(AudioPcm {
            sample_rate: 8_000,
            channels: 1,
            interleaved_f32: vec![0.0],
        }),
    }
}

fn overlay(index: u32, duration_sec: f64) -> CaptionOverlay {
    CaptionOverlay {
        cue: CaptionRenderer::cue(index, &format!("s{index}"), duration_sec),
        width: 900.0,
        height: 360.0,
        margin: 150.0,
        text: TextBlock {
            text: format!("s{index}"),
            color: Rgb8::new(255, 255, 255),
            width: 900.0,
            height: 60.0,
            line_count: 1,
            runs: Vec::new(),
        },
    }
}

fn inputs(durations: &[f64]) -> (Vec<SegmentClip>, Vec<CaptionOverlay>) {
    let clips = durations
        .iter()
        .enumerate()
        .map(|(i, &d)| clip(i as u32 + 1, d))
        .collect();
    let overlays = durations
        .iter()
        .enumerate()
        .map(|(i, &d)| overlay(i as u32 + 1, d))
        .collect();
    (clips, overlays)
}

#[test]
fn total_is_sum_of_durations_and_starts_are_prefix_sums() {
    let (clips, overlays) = inputs(&[8.0, 10.0, 11.0, 11.0, 12.0]);
    let (content, captions) = TrackAssembler::assemble(5, clips, overlays).unwrap();

    assert_eq!(content.total_duration_sec(), 52.0);
    assert_eq!(captions.total_duration_sec(), 52.0);
    let starts: Vec<f64> = content.clips().iter().map(|c| c.start_sec).collect();
    assert_eq!(starts, vec![0.0, 8.0, 18.0, 29.0, 40.0]);
    for (a, b) in content.clips().iter().zip(captions.clips()) {
        assert_eq!(a.start_sec, b.start_sec);
        assert_eq!(a.duration_sec, b.duration_sec);
    }
}

#[test]
fn shuffled_inputs_are_ordered_by_index() {
    let (mut clips, mut overlays) = inputs(&[1.0, 2.0, 3.0]);
    clips.reverse();
    overlays.swap(0, 1);
    let (content, captions) = TrackAssembler::assemble(3, clips, overlays).unwrap();
    let order: Vec<u32> = content.clips().iter().map(|c| c.item.segment_index).collect();
    assert_eq!(order, vec![1, 2, 3]);
    let order: Vec<u32> = captions
        .clips()
        .iter()
        .map(|c| c.item.cue.segment_index)
        .collect();
    assert_eq!(order, vec![1, 2, 3]);
}

#[test]
fn count_mismatch_is_reported() {
    let (mut clips, overlays) = inputs(&[1.0, 2.0, 3.0]);
    clips.pop();
    let err = TrackAssembler::assemble(3, clips, overlays).unwrap_err();
    assert!(matches!(
        err,
        NewsreelError::AssetCountMismatch {
            segments: 3,
            images: 2,
            audios: 2
        }
    ));
}

#[test]
fn missing_caption_is_not_an_asset_mismatch() {
    let (clips, mut overlays) = inputs(&[1.0, 2.0, 3.0]);
    overlays.pop();
    let err = TrackAssembler::assemble(3, clips, overlays).unwrap_err();
    assert!(
        matches!(&err, NewsreelError::Validation(msg) if msg.contains("2 captions for 3 segments")),
        "{err}"
    );
}

#[test]
fn duplicate_or_gapped_indices_are_rejected() {
    let (mut clips, overlays) = inputs(&[1.0, 2.0, 3.0]);
    clips[2].segment_index = 2;
    assert!(matches!(
        TrackAssembler::assemble(3, clips, overlays),
        Err(NewsreelError::Validation(_))
    ));

    let (mut clips, overlays) = inputs(&[1.0, 2.0]);
    clips[1].segment_index = 5;
    assert!(TrackAssembler::assemble(2, clips, overlays).is_err());
}

#[test]
fn caption_duration_must_match_clip() {
    let (clips, mut overlays) = inputs(&[1.0, 2.0]);
    overlays[1].cue.duration_sec = 2.5;
    let err = TrackAssembler::assemble(2, clips, overlays).unwrap_err();
    assert_eq!(err.segment(), Some(2));
}

#[test]
fn clip_at_uses_half_open_intervals() {
    let (clips, overlays) = inputs(&[8.0, 10.0, 11.0]);
    let (content, _) = TrackAssembler::assemble(3, clips, overlays).unwrap();

    assert_eq!(content.index_at(0.0), Some(0));
    assert_eq!(content.index_at(7.999), Some(0));
    assert_eq!(content.index_at(8.0), Some(1));
    assert_eq!(content.index_at(28.999), Some(2));
    assert_eq!(content.index_at(29.0), None);
    assert_eq!(content.index_at(-0.1), None);
    assert_eq!(content.clip_at(18.0).map(|c| c.item.segment_index), Some(3));
    assert_eq!(content.clips()[2].end_sec(), 29.0);
}
