use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::media::{AudioPcm, ProbedAudio};
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::layout::fit::FitResult;
use crate::script::model::Segment;

/// One segment's visual and audio payload, timed by its voice clip.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentClip {
    /// 1-based segment index.
    pub segment_index: u32,
    /// Clip length; equals the probed voice duration.
    pub duration_sec: f64,
    /// Size the illustration was resampled to.
    pub image_size: FitResult,
    /// Sentence shown as the caption.
    pub caption_text: String,
    /// Illustration held for the whole clip.
    pub image: PreparedImage,
    /// Voice samples played under the clip.
    pub voice: Arc<AudioPcm>,
}

/// Assembles a [`SegmentClip`] from probed and decoded assets.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentBuilder;

impl SegmentBuilder {
    /// Bind decoded assets to a segment.
    ///
    /// The clip duration is the probed audio duration, unchanged. The image must already have
    /// been resampled to `fit`.
    pub fn build(
        segment: &Segment,
        audio: &ProbedAudio,
        fit: FitResult,
        image: PreparedImage,
        voice: AudioPcm,
    ) -> NewsreelResult<SegmentClip> {
        let idx = segment.index;
        if !audio.duration_sec.is_finite() || audio.duration_sec <= 0.0 {
            return Err(NewsreelError::segment_build(
                idx,
                format!(
                    "audio duration must be finite and > 0, got {}",
                    audio.duration_sec
                ),
            ));
        }
        if fit.width == 0 || fit.height == 0 {
            return Err(NewsreelError::segment_build(
                idx,
                format!("fitted image has a zero axis: {}x{}", fit.width, fit.height),
            ));
        }
        if image.width != fit.width || image.height != fit.height {
            return Err(NewsreelError::segment_build(
                idx,
                format!(
                    "image is {}x{} but the fit is {}x{}",
                    image.width, image.height, fit.width, fit.height
                ),
            ));
        }
        if voice.channels == 0 || voice.sample_rate == 0 {
            return Err(NewsreelError::segment_build(
                idx,
                "voice pcm has zero channels or sample rate",
            ));
        }

        Ok(SegmentClip {
            segment_index: idx,
            duration_sec: audio.duration_sec,
            image_size: fit,
            caption_text: segment.sentence.clone(),
            image,
            voice: Arc::new(voice),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/builder.rs"]
mod tests;
