use crate::caption::renderer::CaptionOverlay;
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::segment::builder::SegmentClip;

/// Anything that occupies one segment's slot on a track.
pub trait TrackItem {
    /// 1-based segment index.
    fn segment_index(&self) -> u32;
    /// Slot length in seconds.
    fn duration_sec(&self) -> f64;
}

impl TrackItem for SegmentClip {
    fn segment_index(&self) -> u32 {
        self.segment_index
    }

    fn duration_sec(&self) -> f64 {
        self.duration_sec
    }
}

impl TrackItem for CaptionOverlay {
    fn segment_index(&self) -> u32 {
        self.cue.segment_index
    }

    fn duration_sec(&self) -> f64 {
        self.cue.duration_sec
    }
}

/// An item placed at an absolute time on a track.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedClip<T> {
    /// Start time in seconds.
    pub start_sec: f64,
    /// Length in seconds.
    pub duration_sec: f64,
    /// Payload.
    pub item: T,
}

impl<T> TimedClip<T> {
    /// Exclusive end time.
    pub fn end_sec(&self) -> f64 {
        self.start_sec + self.duration_sec
    }
}

/// Items laid end to end with no gaps or overlaps.
#[derive(Clone, Debug, PartialEq)]
pub struct Track<T> {
    clips: Vec<TimedClip<T>>,
    total_duration_sec: f64,
}

impl<T: TrackItem> Track<T> {
    /// Concatenate items in the given order; starts are the running sum of durations.
    pub fn concat(items: Vec<T>) -> Self {
        let mut start = 0.0f64;
        let clips = items
            .into_iter()
            .map(|item| {
                let duration_sec = item.duration_sec();
                let clip = TimedClip {
                    start_sec: start,
                    duration_sec,
                    item,
                };
                start += duration_sec;
                clip
            })
            .collect();
        Self {
            clips,
            total_duration_sec: start,
        }
    }
}

impl<T> Track<T> {
    /// Clips in time order.
    pub fn clips(&self) -> &[TimedClip<T>] {
        &self.clips
    }

    /// Sum of clip durations.
    pub fn total_duration_sec(&self) -> f64 {
        self.total_duration_sec
    }

    /// Number of clips.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// `true` for a track with no clips.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Position of the clip covering `t` (`start <= t < end`).
    pub fn index_at(&self, t: f64) -> Option<usize> {
        if !(0.0..self.total_duration_sec).contains(&t) {
            return None;
        }
        let i = self.clips.partition_point(|c| c.start_sec <= t);
        i.checked_sub(1)
    }

    /// Clip covering `t`, if any.
    pub fn clip_at(&self, t: f64) -> Option<&TimedClip<T>> {
        self.index_at(t).map(|i| &self.clips[i])
    }
}

/// Joins prepared segments and caption overlays into two aligned tracks.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrackAssembler;

impl TrackAssembler {
    /// Order both inputs by segment index and concatenate them.
    ///
    /// Both lists must hold exactly one entry per segment `1..=segment_count`, and each caption
    /// must last exactly as long as its clip.
    #[tracing::instrument(skip(clips, overlays))]
    pub fn assemble(
        segment_count: usize,
        mut clips: Vec<SegmentClip>,
        mut overlays: Vec<CaptionOverlay>,
    ) -> NewsreelResult<(Track<SegmentClip>, Track<CaptionOverlay>)> {
        // Each clip carries one image and one voice clip.
        if clips.len() != segment_count {
            return Err(NewsreelError::AssetCountMismatch {
                segments: segment_count,
                images: clips.len(),
                audios: clips.len(),
            });
        }
        if overlays.len() != segment_count {
            return Err(NewsreelError::validation(format!(
                "{} captions for {segment_count} segments",
                overlays.len()
            )));
        }
        if segment_count == 0 {
            return Err(NewsreelError::validation(
                "cannot assemble a timeline with no segments",
            ));
        }

        clips.sort_by_key(|c| c.segment_index);
        overlays.sort_by_key(|o| o.cue.segment_index);
        check_contiguous(&clips)?;
        check_contiguous(&overlays)?;

        for (clip, overlay) in clips.iter().zip(&overlays) {
            if clip.duration_sec != overlay.cue.duration_sec {
                return Err(NewsreelError::segment_build(
                    clip.segment_index,
                    format!(
                        "caption lasts {}s but the clip lasts {}s",
                        overlay.cue.duration_sec, clip.duration_sec
                    ),
                ));
            }
        }

        let content = Track::concat(clips);
        let captions = Track::concat(overlays);
        tracing::debug!(
            clips = content.len(),
            total_sec = content.total_duration_sec(),
            "tracks assembled"
        );
        Ok((content, captions))
    }
}

fn check_contiguous<T: TrackItem>(items: &[T]) -> NewsreelResult<()> {
    for (pos, item) in items.iter().enumerate() {
        let expected = pos as u64 + 1;
        if u64::from(item.segment_index()) != expected {
            return Err(NewsreelError::validation(format!(
                "segment indices must be unique and contiguous from 1: expected {expected}, got {}",
                item.segment_index()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/track.rs"]
mod tests;
