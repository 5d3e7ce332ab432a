use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::assets::probe::AssetProbe;
use crate::caption::renderer::{CaptionCue, CaptionRenderer};
use crate::foundation::core::PixelSize;
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::layout::fit::fit_to_box;
use crate::script::model::Segment;
use crate::segment::builder::{SegmentBuilder, SegmentClip};

/// Cooperative cancellation flag for segment preparation.
///
/// Checked before each segment starts; work already in flight finishes.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Segment preparation controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrepareOpts {
    /// Box illustrations are fit into.
    pub content_box: PixelSize,
    /// Upper bound on concurrent workers (1 = sequential).
    pub workers: usize,
}

/// A built clip plus its caption cue.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedSegment {
    /// Timed visual/audio payload.
    pub clip: SegmentClip,
    /// Caption timing for the same segment.
    pub cue: CaptionCue,
}

/// Probe, fit, decode and build every segment.
///
/// Runs on a bounded pool of `min(workers, segments)` threads when `workers > 1`. Output is
/// ordered by segment index regardless of completion order. The first failure (by segment
/// index) aborts the whole preparation.
#[tracing::instrument(skip_all, fields(segments = segments.len(), workers = opts.workers))]
pub fn prepare_segments(
    segments: &[Segment],
    probe: &dyn AssetProbe,
    opts: &PrepareOpts,
    cancel: &CancelToken,
) -> NewsreelResult<Vec<PreparedSegment>> {
    if segments.is_empty() {
        return Err(NewsreelError::validation(
            "script must contain at least one segment",
        ));
    }
    if opts.workers == 0 {
        return Err(NewsreelError::validation("workers must be >= 1"));
    }

    let workers = opts.workers.min(segments.len());
    let abort = CancelToken::new();
    let run = |seg: &Segment| {
        if cancel.is_cancelled() || abort.is_cancelled() {
            return Err(NewsreelError::Cancelled);
        }
        let res = prepare_one(seg, probe, opts.content_box);
        if res.is_err() {
            abort.cancel();
        }
        res
    };

    let results: Vec<NewsreelResult<PreparedSegment>> = if workers <= 1 {
        let mut out = Vec::with_capacity(segments.len());
        for seg in segments {
            let r = run(seg);
            let failed = r.is_err();
            out.push(r);
            if failed {
                break;
            }
        }
        out
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| {
                NewsreelError::Other(anyhow::anyhow!("failed to build prepare pool: {e}"))
            })?;
        pool.install(|| segments.par_iter().map(run).collect())
    };

    let mut prepared = Vec::with_capacity(results.len());
    let mut first_err: Option<NewsreelError> = None;
    for r in results {
        match r {
            Ok(p) => prepared.push(p),
            Err(NewsreelError::Cancelled) => {
                if first_err.is_none() {
                    first_err = Some(NewsreelError::Cancelled);
                }
            }
            Err(e) => {
                if matches!(first_err, None | Some(NewsreelError::Cancelled)) {
                    first_err = Some(e);
                }
            }
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }

    prepared.sort_by_key(|p| p.clip.segment_index);
    tracing::debug!(prepared = prepared.len(), "segments prepared");
    Ok(prepared)
}

fn prepare_one(
    seg: &Segment,
    probe: &dyn AssetProbe,
    content_box: PixelSize,
) -> NewsreelResult<PreparedSegment> {
    let idx = seg.index;
    let audio = probe
        .probe_audio(&seg.audio)
        .map_err(|e| e.with_segment(idx))?;
    let dims = probe
        .probe_image(&seg.image)
        .map_err(|e| e.with_segment(idx))?;
    let fit = fit_to_box(dims, content_box);
    tracing::debug!(
        segment = idx,
        duration_sec = audio.duration_sec,
        native_w = dims.width,
        native_h = dims.height,
        fit_w = fit.width,
        fit_h = fit.height,
        "segment probed"
    );

    let image = probe
        .decode_image(&seg.image, fit.size())
        .map_err(|e| e.with_segment(idx))?;
    let voice = probe
        .decode_audio(&seg.audio)
        .map_err(|e| e.with_segment(idx))?;

    let clip = SegmentBuilder::build(seg, &audio, fit, image, voice)?;
    let cue = CaptionRenderer::cue(idx, &seg.sentence, clip.duration_sec);
    Ok(PreparedSegment { clip, cue })
}

#[cfg(test)]
#[path = "../../tests/unit/segment/prepare.rs"]
mod tests;
