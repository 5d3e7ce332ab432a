use std::path::{Path, PathBuf};

use crate::assets::media::{MIX_CHANNELS, MIX_SAMPLE_RATE};
use crate::audio::mix::{concat_voice_track, write_f32le_file};
use crate::composition::compositor::{CompositedTimeline, LayerKind};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::foundation::math::quantize_unit;
use crate::render::cpu::{CpuRasterizer, FrameState};
use crate::render::frame::FrameRGBA;
use crate::timeline::track::Track;

/// Aggregated rendering counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames that were rasterized.
    pub frames_rendered: u64,
    /// Frames reused from the previous frame.
    pub frames_elided: u64,
}

/// Result of a successful [`Renderer::render_to_file`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderOutcome {
    /// Final output path.
    pub path: PathBuf,
    /// Encoded timeline length in seconds.
    pub duration_sec: f64,
    /// Frame counters.
    pub stats: RenderStats,
}

/// What a frame at timeline time `t` shows.
pub fn frame_state(tl: &CompositedTimeline, t: f64) -> FrameState {
    FrameState {
        content: clamped_index(&tl.content, t),
        caption: clamped_index(&tl.captions, t),
        layer_alpha: tl
            .layers
            .iter()
            .map(|l| quantize_unit(l.opacity_at(t)))
            .collect(),
    }
}

// Frame times stay below the total, except for rounding at the very end.
fn clamped_index<T>(track: &Track<T>, t: f64) -> Option<usize> {
    track.index_at(t).or_else(|| {
        (t >= track.total_duration_sec() && !track.is_empty()).then(|| track.len() - 1)
    })
}

/// Rasterize every frame of `tl` into `sink`.
///
/// Emits `round(total_duration * fps)` frames (at least one). A frame whose [`FrameState`]
/// equals the previous one is not rasterized again.
#[tracing::instrument(skip_all, fields(canvas_w = tl.canvas.width, canvas_h = tl.canvas.height))]
pub fn render_timeline(
    tl: &CompositedTimeline,
    sink: &mut dyn FrameSink,
    audio: Option<AudioInputConfig>,
) -> NewsreelResult<RenderStats> {
    let frames = tl.total_frames();
    let mut raster = CpuRasterizer::new(tl.canvas)?;
    let mut stats = RenderStats::default();

    sink.begin(SinkConfig {
        width: tl.canvas.width,
        height: tl.canvas.height,
        fps: tl.fps,
        audio,
    })?;

    let mut prev: Option<(FrameState, FrameRGBA)> = None;
    for f in 0..frames {
        let state = frame_state(tl, tl.fps.frames_to_secs(f));
        match &prev {
            Some((prev_state, frame)) if *prev_state == state => {
                sink.push_frame(FrameIndex(f), frame)?;
                stats.frames_elided += 1;
            }
            _ => {
                let frame = raster.render(tl, &state)?;
                sink.push_frame(FrameIndex(f), &frame)?;
                stats.frames_rendered += 1;
                prev = Some((state, frame));
            }
        }
        stats.frames_total += 1;
    }

    sink.end()?;
    tracing::debug!(
        frames_total = stats.frames_total,
        frames_rendered = stats.frames_rendered,
        frames_elided = stats.frames_elided,
        "timeline rendered"
    );
    Ok(stats)
}

/// Options for [`Renderer::render_to_file`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderToFileOpts {
    /// Replace an existing output file.
    pub overwrite: bool,
    /// Mux the concatenated voice track.
    pub with_audio: bool,
}

impl Default for RenderToFileOpts {
    fn default() -> Self {
        Self {
            overwrite: true,
            with_audio: true,
        }
    }
}

/// Encodes composited timelines to files through `ffmpeg`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Renderer {
    opts: RenderToFileOpts,
}

impl Renderer {
    /// Renderer with the given output options.
    pub fn new(opts: RenderToFileOpts) -> Self {
        Self { opts }
    }

    /// Render `tl` to `out_path`.
    ///
    /// Encoding goes to a sibling `*.partial.*` file that is renamed into place on success and
    /// removed on failure, so `out_path` is either complete or untouched. Failures after the
    /// output checks are reported as `EncodeFailed`.
    #[tracing::instrument(skip(self, tl), fields(out = %out_path.display()))]
    pub fn render_to_file(
        &self,
        tl: &CompositedTimeline,
        out_path: &Path,
    ) -> NewsreelResult<RenderOutcome> {
        if !self.opts.overwrite && out_path.exists() {
            return Err(NewsreelError::validation(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }
        ensure_parent_dir(out_path)?;
        let partial = partial_path(out_path);

        tracing::info!(
            frames = tl.total_frames(),
            duration_sec = tl.total_duration_sec,
            "render started"
        );
        let result = self.encode_to(tl, &partial).and_then(|stats| {
            std::fs::rename(&partial, out_path).map_err(|e| {
                NewsreelError::encode(format!(
                    "failed to move '{}' into place: {e}",
                    partial.display()
                ))
            })?;
            Ok(stats)
        });

        match result {
            Ok(stats) => {
                tracing::info!(
                    frames_rendered = stats.frames_rendered,
                    frames_elided = stats.frames_elided,
                    "render finished"
                );
                Ok(RenderOutcome {
                    path: out_path.to_path_buf(),
                    duration_sec: tl.total_duration_sec,
                    stats,
                })
            }
            Err(e) => {
                let _ = std::fs::remove_file(&partial);
                Err(match e {
                    NewsreelError::EncodeFailed(_) => e,
                    other => NewsreelError::encode(other.to_string()),
                })
            }
        }
    }

    fn encode_to(&self, tl: &CompositedTimeline, partial: &Path) -> NewsreelResult<RenderStats> {
        let mut audio_tmp = TempFileGuard(None);
        let audio = if self.opts.with_audio {
            let samples = concat_voice_track(&tl.content, MIX_SAMPLE_RATE);
            let path = std::env::temp_dir().join(format!(
                "newsreel_voice_{}_{}.f32le",
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos())
                    .unwrap_or(0)
            ));
            audio_tmp.0 = Some(path.clone());
            write_f32le_file(&samples, &path)?;
            Some(AudioInputConfig {
                path,
                sample_rate: MIX_SAMPLE_RATE,
                channels: MIX_CHANNELS,
            })
        } else {
            None
        };

        let bg = tl
            .layers
            .first()
            .and_then(|l| match &l.kind {
                LayerKind::Background { color } => Some(color.to_rgba()),
                _ => None,
            })
            .unwrap_or([0, 0, 0, 255]);
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: partial.to_path_buf(),
            overwrite: true,
            bg_rgba: bg,
        });
        render_timeline(tl, &mut sink, audio)
    }
}

/// Sibling path used while encoding: `clip.mp4` becomes `clip.partial.mp4`.
pub fn partial_path(out_path: &Path) -> PathBuf {
    let stem = out_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match out_path.extension() {
        Some(ext) => format!("{stem}.partial.{}", ext.to_string_lossy()),
        None => format!("{stem}.partial"),
    };
    out_path.with_file_name(name)
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
