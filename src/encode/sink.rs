use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Optional voice track, as raw PCM on disk.
    pub audio: Option<AudioInputConfig>,
}

/// Raw PCM audio input for sinks that mux audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Consumer of rendered frames in timeline order.
///
/// `push_frame` is called with strictly increasing `FrameIndex` values, starting at 0.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> NewsreelResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> NewsreelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> NewsreelResult<()>;
}

/// In-memory sink for tests and debugging.
///
/// Consecutive identical frames are stored once; [`InMemorySink::frame_at`] resolves any index.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<FrameRGBA>,
    index: Vec<usize>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Number of frames pushed.
    pub fn frame_count(&self) -> usize {
        self.index.len()
    }

    /// Number of distinct frame buffers kept.
    pub fn distinct_frames(&self) -> usize {
        self.frames.len()
    }

    /// Frame pushed at position `i`.
    pub fn frame_at(&self, i: usize) -> Option<&FrameRGBA> {
        self.index.get(i).and_then(|&u| self.frames.get(u))
    }

    /// `true` once `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> NewsreelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.index.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> NewsreelResult<()> {
        if self.cfg.is_none() {
            return Err(NewsreelError::validation("in-memory sink not started"));
        }
        if idx.0 != self.index.len() as u64 {
            return Err(NewsreelError::validation(format!(
                "in-memory sink expected frame {}, got {}",
                self.index.len(),
                idx.0
            )));
        }
        if self.frames.last() != Some(frame) {
            self.frames.push(frame.clone());
        }
        self.index.push(self.frames.len() - 1);
        Ok(())
    }

    fn end(&mut self) -> NewsreelResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
