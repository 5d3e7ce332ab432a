//! Newsreel turns a narrated news script into a vertical short-form video.
//!
//! Each script sentence becomes one segment: its voice clip decides how long the segment lasts,
//! its illustration is fitted into a fixed content box, and the sentence is shown as a caption.
//! Segments are laid end to end, stacked over a background with title and channel labels, and
//! encoded to MP4 through `ffmpeg`.
//!
//! - Load a [`Script`] with [`load_script`]
//! - Create a [`ProductionSession`] from a [`RenderConfig`] and an [`AssetProbe`]
//! - Call [`ProductionSession::compose`] for a [`CompositedTimeline`], or
//!   [`ProductionSession::produce`] to encode it straight to a file
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod assets;
pub(crate) mod audio;
pub(crate) mod caption;
pub(crate) mod composition;
pub(crate) mod config;
pub(crate) mod encode;
pub(crate) mod layout;
pub(crate) mod render;
pub(crate) mod script;
pub(crate) mod segment;
pub(crate) mod session;
pub(crate) mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, PixelSize, Rgb8, Vec2};
pub use crate::foundation::error::{NewsreelError, NewsreelResult};

pub use crate::assets::decode::{PreparedImage, decode_image_resized};
pub use crate::assets::media::{AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE, ProbedAudio};
pub use crate::assets::probe::{AssetProbe, FsAssetProbe, ImageDims};
pub use crate::assets::text::{
    FontSet, FontSource, TextAlign, TextBlock, TextLayoutEngine, TextStyle,
};
pub use crate::audio::mix::concat_voice_track;
pub use crate::caption::renderer::{CaptionCue, CaptionOverlay, CaptionRenderer, CaptionStyle};
pub use crate::composition::compositor::{
    CompositedTimeline, Compositor, LabelRole, Layer, LayerKind, PlannedSegment, TimelinePlan,
};
pub use crate::config::settings::{RenderConfig, WORKERS_ENV};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::layout::fit::{FitResult, fit_to_box};
pub use crate::layout::position::Placement;
pub use crate::render::frame::FrameRGBA;
pub use crate::render::pipeline::{
    RenderOutcome, RenderStats, RenderToFileOpts, Renderer, render_timeline,
};
pub use crate::script::model::{AssetRef, AssetSet, Script, Segment};
pub use crate::script::schema::{ScriptDocument, ScriptEntry};
pub use crate::segment::builder::{SegmentBuilder, SegmentClip};
pub use crate::segment::prepare::{CancelToken, PrepareOpts, PreparedSegment, prepare_segments};
pub use crate::session::produce::{AssetReport, ProductionSession, load_script, probe_assets};
pub use crate::timeline::track::{TimedClip, Track, TrackAssembler, TrackItem};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
