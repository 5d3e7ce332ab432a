use crate::assets::text::{FontSet, TextAlign, TextBlock, TextLayoutEngine, TextStyle};
use crate::caption::renderer::CaptionOverlay;
use crate::config::settings::RenderConfig;
use crate::foundation::core::{Canvas, Fps, Rgb8};
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::layout::position::Placement;
use crate::segment::builder::SegmentClip;
use crate::timeline::track::Track;

/// Which static label a layer draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelRole {
    /// Video title.
    Title,
    /// Channel/author name.
    Author,
}

/// What a layer draws.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    /// Solid canvas fill.
    Background {
        /// Fill color.
        color: Rgb8,
    },
    /// The content track; each clip's illustration.
    Content,
    /// The caption track; each clip's overlay.
    Captions,
    /// A static text label.
    Label {
        /// Which label.
        role: LabelRole,
        /// Laid-out text.
        text: TextBlock,
    },
}

/// One entry of the bottom-to-top layer stack.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Layer {
    /// Stable layer name.
    pub name: String,
    /// Layer contents.
    pub kind: LayerKind,
    /// Anchor on the canvas.
    pub placement: Placement,
    /// Time the layer first becomes visible.
    pub start_offset_sec: f64,
    /// Visible length after `start_offset_sec`.
    pub duration_sec: f64,
    /// Linear fade-in length; `0` shows the layer at full opacity immediately.
    pub fade_in_sec: f64,
}

impl Layer {
    /// Layer opacity at timeline time `t`.
    pub fn opacity_at(&self, t: f64) -> f32 {
        let local = t - self.start_offset_sec;
        if local < 0.0 || local >= self.duration_sec {
            return 0.0;
        }
        if self.fade_in_sec > 0.0 {
            (local / self.fade_in_sec).clamp(0.0, 1.0) as f32
        } else {
            1.0
        }
    }
}

/// Fully resolved layer stack plus the tracks it references.
#[derive(Clone, Debug)]
pub struct CompositedTimeline {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Timeline length; equals the sum of segment durations.
    pub total_duration_sec: f64,
    /// Layers, bottom first.
    pub layers: Vec<Layer>,
    /// Content track.
    pub content: Track<SegmentClip>,
    /// Caption track.
    pub captions: Track<CaptionOverlay>,
    /// Fonts referenced by label and caption layers.
    pub fonts: FontSet,
}

/// Serializable summary of a [`CompositedTimeline`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelinePlan {
    /// Output canvas.
    pub canvas: Canvas,
    /// Frames per second.
    pub fps: f64,
    /// Timeline length in seconds.
    pub total_duration_sec: f64,
    /// Frames the renderer will emit.
    pub total_frames: u64,
    /// Layers, bottom first.
    pub layers: Vec<Layer>,
    /// Per-segment placement.
    pub segments: Vec<PlannedSegment>,
}

/// Placement of one segment in a [`TimelinePlan`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlannedSegment {
    /// 1-based segment index.
    pub index: u32,
    /// Start time in seconds.
    pub start_sec: f64,
    /// Length in seconds.
    pub duration_sec: f64,
    /// Fitted illustration width.
    pub image_width: u32,
    /// Fitted illustration height.
    pub image_height: u32,
    /// Illustration top-left on the canvas.
    pub image_origin: [f64; 2],
    /// Caption box top-left on the canvas.
    pub caption_origin: [f64; 2],
    /// Wrapped caption line count.
    pub caption_lines: usize,
    /// Caption text.
    pub caption: String,
}

impl CompositedTimeline {
    /// Number of frames covering the timeline at its frame rate (at least one).
    pub fn total_frames(&self) -> u64 {
        self.fps.secs_to_frames_round(self.total_duration_sec).max(1)
    }

    /// Placement of the content layer.
    pub fn content_placement(&self) -> Placement {
        self.placement_of(|k| matches!(k, LayerKind::Content))
            .unwrap_or(Placement::Center)
    }

    /// Placement of the caption layer.
    pub fn caption_placement(&self) -> Placement {
        self.placement_of(|k| matches!(k, LayerKind::Captions))
            .unwrap_or(Placement::BottomCenter { margin: 0.0 })
    }

    fn placement_of(&self, pred: impl Fn(&LayerKind) -> bool) -> Option<Placement> {
        self.layers
            .iter()
            .find(|l| pred(&l.kind))
            .map(|l| l.placement)
    }

    /// Summarize for inspection.
    pub fn plan(&self) -> TimelinePlan {
        let content_at = self.content_placement();
        let caption_at = self.caption_placement();
        let segments = self
            .content
            .clips()
            .iter()
            .zip(self.captions.clips())
            .map(|(c, o)| {
                let img = content_at.resolve(
                    self.canvas,
                    f64::from(c.item.image_size.width),
                    f64::from(c.item.image_size.height),
                );
                let cap = caption_at.resolve(self.canvas, o.item.width, o.item.height);
                PlannedSegment {
                    index: c.item.segment_index,
                    start_sec: c.start_sec,
                    duration_sec: c.duration_sec,
                    image_width: c.item.image_size.width,
                    image_height: c.item.image_size.height,
                    image_origin: [img.x, img.y],
                    caption_origin: [cap.x, cap.y],
                    caption_lines: o.item.text.line_count,
                    caption: o.item.cue.text.clone(),
                }
            })
            .collect();
        TimelinePlan {
            canvas: self.canvas,
            fps: self.fps.as_f64(),
            total_duration_sec: self.total_duration_sec,
            total_frames: self.total_frames(),
            layers: self.layers.clone(),
            segments,
        }
    }
}

/// Stacks tracks, background and labels into a [`CompositedTimeline`].
pub struct Compositor {
    config: RenderConfig,
    fonts: FontSet,
}

impl Compositor {
    /// Compositor for one render configuration.
    pub fn new(config: RenderConfig, fonts: FontSet) -> NewsreelResult<Self> {
        config.validate()?;
        Ok(Self { config, fonts })
    }

    /// Build the layer stack: background, content, captions, author label, title label.
    #[tracing::instrument(skip_all, fields(title = title, clips = content.len()))]
    pub fn compose(
        &self,
        title: &str,
        content: Track<SegmentClip>,
        captions: Track<CaptionOverlay>,
        engine: &mut TextLayoutEngine,
    ) -> NewsreelResult<CompositedTimeline> {
        let cfg = &self.config;
        if content.is_empty() {
            return Err(NewsreelError::validation("content track is empty"));
        }
        if content.len() != captions.len()
            || content.total_duration_sec() != captions.total_duration_sec()
        {
            return Err(NewsreelError::validation(
                "content and caption tracks must cover the same segments",
            ));
        }
        let total = content.total_duration_sec();
        if !total.is_finite() || total <= 0.0 {
            return Err(NewsreelError::validation(format!(
                "timeline duration must be > 0, got {total}"
            )));
        }
        if !cfg.label_fade_in_sec.is_finite()
            || cfg.label_fade_in_sec < 0.0
            || !cfg.label_start_offset_sec.is_finite()
            || cfg.label_start_offset_sec < 0.0
        {
            return Err(NewsreelError::validation(
                "label fade-in and start offset must be finite and >= 0",
            ));
        }

        let canvas = cfg.canvas();
        let fps = cfg.fps()?;
        let full = |name: &str, kind: LayerKind, placement: Placement| Layer {
            name: name.to_string(),
            kind,
            placement,
            start_offset_sec: 0.0,
            duration_sec: total,
            fade_in_sec: 0.0,
        };

        let mut layers = vec![
            full(
                "background",
                LayerKind::Background {
                    color: cfg.background_rgb,
                },
                Placement::Fill,
            ),
            full("content", LayerKind::Content, Placement::Center),
            full(
                "captions",
                LayerKind::Captions,
                Placement::BottomCenter { margin: 0.0 },
            ),
        ];

        let label = |role: LabelRole, text: TextBlock, placement: Placement| Layer {
            name: match role {
                LabelRole::Title => "title".to_string(),
                LabelRole::Author => "author".to_string(),
            },
            kind: LayerKind::Label { role, text },
            placement,
            start_offset_sec: cfg.label_start_offset_sec,
            duration_sec: (total - cfg.label_start_offset_sec).max(0.0),
            fade_in_sec: cfg.label_fade_in_sec,
        };

        let author = cfg.channel_label.trim();
        if !author.is_empty() {
            let text = engine.layout(
                author,
                &self.fonts.title,
                TextStyle {
                    size_px: cfg.author_font_size,
                    color: cfg.label_color,
                    max_width_px: None,
                    align: TextAlign::Start,
                    line_spacing_px: 0.0,
                },
            )?;
            layers.push(label(
                LabelRole::Author,
                text,
                Placement::TopCenter {
                    margin: f64::from(cfg.author_margin_y),
                },
            ));
        }

        let title_width = canvas
            .width
            .saturating_sub(cfg.title_margin_x.saturating_mul(2))
            .max(1) as f32;
        let text = engine.layout(
            title,
            &self.fonts.title,
            TextStyle {
                size_px: cfg.title_font_size,
                color: cfg.label_color,
                max_width_px: Some(title_width),
                align: TextAlign::Start,
                line_spacing_px: 0.0,
            },
        )?;
        layers.push(label(
            LabelRole::Title,
            text,
            Placement::TopLeft {
                margin_x: f64::from(cfg.title_margin_x),
                margin_y: f64::from(cfg.title_margin_y),
            },
        ));

        warn_on_caption_overlap(canvas, cfg, &captions);

        tracing::info!(
            layers = layers.len(),
            total_sec = total,
            "timeline composed"
        );
        Ok(CompositedTimeline {
            canvas,
            fps,
            total_duration_sec: total,
            layers,
            content,
            captions,
            fonts: self.fonts.clone(),
        })
    }
}

fn warn_on_caption_overlap(canvas: Canvas, cfg: &RenderConfig, captions: &Track<CaptionOverlay>) {
    let content_bottom = Placement::Center
        .resolve(
            canvas,
            f64::from(cfg.content_box_width),
            f64::from(cfg.content_box_height),
        )
        .y
        + f64::from(cfg.content_box_height);
    for clip in captions.clips() {
        let o = &clip.item;
        let top = Placement::BottomCenter { margin: 0.0 }
            .resolve(canvas, o.width, o.height)
            .y
            + o.margin;
        if top < content_bottom {
            tracing::warn!(
                segment = o.cue.segment_index,
                lines = o.text.line_count,
                "caption text overlaps the content box"
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/compositor.rs"]
mod tests;
