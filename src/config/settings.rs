use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps, PixelSize, Rgb8};
use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Environment variable overriding [`RenderConfig::workers`].
pub const WORKERS_ENV: &str = "NEWSREEL_WORKERS";

/// All tunables of one render.
///
/// Every field has a default matching the reference 1080x1920 vertical layout, so a config file
/// only needs to name the fields it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Width of the box images are fit into.
    pub content_box_width: u32,
    /// Height of the box images are fit into.
    pub content_box_height: u32,
    /// Output width in pixels (must be even).
    pub canvas_width: u32,
    /// Output height in pixels (must be even).
    pub canvas_height: u32,
    /// Canvas fill color.
    pub background_rgb: Rgb8,
    /// Output frame rate.
    pub frame_rate: u32,
    /// Channel/author label drawn at the top. Empty disables the label.
    pub channel_label: String,
    /// Font file for the title and channel labels.
    pub title_font: Option<PathBuf>,
    /// Font file for captions.
    pub content_font: Option<PathBuf>,
    /// Caption font size in pixels.
    pub caption_font_size: f32,
    /// Width of the caption-safe area.
    pub caption_width: u32,
    /// Extra spacing between caption lines in pixels.
    pub caption_line_spacing: f32,
    /// Padding above and below caption text in pixels.
    pub caption_margin: u32,
    /// Caption text color.
    pub caption_color: Rgb8,
    /// Title label font size in pixels.
    pub title_font_size: f32,
    /// Title label distance from the left edge.
    pub title_margin_x: u32,
    /// Title label distance from the top edge.
    pub title_margin_y: u32,
    /// Channel label font size in pixels.
    pub author_font_size: f32,
    /// Channel label distance from the top edge.
    pub author_margin_y: u32,
    /// Label text color.
    pub label_color: Rgb8,
    /// Label fade-in length in seconds (0 disables the fade).
    pub label_fade_in_sec: f64,
    /// Delay before labels appear, in seconds.
    pub label_start_offset_sec: f64,
    /// Segment preparation workers (1 = sequential).
    pub workers: usize,
    /// Replace an existing output file.
    pub overwrite: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            content_box_width: 1000,
            content_box_height: 800,
            canvas_width: 1080,
            canvas_height: 1920,
            background_rgb: Rgb8::new(42, 195, 8),
            frame_rate: 24,
            channel_label: String::new(),
            title_font: None,
            content_font: None,
            caption_font_size: 50.0,
            caption_width: 900,
            caption_line_spacing: 20.0,
            caption_margin: 150,
            caption_color: Rgb8::new(255, 255, 255),
            title_font_size: 64.0,
            title_margin_x: 60,
            title_margin_y: 180,
            author_font_size: 40.0,
            author_margin_y: 80,
            label_color: Rgb8::new(255, 255, 255),
            label_fade_in_sec: 0.0,
            label_start_offset_sec: 0.0,
            workers: 4,
            overwrite: true,
        }
    }
}

impl RenderConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> NewsreelResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_slice(&bytes)
    }

    /// Parse a JSON config document.
    pub fn from_json_slice(bytes: &[u8]) -> NewsreelResult<Self> {
        let cfg: Self = serde_json::from_slice(bytes)
            .map_err(|e| NewsreelError::serde(format!("invalid render config: {e}")))?;
        Ok(cfg)
    }

    /// Apply `NEWSREEL_WORKERS` when set to a positive integer.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(n) = std::env::var(WORKERS_ENV)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.workers = n;
        }
        self
    }

    /// Reject geometry and timing values the pipeline cannot honor.
    pub fn validate(&self) -> NewsreelResult<()> {
        if self.content_box_width == 0 || self.content_box_height == 0 {
            return Err(NewsreelError::validation(
                "content box width/height must be non-zero",
            ));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(NewsreelError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if !self.canvas_width.is_multiple_of(2) || !self.canvas_height.is_multiple_of(2) {
            return Err(NewsreelError::validation(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.canvas_width > u32::from(u16::MAX) || self.canvas_height > u32::from(u16::MAX) {
            return Err(NewsreelError::validation("canvas width/height exceed u16"));
        }
        if self.frame_rate == 0 {
            return Err(NewsreelError::validation("frame_rate must be non-zero"));
        }
        if self.caption_width == 0 || self.caption_width >= self.canvas_width {
            return Err(NewsreelError::validation(
                "caption_width must be non-zero and narrower than the canvas",
            ));
        }
        for (name, v) in [
            ("caption_font_size", self.caption_font_size),
            ("title_font_size", self.title_font_size),
            ("author_font_size", self.author_font_size),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(NewsreelError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.caption_line_spacing.is_finite() || self.caption_line_spacing < 0.0 {
            return Err(NewsreelError::validation(
                "caption_line_spacing must be finite and >= 0",
            ));
        }
        for (name, v) in [
            ("label_fade_in_sec", self.label_fade_in_sec),
            ("label_start_offset_sec", self.label_start_offset_sec),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(NewsreelError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if self.workers == 0 {
            return Err(NewsreelError::validation("workers must be >= 1"));
        }
        Ok(())
    }

    /// Fonts are only needed once text is drawn; checked before composing.
    pub fn validate_fonts(&self) -> NewsreelResult<()> {
        if self.content_font.is_none() {
            return Err(NewsreelError::validation(
                "content_font must be set to render captions",
            ));
        }
        if self.title_font.is_none() {
            return Err(NewsreelError::validation(
                "title_font must be set to render the title label",
            ));
        }
        Ok(())
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.canvas_width,
            height: self.canvas_height,
        }
    }

    /// Box images are fit into.
    pub fn content_box(&self) -> PixelSize {
        PixelSize::new(self.content_box_width, self.content_box_height)
    }

    /// Output frame rate.
    pub fn fps(&self) -> NewsreelResult<Fps> {
        Fps::integer(self.frame_rate)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
