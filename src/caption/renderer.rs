use crate::assets::text::{FontSource, TextAlign, TextBlock, TextLayoutEngine, TextStyle};
use crate::config::settings::RenderConfig;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Timing-only caption record for one segment.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CaptionCue {
    /// 1-based segment index.
    pub segment_index: u32,
    /// Caption text (the segment sentence).
    pub text: String,
    /// Display length; equals the segment duration.
    pub duration_sec: f64,
}

/// Caption visuals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Wrap width of the caption-safe area.
    pub width: u32,
    /// Extra spacing between lines.
    pub line_spacing: f32,
    /// Padding above and below the text.
    pub margin: u32,
    /// Text color.
    pub color: Rgb8,
}

impl CaptionStyle {
    /// Caption style from a render configuration.
    pub fn from_config(cfg: &RenderConfig) -> Self {
        Self {
            font_size: cfg.caption_font_size,
            width: cfg.caption_width,
            line_spacing: cfg.caption_line_spacing,
            margin: cfg.caption_margin,
            color: cfg.caption_color,
        }
    }
}

/// Laid-out caption box; text is centered inside and padded by the style margin.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CaptionOverlay {
    /// Timing source.
    pub cue: CaptionCue,
    /// Box width (the caption-safe width).
    pub width: f64,
    /// Box height: text height plus top and bottom margin.
    pub height: f64,
    /// Top padding before the first line.
    pub margin: f64,
    /// Wrapped text.
    pub text: TextBlock,
}

/// Builds caption cues and lays them out with the caption font.
pub struct CaptionRenderer {
    style: CaptionStyle,
    font: FontSource,
}

impl CaptionRenderer {
    /// Renderer drawing with `font` in `style`.
    pub fn new(style: CaptionStyle, font: FontSource) -> Self {
        Self { style, font }
    }

    /// Caption font.
    pub fn font(&self) -> &FontSource {
        &self.font
    }

    /// Timing record for a segment. The cue lasts exactly `duration_sec`.
    pub fn cue(segment_index: u32, text: &str, duration_sec: f64) -> CaptionCue {
        CaptionCue {
            segment_index,
            text: text.to_string(),
            duration_sec,
        }
    }

    /// Wrap and center the cue text.
    ///
    /// Text is never truncated; long sentences grow the box upward from its bottom anchor.
    #[tracing::instrument(skip(self, cue, engine), fields(segment = cue.segment_index))]
    pub fn layout(
        &self,
        cue: CaptionCue,
        engine: &mut TextLayoutEngine,
    ) -> NewsreelResult<CaptionOverlay> {
        if !cue.duration_sec.is_finite() || cue.duration_sec <= 0.0 {
            return Err(NewsreelError::segment_build(
                cue.segment_index,
                format!("caption duration must be > 0, got {}", cue.duration_sec),
            ));
        }
        let text = engine.layout(
            &cue.text,
            &self.font,
            TextStyle {
                size_px: self.style.font_size,
                color: self.style.color,
                max_width_px: Some(self.style.width as f32),
                align: TextAlign::Center,
                line_spacing_px: self.style.line_spacing,
            },
        )?;
        let margin = f64::from(self.style.margin);
        tracing::debug!(
            segment = cue.segment_index,
            lines = text.line_count,
            "caption laid out"
        );
        Ok(CaptionOverlay {
            width: f64::from(self.style.width),
            height: f64::from(text.height) + 2.0 * margin,
            margin,
            text,
            cue,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/renderer.rs"]
mod tests;
