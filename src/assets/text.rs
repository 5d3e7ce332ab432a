use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::config::settings::RenderConfig;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Font file bytes shared between layout and rasterization.
#[derive(Clone, Debug)]
pub struct FontSource {
    path: PathBuf,
    bytes: Arc<Vec<u8>>,
}

impl FontSource {
    /// Read a TrueType/OpenType font file.
    pub fn load(path: &Path) -> NewsreelResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        if bytes.is_empty() {
            return Err(NewsreelError::validation(format!(
                "font file '{}' is empty",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
            bytes: Arc::new(bytes),
        })
    }

    /// Wrap font bytes that did not come from a file; `name` stands in for the path.
    pub fn from_bytes(name: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: name.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Path the font was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw font bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Fonts used by one render: labels draw with `title`, captions with `caption`.
#[derive(Clone, Debug)]
pub struct FontSet {
    /// Title and channel label font.
    pub title: FontSource,
    /// Caption font.
    pub caption: FontSource,
}

impl FontSet {
    /// Load the fonts named by a render configuration.
    pub fn from_config(cfg: &RenderConfig) -> NewsreelResult<Self> {
        cfg.validate_fonts()?;
        let (Some(title), Some(caption)) = (cfg.title_font.as_deref(), cfg.content_font.as_deref())
        else {
            return Err(NewsreelError::validation("title_font and content_font must be set"));
        };
        Ok(Self {
            title: FontSource::load(title)?,
            caption: FontSource::load(caption)?,
        })
    }
}

/// Parley brush carrying a straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl From<Rgb8> for TextBrush {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// Horizontal alignment of lines inside the layout width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Flush left.
    Start,
    /// Centered within the wrap width.
    Center,
}

/// Styling inputs of one text layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f32,
    /// Fill color.
    pub color: Rgb8,
    /// Wrap width; `None` lays the text out on as few lines as its newlines allow.
    pub max_width_px: Option<f32>,
    /// Line alignment within `max_width_px`.
    pub align: TextAlign,
    /// Extra spacing added between consecutive lines.
    pub line_spacing_px: f32,
}

/// One shaped glyph at an absolute position inside its [`TextBlock`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PlacedGlyph {
    /// Glyph id in the source font.
    pub id: u32,
    /// Pen x position.
    pub x: f32,
    /// Baseline y position.
    pub y: f32,
}

/// Consecutive glyphs sharing one font size.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GlyphRunData {
    /// Font size in pixels.
    pub font_size: f32,
    /// Glyphs in visual order.
    pub glyphs: Vec<PlacedGlyph>,
}

/// Shaped, wrapped and aligned text, detached from the layout engine.
///
/// Coordinates are relative to the block's top-left corner.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextBlock {
    /// The text that was laid out.
    pub text: String,
    /// Fill color.
    pub color: Rgb8,
    /// Block width: the wrap width when set, else the widest line.
    pub width: f32,
    /// Sum of line heights plus inter-line spacing.
    pub height: f32,
    /// Number of lines after wrapping.
    pub line_count: usize,
    /// Glyph runs across all lines.
    #[serde(skip)]
    pub runs: Vec<GlyphRunData>,
}

impl TextBlock {
    /// `true` when nothing would be drawn.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|r| r.glyphs.is_empty())
    }
}

/// Stateful helper for building Parley text layouts from font files.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    faces: HashMap<PathBuf, RegisteredFace>,
}

/// Family name plus the attributes that select one face file inside that family.
#[derive(Clone, Debug)]
struct RegisteredFace {
    family: String,
    weight: parley::style::FontWeight,
    style: parley::style::FontStyle,
    width: parley::style::FontWidth,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts and no registered fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
        }
    }

    // Families are shared between files (Regular and Bold of one family), so the face is
    // pinned by its registered attributes as well as its family name.
    fn face_for(&mut self, font: &FontSource) -> NewsreelResult<RegisteredFace> {
        if let Some(face) = self.faces.get(font.path()) {
            return Ok(face.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let (family_id, info) = families
            .first()
            .and_then(|(id, infos)| infos.first().map(|info| (*id, info.clone())))
            .ok_or_else(|| {
                NewsreelError::validation(format!(
                    "no font faces registered from '{}'",
                    font.path().display()
                ))
            })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| NewsreelError::validation("registered font family has no name"))?
            .to_string();
        let face = RegisteredFace {
            family,
            weight: info.weight(),
            style: info.style(),
            width: info.width(),
        };
        self.faces.insert(font.path().to_path_buf(), face.clone());
        Ok(face)
    }

    /// Shape, wrap and align `text`.
    pub fn layout(
        &mut self,
        text: &str,
        font: &FontSource,
        style: TextStyle,
    ) -> NewsreelResult<TextBlock> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(NewsreelError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        if let Some(w) = style.max_width_px
            && (!w.is_finite() || w <= 0.0)
        {
            return Err(NewsreelError::validation(
                "text max_width_px must be finite and > 0",
            ));
        }

        let face = self.face_for(font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(face.weight));
        builder.push_default(parley::style::StyleProperty::FontStyle(face.style));
        builder.push_default(parley::style::StyleProperty::FontWidth(face.width));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush::from(
            style.color,
        )));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(style.max_width_px);
        layout.align(
            style.max_width_px,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let mut widest = 0.0f32;
        let mut height = 0.0f32;
        let mut line_count = 0usize;
        for line in layout.lines() {
            let m = line.metrics();
            widest = widest.max(ink_advance(m));
            height += m.ascent + m.descent + m.leading;
            line_count += 1;
        }
        let width = style.max_width_px.unwrap_or(widest);
        if line_count > 1 {
            height += style.line_spacing_px * (line_count - 1) as f32;
        }

        let mut runs = Vec::new();
        for (line_idx, line) in layout.lines().enumerate() {
            let dx = match style.align {
                TextAlign::Start => 0.0,
                TextAlign::Center => ((width - ink_advance(line.metrics())) * 0.5).max(0.0),
            };
            let dy = style.line_spacing_px * line_idx as f32;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run
                    .positioned_glyphs()
                    .map(|g| PlacedGlyph {
                        id: u32::from(g.id),
                        x: g.x + dx,
                        y: g.y + dy,
                    })
                    .collect();
                runs.push(GlyphRunData {
                    font_size: run.run().font_size(),
                    glyphs,
                });
            }
        }

        Ok(TextBlock {
            text: text.to_string(),
            color: style.color,
            width,
            height,
            line_count,
            runs,
        })
    }
}

// A wrapped line keeps the space it broke on in its advance.
fn ink_advance(m: &parley::layout::LineMetrics) -> f32 {
    (m.advance - m.trailing_whitespace).max(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
