use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::text::{FontSource, TextBlock};
use crate::composition::compositor::{CompositedTimeline, LayerKind};
use crate::foundation::core::{Canvas, Vec2};
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::render::frame::FrameRGBA;

/// Everything that determines a frame's pixels.
///
/// Two frames with equal state rasterize to identical bytes, so the renderer reuses the
/// previous frame whenever the state does not change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameState {
    /// Active content clip position, if any.
    pub content: Option<usize>,
    /// Active caption clip position, if any.
    pub caption: Option<usize>,
    /// Per-layer opacity, quantized to 8 bits, in layer order.
    pub layer_alpha: Vec<u8>,
}

/// `vello_cpu` rasterizer for one canvas size.
pub struct CpuRasterizer {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    image_cache: HashMap<u32, vello_cpu::Image>,
    font_cache: HashMap<PathBuf, vello_cpu::peniko::FontData>,
}

impl CpuRasterizer {
    /// Rasterizer producing `canvas`-sized frames.
    pub fn new(canvas: Canvas) -> NewsreelResult<Self> {
        let (w, h) = canvas_u16(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            image_cache: HashMap::new(),
            font_cache: HashMap::new(),
        })
    }

    /// Draw every visible layer of `tl` for `state`.
    pub fn render(
        &mut self,
        tl: &CompositedTimeline,
        state: &FrameState,
    ) -> NewsreelResult<FrameRGBA> {
        if tl.canvas != self.canvas {
            return Err(NewsreelError::validation(
                "timeline canvas does not match rasterizer canvas",
            ));
        }
        if state.layer_alpha.len() != tl.layers.len() {
            return Err(NewsreelError::validation(
                "frame state does not match the layer stack",
            ));
        }

        self.ctx.reset();
        for (layer, &alpha) in tl.layers.iter().zip(&state.layer_alpha) {
            if alpha == 0 {
                continue;
            }
            let opacity = f32::from(alpha) / 255.0;
            match &layer.kind {
                LayerKind::Background { color } => {
                    self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        color.r, color.g, color.b, 255,
                    ));
                    self.with_opacity(opacity, |ctx| {
                        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                            0.0,
                            0.0,
                            f64::from(tl.canvas.width),
                            f64::from(tl.canvas.height),
                        ));
                    });
                }
                LayerKind::Content => {
                    let Some(clip) = state.content.and_then(|i| tl.content.clips().get(i)) else {
                        continue;
                    };
                    let img = &clip.item.image;
                    let (w, h) = (f64::from(img.width), f64::from(img.height));
                    let off = layer.placement.resolve(tl.canvas, w, h).round();
                    let paint = self.image_paint(clip.item.segment_index, img)?;
                    self.ctx.set_transform(translate(off));
                    self.ctx.set_paint(paint);
                    self.with_opacity(opacity, |ctx| {
                        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
                    });
                }
                LayerKind::Captions => {
                    let Some(clip) = state.caption.and_then(|i| tl.captions.clips().get(i))
                    else {
                        continue;
                    };
                    let o = &clip.item;
                    let off = layer.placement.resolve(tl.canvas, o.width, o.height)
                        + Vec2::new(0.0, o.margin);
                    let font = self.font_data(&tl.fonts.caption);
                    self.draw_text(&o.text, &font, off.round(), opacity);
                }
                LayerKind::Label { text, .. } => {
                    let font = self.font_data(&tl.fonts.title);
                    let off = layer
                        .placement
                        .resolve(tl.canvas, f64::from(text.width), f64::from(text.height));
                    self.draw_text(text, &font, off.round(), opacity);
                }
            }
        }

        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn with_opacity(&mut self, opacity: f32, draw: impl FnOnce(&mut vello_cpu::RenderContext)) {
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
            draw(&mut self.ctx);
            self.ctx.pop_layer();
        } else {
            draw(&mut self.ctx);
        }
    }

    fn draw_text(
        &mut self,
        text: &TextBlock,
        font: &vello_cpu::peniko::FontData,
        off: Vec2,
        opacity: f32,
    ) {
        if text.is_blank() {
            return;
        }
        let c = text.color;
        self.ctx.set_transform(translate(off));
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255));
        self.with_opacity(opacity, |ctx| {
            for run in &text.runs {
                let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(run.font_size)
                    .fill_glyphs(glyphs);
            }
        });
    }

    fn image_paint(&mut self, key: u32, img: &PreparedImage) -> NewsreelResult<vello_cpu::Image> {
        if let Some(paint) = self.image_cache.get(&key) {
            return Ok(paint.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(key, paint.clone());
        Ok(paint)
    }

    fn font_data(&mut self, font: &FontSource) -> vello_cpu::peniko::FontData {
        self.font_cache
            .entry(font.path().to_path_buf())
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.bytes().to_vec()),
                    0,
                )
            })
            .clone()
    }
}

fn translate(off: Vec2) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::translate((off.x, off.y))
}

fn canvas_u16(canvas: Canvas) -> NewsreelResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| NewsreelError::validation("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| NewsreelError::validation("canvas height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(NewsreelError::validation("canvas must be non-zero"));
    }
    Ok((w, h))
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> NewsreelResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_u16(Canvas { width, height })?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(NewsreelError::validation("image byte length mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
