use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded illustration ready for painting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 pixels, row-major.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes and resample to exactly `width` x `height` (triangle filter).
pub fn decode_image_resized(bytes: &[u8], width: u32, height: u32) -> NewsreelResult<PreparedImage> {
    if width == 0 || height == 0 {
        return Err(NewsreelError::validation(
            "resize target must be non-zero on both axes",
        ));
    }
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| NewsreelError::Other(anyhow::anyhow!("decode image from memory: {e}")))?
        .to_rgba8();
    let rgba = if rgba.dimensions() == (width, height) {
        rgba
    } else {
        image::imageops::resize(&rgba, width, height, image::imageops::FilterType::Triangle)
    };
    Ok(premultiplied(width, height, rgba.into_raw()))
}

/// Read an image file and resample it to `width` x `height`.
pub fn load_image_resized(path: &Path, width: u32, height: u32) -> NewsreelResult<PreparedImage> {
    let bytes = std::fs::read(path).map_err(|e| NewsreelError::unreadable(path, e))?;
    decode_image_resized(&bytes, width, height).map_err(|e| match e {
        NewsreelError::Other(inner) => NewsreelError::unreadable(path, inner),
        other => other,
    })
}

fn premultiplied(width: u32, height: u32, mut rgba: Vec<u8>) -> PreparedImage {
    premultiply_rgba8_in_place(&mut rgba);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
