use crate::assets::probe::ImageDims;
use crate::foundation::core::PixelSize;

/// Output of [`fit_to_box`]: one axis always equals the matching box axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FitResult {
    /// Fitted width in pixels.
    pub width: u32,
    /// Fitted height in pixels.
    pub height: u32,
}

impl FitResult {
    /// Pixel size view.
    pub fn size(self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }
}

/// Resize rule for illustrations.
///
/// The axis with the larger native-to-box ratio is pinned to the box and the other axis follows
/// the native aspect ratio. Ties pin the width. The pinned axis never overflows the box; the free
/// axis may exceed it when the box and image aspect ratios are far apart.
pub fn fit_to_box(native: ImageDims, bx: PixelSize) -> FitResult {
    let (w, h) = (f64::from(native.width), f64::from(native.height));
    let (bw, bh) = bx.as_f64();

    let scale_by_height = h / bh;
    let scale_by_width = w / bw;

    if scale_by_height > scale_by_width {
        FitResult {
            width: round_px(w * bh / h),
            height: bx.height,
        }
    } else {
        FitResult {
            width: bx.width,
            height: round_px(h * bw / w),
        }
    }
}

fn round_px(v: f64) -> u32 {
    (v.round() as u32).max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
