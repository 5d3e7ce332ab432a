use crate::foundation::core::{Canvas, Vec2};

/// Where a layer item sits on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Covers the whole canvas.
    Fill,
    /// Centered on both axes.
    Center,
    /// Horizontally centered, bottom edge `margin` px above the canvas bottom.
    BottomCenter {
        /// Distance from the bottom edge.
        margin: f64,
    },
    /// Horizontally centered, top edge `margin` px below the canvas top.
    TopCenter {
        /// Distance from the top edge.
        margin: f64,
    },
    /// Top-left corner at `(margin_x, margin_y)`.
    TopLeft {
        /// Distance from the left edge.
        margin_x: f64,
        /// Distance from the top edge.
        margin_y: f64,
    },
}

impl Placement {
    /// Top-left offset of an item of `item_w` x `item_h` pixels on `canvas`.
    ///
    /// Items larger than the canvas keep their start-aligned anchor instead of going negative.
    pub fn resolve(self, canvas: Canvas, item_w: f64, item_h: f64) -> Vec2 {
        let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
        match self {
            Placement::Fill => Vec2::ZERO,
            Placement::Center => Vec2::new(
                align_offset(cw, item_w, Align::Center),
                align_offset(ch, item_h, Align::Center),
            ),
            Placement::BottomCenter { margin } => Vec2::new(
                align_offset(cw, item_w, Align::Center),
                (align_offset(ch, item_h, Align::End) - margin).max(0.0),
            ),
            Placement::TopCenter { margin } => {
                Vec2::new(align_offset(cw, item_w, Align::Center), margin)
            }
            Placement::TopLeft { margin_x, margin_y } => Vec2::new(margin_x, margin_y),
        }
    }
}

enum Align {
    Center,
    End,
}

fn align_offset(container: f64, content: f64, align: Align) -> f64 {
    let rem = (container - content).max(0.0);
    match align {
        Align::Center => rem * 0.5,
        Align::End => rem,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/position.rs"]
mod tests;
