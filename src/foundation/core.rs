use crate::foundation::error::{ScrollreelError, ScrollreelResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Output surface size in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> ScrollreelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScrollreelError::validation(
                "viewport width/height must be non-zero",
            ));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(ScrollreelError::validation(
                "viewport width/height must fit in u16",
            ));
        }
        Ok(Self { width, height })
    }

    /// Uniform "meet" fit of a `view_w` x `view_h` box, centered in the viewport.
    pub fn fit(self, view_w: f64, view_h: f64) -> Affine {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let s = (w / view_w).min(h / view_h);
        let dx = (w - view_w * s) * 0.5;
        let dy = (h - view_h * s) * 0.5;
        Affine::translate(Vec2::new(dx, dy)) * Affine::scale(s)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha scaled by `opacity` (clamped to 0..1).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
