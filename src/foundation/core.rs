use crate::foundation::error::{CaptixError, CaptixResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Render-target dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Return `true` when either dimension is zero.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total pixel count, guarded against overflow.
    pub fn pixel_count(self) -> CaptixResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or_else(|| CaptixError::validation("canvas pixel count overflow"))
    }
}

/// Straight-alpha RGBA8 (r,g,b are not premultiplied).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with the alpha channel replaced.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_canvas_detected() {
        assert!(Canvas::new(0, 10).is_degenerate());
        assert!(Canvas::new(10, 0).is_degenerate());
        assert!(!Canvas::new(1, 1).is_degenerate());
    }

    #[test]
    fn pixel_count_matches_dimensions() {
        assert_eq!(Canvas::new(800, 600).pixel_count().unwrap(), 480_000);
    }
}
