use ab_glyph::{Font, FontArc, GlyphId, ScaleFont, point};

use crate::foundation::error::{CaptixError, CaptixResult};

/// Font-dependent attributes of a caption line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextAttrs {
    /// Font size in pixels.
    pub size_px: f32,
    /// Synthetic bold (coverage smear).
    pub bold: bool,
    /// Synthetic italic (shear about the baseline).
    pub italic: bool,
}

impl TextAttrs {
    pub fn new(size_px: f32) -> Self {
        Self {
            size_px,
            bold: false,
            italic: false,
        }
    }
}

/// A single rasterized line of text as an alpha-coverage bitmap.
///
/// `(left, top)` place the bitmap's top-left corner relative to the line's
/// pen origin: x = 0 at the left edge of the line, y = 0 at the alphabetic
/// baseline.
#[derive(Clone, Debug, Default)]
pub struct LineRaster {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    /// Row-major coverage in `[0, 1]`, `width * height` entries.
    pub coverage: Vec<f32>,
}

impl LineRaster {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Measurement and rasterization seam for caption text.
///
/// The layout engine only needs `measure_line`; the caption painter also
/// needs coverage bitmaps. Keeping both behind one trait lets tests swap in a
/// deterministic fixed-advance implementation without any font files.
pub trait Typeface {
    /// Advance width of `text` in pixels at the given attributes.
    fn measure_line(&self, text: &str, attrs: &TextAttrs) -> f32;

    /// Rasterize `text` to an alpha-coverage bitmap positioned relative to
    /// the line's pen origin.
    fn raster_line(&self, text: &str, attrs: &TextAttrs) -> LineRaster;
}

/// [`Typeface`] backed by an `ab_glyph` font.
#[derive(Clone)]
pub struct GlyphTypeface {
    font: FontArc,
}

/// Horizontal shear factor applied above the baseline for synthetic italics.
const ITALIC_SHEAR: f32 = 0.2;

impl GlyphTypeface {
    pub fn from_vec(bytes: Vec<u8>) -> CaptixResult<Self> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| CaptixError::validation(format!("invalid font data: {e}")))?;
        Ok(Self { font })
    }

    pub fn from_font(font: FontArc) -> Self {
        Self { font }
    }

    fn positioned_glyphs(&self, text: &str, size_px: f32) -> Vec<(GlyphId, f32)> {
        let scaled = self.font.as_scaled(size_px);
        let mut out = Vec::with_capacity(text.len());
        let mut cursor_x = 0.0f32;
        let mut last: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = last {
                cursor_x += scaled.kern(prev, id);
            }
            out.push((id, cursor_x));
            cursor_x += scaled.h_advance(id);
            last = Some(id);
        }
        out
    }
}

impl Typeface for GlyphTypeface {
    fn measure_line(&self, text: &str, attrs: &TextAttrs) -> f32 {
        let scaled = self.font.as_scaled(attrs.size_px);
        let mut width = 0.0f32;
        let mut last: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = last {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            last = Some(id);
        }
        width
    }

    fn raster_line(&self, text: &str, attrs: &TextAttrs) -> LineRaster {
        let glyphs = self.positioned_glyphs(text, attrs.size_px);
        if glyphs.is_empty() {
            return LineRaster::default();
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for &(id, gx) in &glyphs {
            let glyph = id.with_scale_and_position(attrs.size_px, point(gx, 0.0));
            let bounds = self.font.glyph_bounds(&glyph);
            min_x = min_x.min(bounds.min.x);
            min_y = min_y.min(bounds.min.y);
            max_x = max_x.max(bounds.max.x);
            max_y = max_y.max(bounds.max.y);
        }
        if min_x >= max_x || min_y >= max_y {
            // Whitespace-only line: advances but no ink.
            return LineRaster::default();
        }

        // Room for the italic shear, the bold smear and antialiased fringes.
        let pad = 2.0;
        min_x -= pad;
        min_y -= pad;
        max_x += pad + 1.0;
        max_y += pad;
        if attrs.italic {
            max_x += (-min_y).max(0.0) * ITALIC_SHEAR;
        }

        let left = min_x.floor() as i32;
        let top = min_y.floor() as i32;
        let width = (max_x.ceil() as i32 - left).max(0) as u32;
        let height = (max_y.ceil() as i32 - top).max(0) as u32;
        let mut coverage = vec![0.0f32; width as usize * height as usize];

        for &(id, gx) in &glyphs {
            let glyph = id.with_scale_and_position(attrs.size_px, point(gx.round(), 0.0));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let b = outlined.px_bounds();
            outlined.draw(|px, py, cov| {
                let cy = b.min.y + py as f32;
                let mut cx = b.min.x + px as f32;
                if attrs.italic {
                    cx += -cy * ITALIC_SHEAR;
                }
                let ix = cx.round() as i32 - left;
                let iy = cy.round() as i32 - top;
                if ix < 0 || iy < 0 || ix as u32 >= width || iy as u32 >= height {
                    return;
                }
                let idx = iy as usize * width as usize + ix as usize;
                coverage[idx] = coverage[idx].max(cov);
                if attrs.bold && (ix as u32) + 1 < width {
                    coverage[idx + 1] = coverage[idx + 1].max(cov);
                }
            });
        }

        LineRaster {
            width,
            height,
            left,
            top,
            coverage,
        }
    }
}
