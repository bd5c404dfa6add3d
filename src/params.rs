use crate::assets::color::Color;
use crate::foundation::error::{CaptixError, CaptixResult};
use crate::text::typeface::TextAttrs;

/// The externally-owned caption style parameter set.
///
/// The surrounding UI owns and mutates these values; the core reads them on
/// every redraw. Colors arrive as strict `#RRGGBB` strings through serde and
/// are already parsed by the time the pipeline sees them. `font_family` is
/// carried for round-tripping; resolving a family name to font data is the
/// caller's job (the session is handed the resolved [`crate::Typeface`]).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleParams {
    pub text_color: Color,
    pub bg_color: Color,
    /// Panel background opacity, `0..=100`.
    pub opacity_percent: u8,
    pub font_family: String,
    /// Font size in pixels, recommended `12..=72`.
    pub font_size_px: u32,
    /// Glyph outline width in pixels, `0..=10`; `0` disables the stroke.
    pub stroke_width_px: u32,
    pub stroke_color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            text_color: Color::WHITE,
            bg_color: Color::BLACK,
            opacity_percent: 0,
            font_family: "Arial, sans-serif".to_string(),
            font_size_px: 28,
            stroke_width_px: 3,
            stroke_color: Color::BLACK,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

impl StyleParams {
    /// Check the numeric ranges the UI contract promises.
    pub fn validate(&self) -> CaptixResult<()> {
        if self.opacity_percent > 100 {
            return Err(CaptixError::validation(
                "opacity_percent must be within 0..=100",
            ));
        }
        if self.font_size_px == 0 {
            return Err(CaptixError::validation("font_size_px must be non-zero"));
        }
        if self.stroke_width_px > 10 {
            return Err(CaptixError::validation(
                "stroke_width_px must be within 0..=10",
            ));
        }
        Ok(())
    }

    pub fn text_attrs(&self) -> TextAttrs {
        TextAttrs {
            size_px: self.font_size_px as f32,
            bold: self.bold,
            italic: self.italic,
        }
    }
}
