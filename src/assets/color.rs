use crate::foundation::core::Rgba8;
use crate::foundation::error::{CaptixError, CaptixResult};

/// An opaque RGB color parsed from a `#RRGGBB` string.
///
/// Parsing is strict: exactly six hex digits behind a leading `#`. Short hex,
/// named colors and alpha suffixes are rejected at this boundary, so the rest
/// of the pipeline never sees a malformed paint color. Alpha is attached
/// numerically via [`Color::with_alpha`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a strict `#RRGGBB` color (case-insensitive hex digits).
    pub fn from_hex(s: &str) -> CaptixResult<Self> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| CaptixError::validation(format!("color '{s}' must start with '#'")))?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CaptixError::validation(format!(
                "color '{s}' must be exactly #RRGGBB"
            )));
        }
        let byte = |i: usize| -> CaptixResult<u8> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| CaptixError::validation(format!("color '{s}': {e}")))
        };
        Ok(Self {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
        })
    }

    /// Format back to a `#RRGGBB` string.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Attach an alpha byte, producing a straight-alpha RGBA color.
    pub fn with_alpha(self, a: u8) -> Rgba8 {
        Rgba8::new(self.r, self.g, self.b, a)
    }

    /// Fully opaque RGBA.
    pub fn opaque(self) -> Rgba8 {
        self.with_alpha(255)
    }
}

/// Alpha byte for a panel opacity percentage in `[0, 100]`.
///
/// Out-of-range input clamps rather than wrapping.
pub fn opacity_alpha(opacity_percent: u8) -> u8 {
    let pct = f32::from(opacity_percent.min(100));
    (pct / 100.0 * 255.0).round() as u8
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
