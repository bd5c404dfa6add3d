use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbaImage;

use crate::foundation::error::{CaptixError, CaptixResult};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Identity stamp for a decoded bitmap.
///
/// Every replacement image (upload, crop commit, rotate commit) gets a fresh
/// generation, and rendered frames carry the generation they were produced
/// from. A caller juggling queued decodes can discard frames whose generation
/// no longer matches the session's current image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageGeneration(pub u64);

/// An immutable decoded source bitmap.
///
/// Replaced wholesale on upload, crop commit, or rotate commit; never mutated
/// in place.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pixels: RgbaImage,
    generation: ImageGeneration,
}

impl SourceImage {
    /// Wrap an already-decoded RGBA buffer, stamping a fresh generation.
    pub fn from_rgba(pixels: RgbaImage) -> CaptixResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(CaptixError::validation(
                "source image must have non-zero dimensions",
            ));
        }
        Ok(Self {
            pixels,
            generation: ImageGeneration(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)),
        })
    }

    pub fn natural_width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn generation(&self) -> ImageGeneration {
        self.generation
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Decode raw image bytes (PNG, JPEG, WebP, ...) into a [`SourceImage`].
///
/// Failure is a [`CaptixError::Decode`]; the caller keeps whatever image it
/// had and simply produces no new output.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> CaptixResult<SourceImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| CaptixError::decode(format!("failed to decode image bytes: {e}")))?;
    let rgba = decoded.to_rgba8();
    tracing::debug!(width = rgba.width(), height = rgba.height(), "decoded image");
    SourceImage::from_rgba(rgba)
}
