use rayon::prelude::*;

use crate::effects::blur::gaussian_blur;
use crate::foundation::error::CaptixResult;
use crate::render::surface::Surface;

/// A single composable color primitive, CSS filter-function semantics.
///
/// All channel math happens in f32 and clamps back into `[0, 255]`; alpha is
/// left untouched (blur is the exception, it convolves all four channels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    Grayscale,
    Sepia,
    Blur { sigma: f32 },
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Invert,
}

/// Apply a chain of filter primitives to a surface, in order.
pub fn apply_ops(surface: &mut Surface, ops: &[FilterOp]) -> CaptixResult<()> {
    for op in ops {
        match *op {
            FilterOp::Blur { sigma } => gaussian_blur(surface, sigma)?,
            FilterOp::Grayscale => per_pixel(surface, |[r, g, b]| {
                let l = luma709(r, g, b);
                [l, l, l]
            }),
            FilterOp::Sepia => per_pixel(surface, |[r, g, b]| {
                [
                    0.393 * r + 0.769 * g + 0.189 * b,
                    0.349 * r + 0.686 * g + 0.168 * b,
                    0.272 * r + 0.534 * g + 0.131 * b,
                ]
            }),
            FilterOp::Brightness(v) => per_pixel(surface, move |[r, g, b]| {
                [r * v, g * v, b * v]
            }),
            FilterOp::Contrast(v) => per_pixel(surface, move |[r, g, b]| {
                [
                    (r - 128.0) * v + 128.0,
                    (g - 128.0) * v + 128.0,
                    (b - 128.0) * v + 128.0,
                ]
            }),
            FilterOp::Saturate(v) => per_pixel(surface, move |[r, g, b]| {
                let l = luma709(r, g, b);
                [l + (r - l) * v, l + (g - l) * v, l + (b - l) * v]
            }),
            FilterOp::Invert => per_pixel(surface, |[r, g, b]| {
                [255.0 - r, 255.0 - g, 255.0 - b]
            }),
        }
    }
    Ok(())
}

fn luma709(r: f32, g: f32, b: f32) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn per_pixel(surface: &mut Surface, f: impl Fn([f32; 3]) -> [f32; 3] + Sync) {
    let width = surface.width() as usize;
    surface
        .data_mut()
        .par_chunks_mut(width * 4)
        .for_each(|row| {
            for px in row.chunks_exact_mut(4) {
                let rgb = f([f32::from(px[0]), f32::from(px[1]), f32::from(px[2])]);
                px[0] = rgb[0].round().clamp(0.0, 255.0) as u8;
                px[1] = rgb[1].round().clamp(0.0, 255.0) as u8;
                px[2] = rgb[2].round().clamp(0.0, 255.0) as u8;
            }
        });
}
