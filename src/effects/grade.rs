use rayon::prelude::*;

use crate::effects::blur::gaussian_blur;
use crate::effects::ops::{FilterOp, apply_ops};
use crate::foundation::error::CaptixResult;
use crate::render::surface::Surface;

/// Cinematic per-pixel color grade.
///
/// Luminance is computed from the pixel as it stands after the pre-grade
/// ops, so the passes are cumulative and order-dependent: highlights get a
/// warm push, everything below the threshold gets a teal push, and deep
/// shadows are crushed on top of that.
pub fn cinematic_grade(surface: &mut Surface) {
    let width = surface.width() as usize;
    surface
        .data_mut()
        .par_chunks_mut(width * 4)
        .for_each(|row| {
            for px in row.chunks_exact_mut(4) {
                let mut r = f32::from(px[0]);
                let mut g = f32::from(px[1]);
                let mut b = f32::from(px[2]);
                let luma = 0.299 * r + 0.587 * g + 0.114 * b;

                if luma > 80.0 {
                    r *= 1.2;
                    g *= 1.1;
                }
                if luma < 80.0 {
                    g *= 1.15;
                    b *= 1.2;
                }
                if luma < 30.0 {
                    r *= 0.7;
                    g *= 0.7;
                    b *= 0.7;
                }

                px[0] = r.round().clamp(0.0, 255.0) as u8;
                px[1] = g.round().clamp(0.0, 255.0) as u8;
                px[2] = b.round().clamp(0.0, 255.0) as u8;
            }
        });
}

/// Screen-style bloom: blend a blurred, brightened copy of the surface back
/// over itself at the given opacity.
pub fn bloom(surface: &mut Surface, sigma: f32, brightness: f32, opacity: f32) -> CaptixResult<()> {
    let mut glow = surface.clone();
    gaussian_blur(&mut glow, sigma)?;
    apply_ops(&mut glow, &[FilterOp::Brightness(brightness)])?;

    let t = opacity.clamp(0.0, 1.0);
    let width = surface.width() as usize;
    surface
        .data_mut()
        .par_chunks_mut(width * 4)
        .zip(glow.data().par_chunks(width * 4))
        .for_each(|(dst_row, glow_row)| {
            for (d, s) in dst_row.chunks_exact_mut(4).zip(glow_row.chunks_exact(4)) {
                for c in 0..3 {
                    let dv = f32::from(d[c]);
                    let sv = f32::from(s[c]);
                    // screen(d, s) = 255 - (255 - d)(255 - s)/255
                    let screened = 255.0 - (255.0 - dv) * (255.0 - sv) / 255.0;
                    d[c] = (dv + (screened - dv) * t).round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    Ok(())
}

/// Radial vignette: transparent out to `start` of the corner-most radius,
/// then a linear ramp to `max_alpha` black at the corners.
pub fn vignette(surface: &mut Surface, start: f32, max_alpha: f32) {
    let w = surface.width();
    let h = surface.height();
    if w == 0 || h == 0 {
        return;
    }
    let cx = (w as f32) / 2.0;
    let cy = (h as f32) / 2.0;
    let max_radius = (cx * cx + cy * cy).sqrt();
    let ramp_start = max_radius * start;
    let ramp_len = (max_radius - ramp_start).max(1.0);

    let width = w as usize;
    surface
        .data_mut()
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = y as f32 + 0.5 - cy;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let dx = x as f32 + 0.5 - cx;
                let d = (dx * dx + dy * dy).sqrt();
                if d <= ramp_start {
                    continue;
                }
                let shade = ((d - ramp_start) / ramp_len).min(1.0) * max_alpha;
                for c in 0..3 {
                    px[c] = (f32::from(px[c]) * (1.0 - shade))
                        .round()
                        .clamp(0.0, 255.0) as u8;
                }
            }
        });
}

/// Add uniform noise in `[-amplitude, +amplitude]` independently to each
/// color channel.
///
/// The noise comes from a deterministic per-pixel hash of `seed`, so a fixed
/// seed reproduces the exact grain — callers wanting fresh grain per render
/// supply a fresh seed.
pub fn grain(surface: &mut Surface, amplitude: i32, seed: u64) {
    let width = surface.width() as usize;
    let span = amplitude * 2 + 1;
    surface
        .data_mut()
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let h = hash_pixel(seed, x as u32, y as u32);
                for c in 0..3 {
                    let byte = ((h >> (c * 8)) & 0xFF) as i32;
                    let offset = byte % span - amplitude;
                    px[c] = (i32::from(px[c]) + offset).clamp(0, 255) as u8;
                }
            }
        });
}

fn hash_pixel(seed: u64, x: u32, y: u32) -> u64 {
    let mut z = seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(u64::from(x))
        .wrapping_add(u64::from(y) << 32);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
