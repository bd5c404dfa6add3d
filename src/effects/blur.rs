use crate::foundation::error::{CaptixError, CaptixResult};
use crate::render::surface::Surface;

/// Gaussian-blur a surface in place.
///
/// Separable two-pass convolution with a Q16 fixed-point kernel and
/// clamp-to-edge sampling. `sigma` follows CSS `blur()` semantics (the
/// standard deviation in pixels); the kernel radius is `ceil(3 * sigma)`.
pub fn gaussian_blur(surface: &mut Surface, sigma: f32) -> CaptixResult<()> {
    if sigma <= 0.0 {
        return Ok(());
    }
    if !sigma.is_finite() {
        return Err(CaptixError::validation("blur sigma must be finite"));
    }
    let radius = (sigma * 3.0).ceil() as u32;
    if radius == 0 || surface.width() == 0 || surface.height() == 0 {
        return Ok(());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let (w, h) = (surface.width(), surface.height());

    let mut tmp = vec![0u8; surface.data().len()];
    separable_pass(surface.data(), &mut tmp, w, h, &kernel, Axis::Horizontal);
    let mut out = vec![0u8; surface.data().len()];
    separable_pass(&tmp, &mut out, w, h, &kernel, Axis::Vertical);
    surface.data_mut().copy_from_slice(&out);
    Ok(())
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn separable_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, kernel: &[u32], axis: Axis) {
    let radius = (kernel.len() / 2) as i64;
    let (w, h) = (width as i64, height as i64);
    let (extent, stride) = match axis {
        Axis::Horizontal => (w, 1i64),
        Axis::Vertical => (h, w),
    };

    for y in 0..h {
        for x in 0..w {
            let along = match axis {
                Axis::Horizontal => x,
                Axis::Vertical => y,
            };
            let line_start = match axis {
                Axis::Horizontal => y * w,
                Axis::Vertical => x,
            };
            let mut acc = [0u64; 4];
            for (ki, &kw) in kernel.iter().enumerate() {
                let tap = (along + ki as i64 - radius).clamp(0, extent - 1);
                let idx = ((line_start + tap * stride) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CaptixResult<Vec<u32>> {
    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;

    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(CaptixError::render("gaussian kernel sum is zero"));
    }

    // Normalize to a 16.16 fixed-point kernel that sums exactly to 1<<16,
    // folding any rounding residue into the center tap.
    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let fixed = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = fixed as u32;
    }
    Ok(weights)
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}
