use image::RgbaImage;
use kurbo::Rect;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{CaptixError, CaptixResult};

/// An owned straight-alpha RGBA8 render target.
///
/// The surface is passed explicitly into every pipeline stage; nothing in the
/// crate locates a target by a shared name, and a stage owns the buffer
/// exclusively for the duration of a redraw.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Transparent surface of the given size.
    pub fn new(canvas: Canvas) -> CaptixResult<Self> {
        Self::filled(canvas, Rgba8::TRANSPARENT)
    }

    /// Surface cleared to a solid color.
    pub fn filled(canvas: Canvas, color: Rgba8) -> CaptixResult<Self> {
        let len = canvas
            .pixel_count()?
            .checked_mul(4)
            .ok_or_else(|| CaptixError::validation("surface byte length overflow"))?;
        let mut data = vec![0u8; len];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    /// Wrap a decoded RGBA image as a surface (copies the buffer).
    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.as_raw().clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let i = self.index(x, y);
        Rgba8::new(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3])
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, c: Rgba8) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&[c.r, c.g, c.b, c.a]);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Source-over blend of a straight-alpha color into one pixel.
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: Rgba8) {
        if src.a == 0 {
            return;
        }
        if src.a == 255 {
            self.put_pixel(x, y, src);
            return;
        }
        let dst = self.pixel(x, y);
        self.put_pixel(x, y, over_straight(dst, src));
    }

    /// Source-over blit of `src` with its top-left corner at `(x, y)`.
    /// Regions falling outside the target are clipped.
    pub fn blit(&mut self, src: &Surface, x: i32, y: i32) {
        for sy in 0..src.height {
            let ty = y + sy as i32;
            if ty < 0 || ty >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width {
                let tx = x + sx as i32;
                if tx < 0 || tx >= self.width as i32 {
                    continue;
                }
                self.blend_pixel(tx as u32, ty as u32, src.pixel(sx, sy));
            }
        }
    }

    /// Fill a rounded rectangle (quadratic-corner panel shape) with 1px
    /// analytic antialiasing, blended source-over.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let radius = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
        let x0 = rect.x0.floor().max(0.0) as i64;
        let y0 = rect.y0.floor().max(0.0) as i64;
        let x1 = (rect.x1.ceil() as i64).min(self.width as i64);
        let y1 = (rect.y1.ceil() as i64).min(self.height as i64);

        for py in y0..y1 {
            for px in x0..x1 {
                let cx = px as f64 + 0.5;
                let cy = py as f64 + 0.5;
                let d = rounded_rect_distance(rect, radius, cx, cy);
                let coverage = (0.5 - d).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let a = (f64::from(color.a) * coverage).round() as u8;
                self.blend_pixel(px as u32, py as u32, color.with_alpha(a));
            }
        }
    }

    /// Stamp an alpha-coverage bitmap in `color`, blended source-over, with
    /// the bitmap's top-left at `(x, y)`. Out-of-bounds texels are clipped.
    pub fn stamp_coverage(
        &mut self,
        coverage: &[f32],
        cov_width: u32,
        cov_height: u32,
        x: i32,
        y: i32,
        color: Rgba8,
    ) {
        for cy in 0..cov_height {
            let ty = y + cy as i32;
            if ty < 0 || ty >= self.height as i32 {
                continue;
            }
            for cx in 0..cov_width {
                let tx = x + cx as i32;
                if tx < 0 || tx >= self.width as i32 {
                    continue;
                }
                let cov = coverage[cy as usize * cov_width as usize + cx as usize];
                if cov <= 0.001 {
                    continue;
                }
                let a = (f32::from(color.a) * cov.min(1.0)).round() as u8;
                self.blend_pixel(tx as u32, ty as u32, color.with_alpha(a));
            }
        }
    }

    /// Copy the surface into an owned `RgbaImage`.
    pub fn to_rgba_image(&self) -> CaptixResult<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| CaptixError::render("surface buffer does not match its dimensions"))
    }
}

/// Bilinearly resample a decoded image to the given size.
///
/// This is the preview-blit path; the export path uses the higher-quality
/// CatmullRom resampler in `export`.
pub fn resample_bilinear(img: &RgbaImage, width: u32, height: u32) -> CaptixResult<Surface> {
    if width == 0 || height == 0 {
        return Err(CaptixError::render("cannot resample to a zero-size target"));
    }
    let (sw, sh) = (img.width(), img.height());
    let mut out = Surface::new(Canvas::new(width, height))?;

    let sx_step = f64::from(sw) / f64::from(width);
    let sy_step = f64::from(sh) / f64::from(height);

    for ty in 0..height {
        let sy = ((f64::from(ty) + 0.5) * sy_step - 0.5).max(0.0);
        let y0 = (sy.floor() as u32).min(sh - 1);
        let y1 = (y0 + 1).min(sh - 1);
        let fy = sy - sy.floor();
        for tx in 0..width {
            let sx = ((f64::from(tx) + 0.5) * sx_step - 0.5).max(0.0);
            let x0 = (sx.floor() as u32).min(sw - 1);
            let x1 = (x0 + 1).min(sw - 1);
            let fx = sx - sx.floor();

            let mut channels = [0u8; 4];
            for (c, out_c) in channels.iter_mut().enumerate() {
                let p00 = f64::from(img.get_pixel(x0, y0).0[c]);
                let p10 = f64::from(img.get_pixel(x1, y0).0[c]);
                let p01 = f64::from(img.get_pixel(x0, y1).0[c]);
                let p11 = f64::from(img.get_pixel(x1, y1).0[c]);
                let top = p00 + (p10 - p00) * fx;
                let bot = p01 + (p11 - p01) * fx;
                *out_c = (top + (bot - top) * fy).round().clamp(0.0, 255.0) as u8;
            }
            out.put_pixel(tx, ty, Rgba8::new(channels[0], channels[1], channels[2], channels[3]));
        }
    }
    Ok(out)
}

fn over_straight(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = f32::from(src.a) / 255.0;
    let da = f32::from(dst.a) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba8::TRANSPARENT;
    }
    let blend = |s: u8, d: u8| -> u8 {
        let s = f32::from(s);
        let d = f32::from(d);
        ((s * sa + d * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8
    };
    Rgba8::new(
        blend(src.r, dst.r),
        blend(src.g, dst.g),
        blend(src.b, dst.b),
        (out_a * 255.0).round() as u8,
    )
}

/// Signed distance from a point to a rounded rectangle's boundary
/// (negative inside).
fn rounded_rect_distance(rect: Rect, radius: f64, x: f64, y: f64) -> f64 {
    let cx = rect.x0 + rect.width() / 2.0;
    let cy = rect.y0 + rect.height() / 2.0;
    let half_w = rect.width() / 2.0 - radius;
    let half_h = rect.height() / 2.0 - radius;
    let qx = (x - cx).abs() - half_w;
    let qy = (y - cy).abs() - half_h;
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).min(0.0) - radius
}
