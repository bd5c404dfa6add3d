use kurbo::Rect;

use crate::assets::color::opacity_alpha;
use crate::geometry::ViewportFit;
use crate::params::StyleParams;
use crate::render::surface::Surface;
use crate::text::layout::TextLayout;
use crate::text::typeface::{LineRaster, Typeface};

/// Horizontal padding between the panel edge and the widest line.
pub const PADDING_X: f64 = 16.0;
/// Vertical padding above the first line and below the last.
pub const PADDING_Y: f64 = 8.0;
/// Corner radius of the caption panel.
pub const CORNER_RADIUS: f64 = 6.0;
/// Gap between the panel and the bottom edge of the rendered image.
pub const BOTTOM_MARGIN: f64 = 24.0;

/// Placement of the caption panel, derived from a layout and the image's
/// rendered rectangle. Computed fresh every redraw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelMetrics {
    pub rect: Rect,
}

impl PanelMetrics {
    /// Size the panel to hug the wrapped text and anchor it horizontally
    /// centered, `BOTTOM_MARGIN` above the image's bottom edge.
    pub fn compute(layout: &TextLayout, fit: &ViewportFit) -> Self {
        let width = f64::from(layout.max_line_width) + 2.0 * PADDING_X;
        let height =
            layout.lines.len() as f64 * f64::from(layout.line_height) + 2.0 * PADDING_Y;
        let x0 = fit.offset_x() + (fit.rendered_width() - width) / 2.0;
        let y0 = fit.offset_y() + fit.rendered_height() - BOTTOM_MARGIN - height;
        Self {
            rect: Rect::new(x0, y0, x0 + width, y0 + height),
        }
    }
}

/// Paint the caption panel and its text onto `surface`.
///
/// Painting order per line is stroke first, then fill, so the outline never
/// bleeds over the glyph interior. Each line is centered independently inside
/// the panel.
pub fn paint_caption(
    surface: &mut Surface,
    layout: &TextLayout,
    style: &StyleParams,
    fit: &ViewportFit,
    typeface: &dyn Typeface,
) {
    if layout.is_empty() || fit.is_degenerate() {
        return;
    }

    let panel = PanelMetrics::compute(layout, fit);
    let panel_alpha = opacity_alpha(style.opacity_percent);
    if panel_alpha > 0 {
        surface.fill_rounded_rect(
            panel.rect,
            CORNER_RADIUS,
            style.bg_color.with_alpha(panel_alpha),
        );
    }

    let attrs = style.text_attrs();
    let panel_center_x = panel.rect.x0 + panel.rect.width() / 2.0;

    for (i, line) in layout.lines.iter().enumerate() {
        let baseline_y = panel.rect.y0
            + PADDING_Y
            + f64::from((i as f32 + 0.8) * layout.line_height);
        if line.is_empty() {
            continue;
        }

        let line_width = f64::from(typeface.measure_line(line, &attrs));
        let line_left = panel_center_x - line_width / 2.0;

        let raster = typeface.raster_line(line, &attrs);
        if !raster.is_empty() {
            let x = line_left.round() as i32 + raster.left;
            let y = baseline_y.round() as i32 + raster.top;

            if style.stroke_width_px > 0 {
                let r = style.stroke_width_px as i32;
                let outline = dilate_disc(&raster, r);
                surface.stamp_coverage(
                    &outline.coverage,
                    outline.width,
                    outline.height,
                    x - r,
                    y - r,
                    style.stroke_color.opaque(),
                );
            }
            surface.stamp_coverage(
                &raster.coverage,
                raster.width,
                raster.height,
                x,
                y,
                style.text_color.opaque(),
            );
        }

        if style.underline {
            let thickness = (f64::from(style.font_size_px) * 0.06).max(1.0);
            let y0 = baseline_y + f64::from(style.font_size_px) * 0.1;
            surface.fill_rounded_rect(
                Rect::new(line_left, y0, line_left + line_width, y0 + thickness),
                0.0,
                style.text_color.opaque(),
            );
        }
    }
}

/// Morphological dilation of a coverage bitmap by a disc of radius `r`.
///
/// The result grows by `r` on each side; the caller compensates when
/// positioning it so the original ink stays registered.
fn dilate_disc(raster: &LineRaster, r: i32) -> LineRaster {
    let out_w = raster.width + 2 * r as u32;
    let out_h = raster.height + 2 * r as u32;
    let mut coverage = vec![0.0f32; out_w as usize * out_h as usize];

    for oy in 0..out_h as i32 {
        for ox in 0..out_w as i32 {
            let mut best = 0.0f32;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy > r * r {
                        continue;
                    }
                    let sx = ox - r + dx;
                    let sy = oy - r + dy;
                    if sx < 0
                        || sy < 0
                        || sx as u32 >= raster.width
                        || sy as u32 >= raster.height
                    {
                        continue;
                    }
                    let cov =
                        raster.coverage[sy as usize * raster.width as usize + sx as usize];
                    best = best.max(cov);
                }
            }
            coverage[oy as usize * out_w as usize + ox as usize] = best;
        }
    }

    LineRaster {
        width: out_w,
        height: out_h,
        left: raster.left,
        top: raster.top,
        coverage,
    }
}
