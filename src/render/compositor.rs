use crate::assets::decode::SourceImage;
use crate::effects::filter::{FilterId, apply_filter};
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::CaptixResult;
use crate::geometry::fit_viewport;
use crate::params::StyleParams;
use crate::render::caption::paint_caption;
use crate::render::surface::{Surface, resample_bilinear};
use crate::text::layout::layout_caption;
use crate::text::typeface::Typeface;

/// Fraction of the rendered image width the caption may occupy.
pub const CAPTION_WIDTH_FRACTION: f64 = 0.9;

/// Everything one redraw reads: the current image, caption text, style and
/// filter selection. The scene borrows its inputs; the compositor never
/// mutates them.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub image: &'a SourceImage,
    pub caption: &'a str,
    pub style: &'a StyleParams,
    pub filter: FilterId,
    /// Seed for stochastic filter stages (grain).
    pub noise_seed: u64,
}

/// Render a full frame: clear, fit, filter the image layer, blit it, then
/// lay out and paint the caption over it.
///
/// The filter runs on the image's own layer before the blit, so it can never
/// touch caption pixels. A degenerate fit (zero-size viewport) yields a bare
/// cleared frame.
#[tracing::instrument(skip_all, fields(
    width = viewport.width,
    height = viewport.height,
    filter = ?scene.filter,
))]
pub fn render_scene(
    scene: &Scene<'_>,
    viewport: Canvas,
    typeface: &dyn Typeface,
) -> CaptixResult<Surface> {
    let mut frame = Surface::filled(viewport, Rgba8::BLACK)?;

    let fit = fit_viewport(
        scene.image.natural_width(),
        scene.image.natural_height(),
        viewport,
    );
    if fit.is_degenerate() {
        return Ok(frame);
    }

    let layer_w = fit.rendered_width().round().max(1.0) as u32;
    let layer_h = fit.rendered_height().round().max(1.0) as u32;
    let mut layer = resample_bilinear(scene.image.pixels(), layer_w, layer_h)?;
    apply_filter(&mut layer, scene.filter, scene.noise_seed)?;
    frame.blit(
        &layer,
        fit.offset_x().round() as i32,
        fit.offset_y().round() as i32,
    );

    if !scene.caption.trim().is_empty() {
        let attrs = scene.style.text_attrs();
        let max_width = (fit.rendered_width() * CAPTION_WIDTH_FRACTION) as f32;
        let layout = layout_caption(scene.caption, max_width, typeface, &attrs);
        paint_caption(&mut frame, &layout, scene.style, &fit, typeface);
    }

    Ok(frame)
}
