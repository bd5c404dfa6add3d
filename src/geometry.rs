use kurbo::Rect;

use crate::foundation::core::Canvas;

/// The centered, aspect-preserving rectangle a source image occupies inside a
/// viewport.
///
/// Derived and ephemeral: recomputed whenever the source image or the
/// viewport changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportFit {
    /// Rendered rectangle in viewport space. The origin is the centering
    /// offset.
    pub rect: Rect,
}

impl ViewportFit {
    pub fn rendered_width(&self) -> f64 {
        self.rect.width()
    }

    pub fn rendered_height(&self) -> f64 {
        self.rect.height()
    }

    pub fn offset_x(&self) -> f64 {
        self.rect.x0
    }

    pub fn offset_y(&self) -> f64 {
        self.rect.y0
    }

    /// Whether there is nothing drawable (zero-size viewport or image).
    pub fn is_degenerate(&self) -> bool {
        self.rect.width() <= 0.0 || self.rect.height() <= 0.0
    }
}

/// Map a source image's natural size into the largest centered rectangle of
/// the same aspect ratio that fits inside `viewport`.
///
/// A zero-size viewport or image yields a zero-size fit; the caller must skip
/// drawing in that case.
pub fn fit_viewport(natural_width: u32, natural_height: u32, viewport: Canvas) -> ViewportFit {
    if natural_width == 0 || natural_height == 0 || viewport.is_degenerate() {
        return ViewportFit { rect: Rect::ZERO };
    }

    let image_aspect = f64::from(natural_width) / f64::from(natural_height);
    let vw = f64::from(viewport.width);
    let vh = f64::from(viewport.height);
    let viewport_aspect = vw / vh;

    let (rendered_width, rendered_height) = if image_aspect > viewport_aspect {
        (vw, vw / image_aspect)
    } else {
        (vh * image_aspect, vh)
    };

    let offset_x = (vw - rendered_width) / 2.0;
    let offset_y = (vh - rendered_height) / 2.0;

    ViewportFit {
        rect: Rect::new(
            offset_x,
            offset_y,
            offset_x + rendered_width,
            offset_y + rendered_height,
        ),
    }
}
