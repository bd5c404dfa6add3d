use kurbo::Point;

use crate::assets::decode::SourceImage;
use crate::foundation::error::{CaptixError, CaptixResult};

/// Pointer distance within which a handle grabs, in crop-canvas pixels.
pub const HANDLE_TOLERANCE: f64 = 15.0;
/// Smallest selection the drag math allows, per axis.
pub const MIN_SIZE: f64 = 50.0;
/// Crop canvas bounds; the source image is downscaled (never upscaled) to
/// fit inside them.
pub const MAX_CANVAS_WIDTH: f64 = 800.0;
pub const MAX_CANVAS_HEIGHT: f64 = 500.0;
/// Inset of the initial selection from the canvas edges.
pub const INITIAL_PADDING: f64 = 20.0;

/// What the pointer grabbed. Corners beat edges beats the interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
    Move,
}

/// The selection rectangle in crop-canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropArea {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// One interactive crop, from open to commit or cancel.
///
/// The session owns the pointer state machine: a `pointer_down` that hits a
/// handle arms a drag, `pointer_move` mutates the selection with per-handle
/// clamp rules, `pointer_up` disarms. Moves without an armed handle are
/// ignored, so stray pointer traffic cannot corrupt the selection.
#[derive(Clone, Debug)]
pub struct CropSession {
    canvas_width: f64,
    canvas_height: f64,
    area: CropArea,
    active: Option<Handle>,
    last: Point,
}

impl CropSession {
    /// Open a crop over an image of the given natural size.
    ///
    /// The canvas is the image downscaled to fit within
    /// `MAX_CANVAS_WIDTH x MAX_CANVAS_HEIGHT`; images already inside those
    /// bounds keep their natural size. The initial selection is the full
    /// canvas inset by `INITIAL_PADDING`, less when the canvas is too small
    /// to keep a `MIN_SIZE` selection.
    pub fn begin(natural_width: u32, natural_height: u32) -> CaptixResult<Self> {
        if natural_width == 0 || natural_height == 0 {
            return Err(CaptixError::validation("cannot crop an empty image"));
        }

        let mut width = f64::from(natural_width);
        let mut height = f64::from(natural_height);
        if width > MAX_CANVAS_WIDTH {
            height = (MAX_CANVAS_WIDTH / width) * height;
            width = MAX_CANVAS_WIDTH;
        }
        if height > MAX_CANVAS_HEIGHT {
            width = (MAX_CANVAS_HEIGHT / height) * width;
            height = MAX_CANVAS_HEIGHT;
        }

        let pad_x = INITIAL_PADDING.min(((width - MIN_SIZE) / 2.0).max(0.0));
        let pad_y = INITIAL_PADDING.min(((height - MIN_SIZE) / 2.0).max(0.0));

        Ok(Self {
            canvas_width: width,
            canvas_height: height,
            area: CropArea {
                x: pad_x,
                y: pad_y,
                width: width - pad_x * 2.0,
                height: height - pad_y * 2.0,
            },
            active: None,
            last: Point::ZERO,
        })
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    pub fn area(&self) -> CropArea {
        self.area
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Resolve what a press at `(x, y)` would grab. Corner handles are
    /// checked first, then edge midpoints, then the interior.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<Handle> {
        let a = &self.area;
        let near = |p: f64, q: f64| (p - q).abs() < HANDLE_TOLERANCE;

        if near(x, a.x) && near(y, a.y) {
            return Some(Handle::TopLeft);
        }
        if near(x, a.right()) && near(y, a.y) {
            return Some(Handle::TopRight);
        }
        if near(x, a.x) && near(y, a.bottom()) {
            return Some(Handle::BottomLeft);
        }
        if near(x, a.right()) && near(y, a.bottom()) {
            return Some(Handle::BottomRight);
        }

        let mid_x = a.x + a.width / 2.0;
        let mid_y = a.y + a.height / 2.0;
        if near(x, mid_x) && near(y, a.y) {
            return Some(Handle::Top);
        }
        if near(x, mid_x) && near(y, a.bottom()) {
            return Some(Handle::Bottom);
        }
        if near(x, a.x) && near(y, mid_y) {
            return Some(Handle::Left);
        }
        if near(x, a.right()) && near(y, mid_y) {
            return Some(Handle::Right);
        }

        if a.contains(x, y) {
            return Some(Handle::Move);
        }
        None
    }

    /// Arm a drag if the press hits a handle. Returns what was grabbed.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<Handle> {
        self.active = self.hit_test(x, y);
        self.last = Point::new(x, y);
        self.active
    }

    /// Apply one pointer movement to the armed handle.
    ///
    /// Each handle clamps independently: resize handles pin the opposite
    /// edge, keep at least `MIN_SIZE` on the moving axis and never cross the
    /// canvas bounds; `Move` translates rigidly within the canvas.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let Some(handle) = self.active else {
            return;
        };
        let dx = x - self.last.x;
        let dy = y - self.last.y;
        let a = self.area;
        let mut next = a;

        match handle {
            Handle::TopLeft => {
                next.x = (a.x + dx).clamp(0.0, a.right() - MIN_SIZE);
                next.y = (a.y + dy).clamp(0.0, a.bottom() - MIN_SIZE);
                next.width = a.width - (next.x - a.x);
                next.height = a.height - (next.y - a.y);
            }
            Handle::TopRight => {
                next.y = (a.y + dy).clamp(0.0, a.bottom() - MIN_SIZE);
                next.width = (a.width + dx).clamp(MIN_SIZE, self.canvas_width - a.x);
                next.height = a.height - (next.y - a.y);
            }
            Handle::BottomLeft => {
                next.x = (a.x + dx).clamp(0.0, a.right() - MIN_SIZE);
                next.width = a.width - (next.x - a.x);
                next.height = (a.height + dy).clamp(MIN_SIZE, self.canvas_height - a.y);
            }
            Handle::BottomRight => {
                next.width = (a.width + dx).clamp(MIN_SIZE, self.canvas_width - a.x);
                next.height = (a.height + dy).clamp(MIN_SIZE, self.canvas_height - a.y);
            }
            Handle::Top => {
                next.y = (a.y + dy).clamp(0.0, a.bottom() - MIN_SIZE);
                next.height = a.height - (next.y - a.y);
            }
            Handle::Bottom => {
                next.height = (a.height + dy).clamp(MIN_SIZE, self.canvas_height - a.y);
            }
            Handle::Left => {
                next.x = (a.x + dx).clamp(0.0, a.right() - MIN_SIZE);
                next.width = a.width - (next.x - a.x);
            }
            Handle::Right => {
                next.width = (a.width + dx).clamp(MIN_SIZE, self.canvas_width - a.x);
            }
            Handle::Move => {
                next.x = (a.x + dx).clamp(0.0, self.canvas_width - a.width);
                next.y = (a.y + dy).clamp(0.0, self.canvas_height - a.height);
            }
        }

        self.area = next;
        self.last = Point::new(x, y);
    }

    /// Disarm the drag. The selection keeps its last value.
    pub fn pointer_up(&mut self) {
        self.active = None;
    }

    /// Map the selection back to source-image pixels.
    pub fn source_rect(&self, natural_width: u32, natural_height: u32) -> (u32, u32, u32, u32) {
        scale_to_source(
            self.area,
            self.canvas_width,
            self.canvas_height,
            natural_width,
            natural_height,
        )
    }
}

/// Scale a canvas-space selection to source-image pixels.
///
/// The per-axis scale undoes the canvas downscale; results are rounded and
/// clamped so the rectangle always lies inside the image and is at least one
/// pixel on each axis.
pub fn scale_to_source(
    area: CropArea,
    canvas_width: f64,
    canvas_height: f64,
    natural_width: u32,
    natural_height: u32,
) -> (u32, u32, u32, u32) {
    let scale_x = f64::from(natural_width) / canvas_width;
    let scale_y = f64::from(natural_height) / canvas_height;

    let x = ((area.x * scale_x).round() as i64).clamp(0, i64::from(natural_width) - 1) as u32;
    let y = ((area.y * scale_y).round() as i64).clamp(0, i64::from(natural_height) - 1) as u32;
    let w = ((area.width * scale_x).round() as i64).clamp(1, i64::from(natural_width)) as u32;
    let h = ((area.height * scale_y).round() as i64).clamp(1, i64::from(natural_height)) as u32;
    let w = w.min(natural_width - x);
    let h = h.min(natural_height - y);
    (x, y, w, h)
}

/// Commit a crop: cut the session's selection out of the full-resolution
/// source and stamp the result as a new image.
#[tracing::instrument(skip_all, fields(
    from_width = image.natural_width(),
    from_height = image.natural_height(),
))]
pub fn commit_crop(image: &SourceImage, session: &CropSession) -> CaptixResult<SourceImage> {
    let (x, y, w, h) = session.source_rect(image.natural_width(), image.natural_height());
    let cropped = image::imageops::crop_imm(image.pixels(), x, y, w, h).to_image();
    tracing::debug!(x, y, width = w, height = h, "committed crop");
    SourceImage::from_rgba(cropped)
}
