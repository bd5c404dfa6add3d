use crate::assets::decode::{ImageGeneration, SourceImage, decode_image};
use crate::crop::{CropSession, commit_crop};
use crate::effects::filter::FilterId;
use crate::export::{ExportArtifact, export_png};
use crate::foundation::core::Canvas;
use crate::foundation::error::{CaptixError, CaptixResult};
use crate::params::StyleParams;
use crate::render::compositor::{Scene, render_scene};
use crate::render::surface::Surface;
use crate::rotate::rotate_cw;
use crate::text::typeface::Typeface;

/// A rendered frame stamped with the generation of the image it was produced
/// from, so callers juggling queued decodes can drop stale output.
#[derive(Clone, Debug)]
pub struct Frame {
    pub surface: Surface,
    pub generation: ImageGeneration,
}

/// One editing session: the current image, caption, style and filter, plus
/// an optional in-flight crop.
///
/// The session is the write side; [`EditSession::redraw`] is the read side
/// and recomputes the full frame from current state every time. Nothing is
/// cached between redraws.
pub struct EditSession {
    typeface: Box<dyn Typeface>,
    image: Option<SourceImage>,
    caption: String,
    style: StyleParams,
    filter: FilterId,
    noise_seed: u64,
    crop: Option<CropSession>,
}

impl EditSession {
    pub fn new(typeface: Box<dyn Typeface>) -> Self {
        Self {
            typeface,
            image: None,
            caption: String::new(),
            style: StyleParams::default(),
            filter: FilterId::None,
            noise_seed: 0,
            crop: None,
        }
    }

    /// Decode `bytes` and make the result the session's image.
    ///
    /// Replacing the image abandons any in-flight crop; the old selection is
    /// meaningless against the new bitmap.
    #[tracing::instrument(skip_all, fields(len = bytes.len()))]
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> CaptixResult<ImageGeneration> {
        let image = decode_image(bytes)?;
        Ok(self.replace_image(image))
    }

    /// Adopt an already-decoded image.
    pub fn set_image(&mut self, image: SourceImage) -> ImageGeneration {
        self.replace_image(image)
    }

    fn replace_image(&mut self, image: SourceImage) -> ImageGeneration {
        let generation = image.generation();
        self.image = Some(image);
        self.crop = None;
        generation
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, text: impl Into<String>) {
        self.caption = text.into();
    }

    pub fn style(&self) -> &StyleParams {
        &self.style
    }

    /// Validate and adopt a new style. Rejected styles leave the session
    /// unchanged.
    pub fn set_style(&mut self, style: StyleParams) -> CaptixResult<()> {
        style.validate()?;
        self.style = style;
        Ok(())
    }

    pub fn filter(&self) -> FilterId {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterId) {
        self.filter = filter;
    }

    /// Reseed the stochastic filter stages (grain). A fixed seed makes
    /// redraws reproducible.
    pub fn set_noise_seed(&mut self, seed: u64) {
        self.noise_seed = seed;
    }

    /// Render the current state into `viewport`. `None` until an image has
    /// been loaded.
    pub fn redraw(&self, viewport: Canvas) -> CaptixResult<Option<Frame>> {
        let Some(image) = self.image.as_ref() else {
            return Ok(None);
        };
        let scene = Scene {
            image,
            caption: &self.caption,
            style: &self.style,
            filter: self.filter,
            noise_seed: self.noise_seed,
        };
        let surface = render_scene(&scene, viewport, self.typeface.as_ref())?;
        Ok(Some(Frame {
            surface,
            generation: image.generation(),
        }))
    }

    /// Open an interactive crop over the current image.
    pub fn begin_crop(&mut self) -> CaptixResult<&mut CropSession> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| CaptixError::validation("no image loaded to crop"))?;
        let session = CropSession::begin(image.natural_width(), image.natural_height())?;
        Ok(self.crop.insert(session))
    }

    pub fn crop(&self) -> Option<&CropSession> {
        self.crop.as_ref()
    }

    pub fn crop_mut(&mut self) -> Option<&mut CropSession> {
        self.crop.as_mut()
    }

    /// Commit the in-flight crop, replacing the session's image.
    pub fn apply_crop(&mut self) -> CaptixResult<ImageGeneration> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| CaptixError::validation("no image loaded to crop"))?;
        let session = self
            .crop
            .as_ref()
            .ok_or_else(|| CaptixError::validation("no crop in progress"))?;
        let cropped = commit_crop(image, session)?;
        Ok(self.replace_image(cropped))
    }

    /// Abandon the in-flight crop; the image is untouched.
    pub fn cancel_crop(&mut self) {
        self.crop = None;
    }

    /// Rotate the image 90 degrees clockwise. Abandons any in-flight crop.
    pub fn rotate_cw(&mut self) -> CaptixResult<ImageGeneration> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| CaptixError::validation("no image loaded to rotate"))?;
        let rotated = rotate_cw(image)?;
        Ok(self.replace_image(rotated))
    }

    /// Render the current state and encode it as an upscaled PNG.
    pub fn export(&self, viewport: Canvas, prefix: &str) -> CaptixResult<ExportArtifact> {
        let frame = self
            .redraw(viewport)?
            .ok_or_else(|| CaptixError::validation("no image loaded to export"))?;
        export_png(&frame.surface, prefix)
    }
}
