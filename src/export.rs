use std::io::Cursor;
use std::time::{SystemTime, UNIX_EPOCH};

use image::imageops::FilterType;
use image::{ImageFormat, imageops};

use crate::foundation::error::{CaptixError, CaptixResult};
use crate::render::surface::Surface;

/// Upscale factor for exported frames.
pub const EXPORT_SCALE: u32 = 2;

/// A finished export: encoded PNG bytes plus the suggested filename.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    pub filename: String,
    pub png: Vec<u8>,
}

/// Encode a rendered frame as a PNG at `EXPORT_SCALE` times its size.
///
/// The upscale uses Catmull-Rom resampling; the preview path's bilinear
/// filter is not sharp enough for a 2x blow-up. `prefix` becomes the filename
/// stem, suffixed with the current epoch milliseconds so repeated exports
/// never collide.
#[tracing::instrument(skip_all, fields(
    frame_width = frame.width(),
    frame_height = frame.height(),
))]
pub fn export_png(frame: &Surface, prefix: &str) -> CaptixResult<ExportArtifact> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(CaptixError::encode("cannot export an empty frame"));
    }

    let base = frame.to_rgba_image()?;
    let scaled = imageops::resize(
        &base,
        frame.width() * EXPORT_SCALE,
        frame.height() * EXPORT_SCALE,
        FilterType::CatmullRom,
    );

    let mut png = Vec::new();
    scaled
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| CaptixError::encode(format!("failed to encode png: {e}")))?;

    let epoch_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| CaptixError::encode(format!("system clock before unix epoch: {e}")))?
        .as_millis();
    let filename = export_filename(prefix, epoch_ms);

    tracing::info!(filename = %filename, bytes = png.len(), "exported frame");
    Ok(ExportArtifact { filename, png })
}

/// `<prefix>-<epoch_ms>.png`, split out for deterministic tests.
pub fn export_filename(prefix: &str, epoch_ms: u128) -> String {
    format!("{prefix}-{epoch_ms}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Canvas, Rgba8};

    #[test]
    fn filename_combines_prefix_and_timestamp() {
        assert_eq!(export_filename("captioned-image", 1700000000000), "captioned-image-1700000000000.png");
    }

    #[test]
    fn export_produces_png_bytes_at_double_size() {
        let frame = Surface::filled(Canvas::new(40, 30), Rgba8::new(1, 2, 3, 255)).unwrap();
        let artifact = export_png(&frame, "captioned-image").unwrap();
        assert_eq!(&artifact.png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        let decoded = image::load_from_memory(&artifact.png).unwrap();
        assert_eq!(decoded.width(), 80);
        assert_eq!(decoded.height(), 60);
        assert!(artifact.filename.starts_with("captioned-image-"));
        assert!(artifact.filename.ends_with(".png"));
    }

    #[test]
    fn empty_frame_is_an_encode_error() {
        let frame = Surface::new(Canvas::new(0, 0)).unwrap();
        let err = export_png(&frame, "x").unwrap_err();
        assert!(err.to_string().contains("encode error:"));
    }
}
