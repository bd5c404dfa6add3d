use image::imageops;

use crate::assets::decode::SourceImage;
use crate::foundation::error::CaptixResult;

/// Rotate the source image 90 degrees clockwise, producing a new image with
/// swapped dimensions and a fresh generation.
///
/// Rotation is a source transform, not a view transform: every pixel moves
/// and later crops and exports operate on the rotated bitmap.
#[tracing::instrument(skip_all, fields(
    from_width = image.natural_width(),
    from_height = image.natural_height(),
))]
pub fn rotate_cw(image: &SourceImage) -> CaptixResult<SourceImage> {
    SourceImage::from_rgba(imageops::rotate90(image.pixels()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn rotation_swaps_dimensions() {
        let src = SourceImage::from_rgba(RgbaImage::new(30, 20)).unwrap();
        let rotated = rotate_cw(&src).unwrap();
        assert_eq!(rotated.natural_width(), 20);
        assert_eq!(rotated.natural_height(), 30);
        assert!(rotated.generation() > src.generation());
    }

    #[test]
    fn clockwise_moves_top_left_to_top_right() {
        let mut img = RgbaImage::from_pixel(3, 2, image::Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let rotated = rotate_cw(&SourceImage::from_rgba(img).unwrap()).unwrap();
        assert_eq!(rotated.pixels().get_pixel(1, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn four_rotations_restore_the_original() {
        let mut img = RgbaImage::from_pixel(5, 3, image::Rgba([10, 20, 30, 255]));
        img.put_pixel(4, 2, image::Rgba([200, 100, 50, 255]));
        let src = SourceImage::from_rgba(img.clone()).unwrap();
        let mut current = src;
        for _ in 0..4 {
            current = rotate_cw(&current).unwrap();
        }
        assert_eq!(current.pixels(), &img);
    }
}
