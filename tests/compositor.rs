use captix::{
    Canvas, FilterId, Rgba8, Scene, SourceImage, StyleParams, Typeface, render_scene,
};
use captix::text::typeface::{LineRaster, TextAttrs};
use image::RgbaImage;

/// Deterministic typeface: every char advances 10px and inks a solid block,
/// so tests need no font files.
struct BlockFace;

impl Typeface for BlockFace {
    fn measure_line(&self, text: &str, _attrs: &TextAttrs) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    fn raster_line(&self, text: &str, attrs: &TextAttrs) -> LineRaster {
        let width = self.measure_line(text, attrs).ceil() as u32;
        let height = attrs.size_px.ceil() as u32;
        LineRaster {
            width,
            height,
            left: 0,
            top: -(height as i32),
            coverage: vec![1.0; width as usize * height as usize],
        }
    }
}

fn gradient_image(w: u32, h: u32) -> SourceImage {
    let img = RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 120, 255])
    });
    SourceImage::from_rgba(img).unwrap()
}

#[test]
fn wide_image_is_letterboxed_top_and_bottom() {
    let img = gradient_image(1000, 500);
    let style = StyleParams::default();
    let scene = Scene {
        image: &img,
        caption: "",
        style: &style,
        filter: FilterId::None,
        noise_seed: 0,
    };
    let frame = render_scene(&scene, Canvas::new(500, 400), &BlockFace).unwrap();

    // 2:1 image in a 5:4 viewport renders 500x250 with 75px bars.
    assert_eq!(frame.pixel(250, 10), Rgba8::BLACK);
    assert_eq!(frame.pixel(250, 390), Rgba8::BLACK);
    assert_ne!(frame.pixel(250, 200), Rgba8::BLACK);
}

#[test]
fn caption_panel_sits_above_the_image_bottom() {
    let img = gradient_image(1000, 800);
    let mut style = StyleParams::default();
    style.opacity_percent = 100;
    style.bg_color = captix::Color::new(0, 0, 255);
    style.stroke_width_px = 0;
    let scene = Scene {
        image: &img,
        caption: "Hello world",
        style: &style,
        filter: FilterId::None,
        noise_seed: 0,
    };
    // 1000x800 fills a 500x400 viewport exactly.
    let frame = render_scene(&scene, Canvas::new(500, 400), &BlockFace).unwrap();

    // Panel: 110px of text + 32 padding = 142 wide, 33.6 + 16 = 49.6 tall,
    // bottom edge 24px above y=400.
    let panel_bottom = 400.0 - 24.0;
    let panel_top = panel_bottom - (28.0 * 1.2 + 16.0);
    let probe_y = (panel_top + 3.0) as u32;
    assert_eq!(frame.pixel(250, probe_y), Rgba8::new(0, 0, 255, 255));
    // Just above the panel the gradient shows through.
    assert_ne!(frame.pixel(250, probe_y - 6), Rgba8::new(0, 0, 255, 255));
    // Below the gap the image is back.
    assert_ne!(frame.pixel(250, 390), Rgba8::new(0, 0, 255, 255));
}

#[test]
fn filters_never_touch_caption_pixels() {
    let img = SourceImage::from_rgba(RgbaImage::from_pixel(
        400,
        400,
        image::Rgba([30, 180, 70, 255]),
    ))
    .unwrap();
    let mut style = StyleParams::default();
    style.opacity_percent = 100;
    style.bg_color = captix::Color::new(200, 40, 40);

    let plain = Scene {
        image: &img,
        caption: "Caption",
        style: &style,
        filter: FilterId::None,
        noise_seed: 0,
    };
    let filtered = Scene {
        filter: FilterId::Grayscale,
        ..plain
    };
    let a = render_scene(&plain, Canvas::new(400, 400), &BlockFace).unwrap();
    let b = render_scene(&filtered, Canvas::new(400, 400), &BlockFace).unwrap();

    // Image pixels desaturate.
    let img_px = a.pixel(200, 100);
    assert_ne!(img_px, b.pixel(200, 100));
    // Every pixel of the panel interior is identical across the two renders
    // (edge rows are skipped: their antialiasing blends with the image).
    let panel_bottom = 400 - 24 - 4;
    let panel_top = panel_bottom - 42;
    for y in panel_top..panel_bottom {
        for x in 155..245 {
            assert_eq!(a.pixel(x, y), b.pixel(x, y), "caption drift at {x},{y}");
        }
    }
}

#[test]
fn multi_pass_filters_compose_over_the_blit() {
    let img = gradient_image(200, 200);
    let style = StyleParams::default();
    let base = Scene {
        image: &img,
        caption: "",
        style: &style,
        filter: FilterId::None,
        noise_seed: 7,
    };
    let cinematic = Scene {
        filter: FilterId::Cinematic,
        ..base
    };
    let grainy = Scene {
        filter: FilterId::Grainy,
        ..base
    };

    let plain = render_scene(&base, Canvas::new(200, 200), &BlockFace).unwrap();
    let c = render_scene(&cinematic, Canvas::new(200, 200), &BlockFace).unwrap();
    let g = render_scene(&grainy, Canvas::new(200, 200), &BlockFace).unwrap();
    assert_ne!(plain, c);
    assert_ne!(plain, g);
    assert_ne!(c, g);

    // Grainy output is reproducible for a fixed seed.
    let g2 = render_scene(&grainy, Canvas::new(200, 200), &BlockFace).unwrap();
    assert_eq!(g, g2);
}

#[test]
fn long_captions_wrap_within_the_image_width() {
    let img = gradient_image(400, 400);
    let mut style = StyleParams::default();
    style.opacity_percent = 100;
    style.bg_color = captix::Color::new(255, 255, 0);
    style.stroke_width_px = 0;

    // 36 chars = 360px of text against a 0.9 * 400 = 360px limit; the space
    // forces a wrap into two lines, so the panel grows taller but narrower.
    let scene = Scene {
        image: &img,
        caption: "aaaaaaaaaaaaaaaaaa bbbbbbbbbbbbbbbbbb",
        style: &style,
        filter: FilterId::None,
        noise_seed: 0,
    };
    let frame = render_scene(&scene, Canvas::new(400, 400), &BlockFace).unwrap();

    let yellow = Rgba8::new(255, 255, 0, 255);
    let is_yellow = |x: u32, y: u32| frame.pixel(x, y) == yellow;
    // Two 33.6px lines plus padding: the panel reaches higher than a single
    // line ever could.
    let two_line_top = (400.0 - 24.0 - (2.0 * 33.6 + 16.0) + 3.0) as u32;
    assert!(is_yellow(200, two_line_top));
    // A single 180px line + 32 = 212 wide panel; x=60 is inside a one-line
    // 360px-wide panel but outside the wrapped one.
    assert!(!is_yellow(60, two_line_top));
}
