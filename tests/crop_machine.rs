use captix::crop::{CropSession, HANDLE_TOLERANCE, MIN_SIZE, commit_crop};
use captix::{Handle, SourceImage};
use image::RgbaImage;

#[test]
fn scripted_drag_sequence_matches_expected_geometry() {
    // 1600x1000 source: width clamps to 800 (height 500), which also fills
    // the height bound exactly.
    let mut s = CropSession::begin(1600, 1000).unwrap();
    assert_eq!(s.canvas_width(), 800.0);
    assert_eq!(s.canvas_height(), 500.0);
    let a = s.area();
    assert_eq!((a.x, a.y, a.width, a.height), (20.0, 20.0, 760.0, 460.0));

    // Drag the bottom-right corner inward by (200, 100).
    s.pointer_down(a.right(), a.bottom());
    s.pointer_move(a.right() - 200.0, a.bottom() - 100.0);
    s.pointer_up();
    let a = s.area();
    assert_eq!((a.width, a.height), (560.0, 360.0));

    // Move the selection right past the canvas edge; it clamps flush.
    s.pointer_down(a.x + 100.0, a.y + 100.0);
    s.pointer_move(a.x + 100.0 + 500.0, a.y + 100.0);
    s.pointer_up();
    let a = s.area();
    assert_eq!(a.right(), 800.0);
    assert_eq!(a.y, 20.0);
}

#[test]
fn corner_wins_over_edge_and_interior_within_tolerance() {
    let s = CropSession::begin(600, 600).unwrap();
    let a = s.area();

    // A point near the top-left corner but also inside the rectangle.
    let x = a.x + HANDLE_TOLERANCE - 1.0;
    let y = a.y + HANDLE_TOLERANCE - 1.0;
    assert_eq!(s.hit_test(x, y), Some(Handle::TopLeft));

    // Just past corner tolerance on the top edge midline resolves as Top.
    let mid_x = a.x + a.width / 2.0;
    assert_eq!(s.hit_test(mid_x, a.y + 2.0), Some(Handle::Top));

    // Deep interior is a move grab; far outside is nothing.
    assert_eq!(
        s.hit_test(a.x + a.width / 2.0, a.y + a.height / 2.0 + 20.0),
        Some(Handle::Move)
    );
    assert_eq!(s.hit_test(0.0, 0.0), None);
}

#[test]
fn opposing_drags_respect_the_minimum_size() {
    let mut s = CropSession::begin(600, 600).unwrap();
    let a = s.area();

    // Collapse from the left edge; width pins at MIN_SIZE with the right
    // edge anchored.
    s.pointer_down(a.x, a.y + a.height / 2.0);
    s.pointer_move(a.right() + 300.0, a.y + a.height / 2.0);
    s.pointer_up();
    let after = s.area();
    assert_eq!(after.width, MIN_SIZE);
    assert_eq!(after.right(), a.right());
}

#[test]
fn commit_scales_back_to_source_resolution() {
    let source =
        SourceImage::from_rgba(RgbaImage::from_pixel(4000, 3000, image::Rgba([9, 9, 9, 255])))
            .unwrap();
    let mut s = CropSession::begin(4000, 3000).unwrap();

    // Walk the selection to a known rectangle: top-left to (100, 50),
    // bottom-right to (500, 350).
    let a = s.area();
    s.pointer_down(a.x, a.y);
    s.pointer_move(100.0, 50.0);
    s.pointer_up();
    let a = s.area();
    s.pointer_down(a.right(), a.bottom());
    s.pointer_move(500.0, 350.0);
    s.pointer_up();

    let a = s.area();
    assert_eq!((a.x, a.y), (100.0, 50.0));
    assert_eq!((a.width, a.height), (400.0, 300.0));

    // Canvas is 666.67x500, so scale is 6x per axis.
    let cropped = commit_crop(&source, &s).unwrap();
    assert_eq!(cropped.natural_width(), 2400);
    assert_eq!(cropped.natural_height(), 1800);
}

#[test]
fn drag_fuzz_keeps_every_invariant() {
    let mut s = CropSession::begin(2400, 1600).unwrap();
    let mut state = 0x853C_49E6_748F_EA9Bu64;
    let mut rand = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) % 1800) as f64 - 900.0
    };

    for _ in 0..1000 {
        let x = rand().abs();
        let y = rand().abs() / 2.0;
        s.pointer_down(x, y);
        s.pointer_move(x + rand(), y + rand());
        s.pointer_move(x + rand(), y + rand());
        s.pointer_up();

        let a = s.area();
        assert!(a.x >= 0.0 && a.y >= 0.0, "selection escaped at origin side");
        assert!(a.right() <= s.canvas_width() + 1e-9);
        assert!(a.bottom() <= s.canvas_height() + 1e-9);
        assert!(a.width >= MIN_SIZE - 1e-9);
        assert!(a.height >= MIN_SIZE - 1e-9);

        // A commit is always legal mid-stream.
        let (cx, cy, cw, ch) = s.source_rect(2400, 1600);
        assert!(cw >= 1 && ch >= 1);
        assert!(cx + cw <= 2400 && cy + ch <= 1600);
    }
}
