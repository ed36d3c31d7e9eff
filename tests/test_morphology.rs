// tests/test_morphology.rs — 3×3 erosion, dilation, opening on {0, 255} masks.

use frameseg::image::Image;
use frameseg::morphology::{close3x3, dilate3x3, erode3x3, open3x3};

/// Mask with the given inclusive rectangles set to 255.
fn make_mask(w: usize, h: usize, rects: &[(usize, usize, usize, usize)]) -> Image<u8> {
    Image::from_fn(w, h, |x, y| {
        let inside = rects
            .iter()
            .any(|&(l, t, r, b)| x >= l && x <= r && y >= t && y <= b);
        if inside {
            255
        } else {
            0
        }
    })
}

#[test]
fn isolated_pixel_removed_by_opening() {
    let mut mask: Image<u8> = Image::new(12, 12);
    mask.set(6, 6, 255);
    let mut scratch: Image<u8> = Image::new(12, 12);
    open3x3(&mut mask, &mut scratch, 1);
    assert_eq!(mask.count(255), 0);
}

#[test]
fn thin_line_removed_by_opening() {
    // 1- and 2-pixel wide lines cannot hold a 3×3 square.
    let mut mask = make_mask(20, 20, &[(2, 4, 17, 4), (2, 10, 17, 11)]);
    let mut scratch: Image<u8> = Image::new(20, 20);
    open3x3(&mut mask, &mut scratch, 1);
    assert_eq!(mask.count(255), 0);
}

#[test]
fn erosion_shrinks_rectangle_by_one_ring() {
    let src = make_mask(20, 16, &[(4, 3, 13, 10)]);
    let mut eroded: Image<u8> = Image::new(20, 16);
    erode3x3(&src, &mut eroded, 1);

    let expected = make_mask(20, 16, &[(5, 4, 12, 9)]);
    assert_eq!(eroded.as_slice(), expected.as_slice());
}

#[test]
fn dilation_restores_eroded_rectangle() {
    let original = make_mask(20, 16, &[(4, 3, 13, 10)]);
    let mut eroded: Image<u8> = Image::new(20, 16);
    let mut restored: Image<u8> = Image::new(20, 16);
    erode3x3(&original, &mut eroded, 1);
    dilate3x3(&eroded, &mut restored, 1);
    assert_eq!(restored.as_slice(), original.as_slice());
}

#[test]
fn opening_preserves_large_blob_and_drops_speck() {
    let mut mask = make_mask(24, 24, &[(3, 3, 10, 10), (18, 18, 18, 18)]);
    let blob_only = make_mask(24, 24, &[(3, 3, 10, 10)]);
    let mut scratch: Image<u8> = Image::new(24, 24);
    open3x3(&mut mask, &mut scratch, 1);
    assert_eq!(mask.as_slice(), blob_only.as_slice());
}

#[test]
fn closing_fills_single_pixel_gap() {
    let mut mask = make_mask(16, 16, &[(3, 3, 11, 11)]);
    mask.set(7, 7, 0);
    let mut scratch: Image<u8> = Image::new(16, 16);
    close3x3(&mut mask, &mut scratch, 1);
    assert_eq!(mask.get(7, 7), 255);
}

#[test]
fn border_pixels_never_written() {
    // Full-white source: interior stays 255 under erosion only if the
    // window never leaves the frame, and the border keeps its old content.
    let src = Image::from_vec(10, 10, vec![255u8; 100]);
    let mut dst = Image::from_vec(10, 10, vec![3u8; 100]);
    erode3x3(&src, &mut dst, 2);
    for y in 0..10 {
        for x in 0..10 {
            let interior = (2..8).contains(&x) && (2..8).contains(&y);
            assert_eq!(dst.get(x, y), if interior { 255 } else { 3 }, "({x},{y})");
        }
    }
}

#[test]
#[should_panic(expected = "border of at least 1")]
fn zero_border_rejected() {
    let src: Image<u8> = Image::new(8, 8);
    let mut dst: Image<u8> = Image::new(8, 8);
    dilate3x3(&src, &mut dst, 0);
}
