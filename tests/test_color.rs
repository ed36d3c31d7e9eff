// tests/test_color.rs — Colour conversion, palette matching, region labels.

use frameseg::change::{detect_foreground, nearest, ChromaColor};
use frameseg::classify::{classify_regions, dominant_chroma, ColorLabel};
use frameseg::convert::{bgr_pixel_to_ycbcr, bgr_to_ycbcr, extract_channel, CB, CR, LUMA};
use frameseg::image::Image;
use frameseg::region::{Region, Run};

fn assert_close(got: [u8; 3], want: [u8; 3], what: &str) {
    for c in 0..3 {
        let diff = (got[c] as i16 - want[c] as i16).abs();
        assert!(diff <= 1, "{what}: channel {c} got {} want {}", got[c], want[c]);
    }
}

// ===== BGR → Y/Cb/Cr =====

#[test]
fn primaries_convert_to_reference_values() {
    assert_close(bgr_pixel_to_ycbcr([0, 0, 255]), [76, 85, 255], "red");
    assert_close(bgr_pixel_to_ycbcr([0, 255, 0]), [150, 44, 21], "green");
    assert_close(bgr_pixel_to_ycbcr([255, 0, 0]), [29, 255, 107], "blue");
    assert_close(bgr_pixel_to_ycbcr([128, 128, 128]), [128, 128, 128], "gray");
}

#[test]
fn frame_conversion_and_channel_extraction() {
    let src = Image::from_fn(4, 3, |x, _| if x < 2 { [0, 0, 255] } else { [255, 0, 0] });
    let mut ycbcr: Image<[u8; 3]> = Image::new(4, 3);
    bgr_to_ycbcr(&src, &mut ycbcr);

    let mut cb: Image<u8> = Image::new(4, 3);
    extract_channel(&ycbcr, CB, &mut cb);
    assert_eq!(cb.get(0, 0), ycbcr.get(0, 0)[CB]);
    assert!(cb.get(0, 2) < 128, "red has low Cb");
    assert!(cb.get(3, 2) > 128, "blue has high Cb");

    let mut luma: Image<u8> = Image::new(4, 3);
    extract_channel(&ycbcr, LUMA, &mut luma);
    assert!(luma.get(0, 0) > luma.get(3, 0), "red is brighter than blue");
}

#[test]
#[should_panic(expected = "out of range")]
fn extract_channel_rejects_bad_index() {
    let src: Image<[u8; 3]> = Image::new(2, 2);
    let mut dst: Image<u8> = Image::new(2, 2);
    extract_channel(&src, 3, &mut dst);
}

// ===== Palette matching =====

#[test]
fn exact_palette_match_picks_entry_zero() {
    let palette = [ChromaColor::new(90, 200), ChromaColor::new(91, 200)];
    let pixel = [77, 90, 200];
    assert_eq!(nearest(pixel, &palette), Some((0, 0)));

    let ycbcr = Image::from_vec(1, 1, vec![pixel]);
    for threshold in [0u16, 1, 10, 500] {
        let mut mask: Image<u8> = Image::new(1, 1);
        let mut colorized: Image<[u8; 3]> = Image::new(1, 1);
        let n = detect_foreground(&ycbcr, &palette, threshold, &mut mask, &mut colorized);
        assert_eq!(n, 1, "threshold {threshold}");
        assert_eq!(mask.get(0, 0), 255, "threshold {threshold}");
        assert_eq!(colorized.get(0, 0), [77, 90, 200]);
    }
}

#[test]
fn near_miss_still_needs_threshold_above_distance() {
    let palette = [ChromaColor::new(90, 200)];
    let ycbcr = Image::from_vec(1, 1, vec![[77, 91, 200]]);
    let mut mask: Image<u8> = Image::new(1, 1);
    let mut colorized: Image<[u8; 3]> = Image::new(1, 1);

    assert_eq!(detect_foreground(&ycbcr, &palette, 0, &mut mask, &mut colorized), 0);
    assert_eq!(detect_foreground(&ycbcr, &palette, 1, &mut mask, &mut colorized), 0);
    assert_eq!(detect_foreground(&ycbcr, &palette, 2, &mut mask, &mut colorized), 1);
    assert_eq!(mask.get(0, 0), 255);
}

#[test]
fn equidistant_entries_prefer_the_first() {
    let palette = [ChromaColor::new(100, 100), ChromaColor::new(120, 100)];
    assert_eq!(nearest([0, 110, 100], &palette), Some((0, 10)));
}

#[test]
fn luma_does_not_affect_matching() {
    let palette = [ChromaColor::new(60, 180)];
    let dark = nearest([10, 62, 181], &palette);
    let bright = nearest([240, 62, 181], &palette);
    assert_eq!(dark, bright);
}

#[test]
fn empty_palette_matches_nothing() {
    let ycbcr = Image::from_vec(2, 1, vec![[10, 20, 30], [40, 50, 60]]);
    let mut mask = Image::from_vec(2, 1, vec![255u8, 255]);
    let mut colorized: Image<[u8; 3]> = Image::new(2, 1);
    let n = detect_foreground(&ycbcr, &[], 1000, &mut mask, &mut colorized);
    assert_eq!(n, 0);
    assert_eq!(mask.count(0), 2);
}

// ===== Region labels =====

fn block(left: usize, top: usize, right: usize, bottom: usize) -> Region {
    let runs = (top..=bottom)
        .map(|row| Run { row, start: left, end: right })
        .collect();
    Region::from_runs(runs)
}

#[test]
fn dominant_chroma_is_per_region() {
    // Left half: strongly blue chroma; right half: faintly warm chroma.
    let ycbcr = Image::from_fn(10, 4, |x, _| {
        if x < 5 {
            [100, 220, 110]
        } else {
            [100, 100, 150]
        }
    });
    // The left region is much larger; a histogram leaking into the right
    // region would drag its dominant value to 220.
    let left = block(0, 0, 4, 3);
    let right = block(6, 1, 7, 1);

    assert_eq!(dominant_chroma(&left, &ycbcr), ChromaColor::new(220, 110));
    assert_eq!(dominant_chroma(&right, &ycbcr), ChromaColor::new(100, 150));
    assert_eq!(
        classify_regions(&[left, right], &ycbcr),
        vec![ColorLabel::Cool, ColorLabel::Warm]
    );
}

#[test]
fn majority_chroma_wins_within_region() {
    let ycbcr = Image::from_fn(6, 1, |x, _| if x < 4 { [0, 140, 0] } else { [0, 20, 0] });
    let region = block(0, 0, 5, 0);
    let chroma = dominant_chroma(&region, &ycbcr);
    assert_eq!(chroma.cb, 140);
    assert_eq!(ycbcr.get(0, 0)[CR], chroma.cr);
    assert_eq!(ColorLabel::from_cb(chroma.cb), ColorLabel::Cool);
}

#[test]
fn label_split_is_at_128() {
    assert_eq!(ColorLabel::from_cb(127), ColorLabel::Warm);
    assert_eq!(ColorLabel::from_cb(128), ColorLabel::Cool);
}
