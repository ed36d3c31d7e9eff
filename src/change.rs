// change.rs — Foreground detection by nearest reference colour in chroma space.
//
// The scene background is known not to contain a handful of reference
// colours (the palette). A pixel belongs to the foreground when its chroma
// is close enough to one of them:
//
//   d_i = |Cb - cb_i| + |Cr - cr_i|          (L1 distance, luma ignored)
//   best = argmin_i d_i                       (first entry wins ties)
//   foreground  <=>  d_best < distance_threshold  or  d_best == 0
//
// An exact palette hit is always foreground, even at threshold 0.
//
// Ignoring Y makes the match tolerant of lighting changes: a red object in
// shadow and in sunlight has roughly the same Cb/Cr.
//
// Input: a Y/Cb/Cr buffer from `convert::bgr_to_ycbcr`.
// Output: a {0, 255} mask over the full frame (no border), plus a
// visualization buffer where every matched pixel takes its palette chroma.
//
// `background_difference` is the plain alternative: compare luma against
// the previous frame and flag pixels that moved more than a threshold.

use crate::convert::{CB, CR, LUMA};
use crate::image::{assert_same_shape, Image};

/// A reference colour expressed in chroma only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChromaColor {
    pub cb: u8,
    pub cr: u8,
}

impl ChromaColor {
    pub const fn new(cb: u8, cr: u8) -> Self {
        ChromaColor { cb, cr }
    }

    /// Chroma of a [Y, Cb, Cr] pixel.
    #[inline]
    pub fn of(pixel: [u8; 3]) -> Self {
        ChromaColor {
            cb: pixel[CB],
            cr: pixel[CR],
        }
    }

    /// L1 distance in the Cb/Cr plane.
    #[inline]
    pub fn distance(self, other: ChromaColor) -> u16 {
        self.cb.abs_diff(other.cb) as u16 + self.cr.abs_diff(other.cr) as u16
    }
}

/// Index and distance of the palette entry nearest to `pixel`'s chroma.
///
/// Returns `None` only for an empty palette. On equal distances the entry
/// that comes first in the palette wins.
pub fn nearest(pixel: [u8; 3], palette: &[ChromaColor]) -> Option<(usize, u16)> {
    let chroma = ChromaColor::of(pixel);
    let mut best: Option<(usize, u16)> = None;
    for (i, &entry) in palette.iter().enumerate() {
        let d = chroma.distance(entry);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best
}

/// Classify every pixel of `ycbcr` against `palette`.
///
/// Writes 255 into `mask` for pixels whose nearest palette entry is closer
/// than `distance_threshold` or matches exactly, 0 otherwise. For matched
/// pixels `colorized` receives `[Y, cb, cr]` of the matched entry; unmatched
/// pixels get their own Y/Cb/Cr, so every pixel of `colorized` is rewritten.
///
/// Returns the number of foreground pixels. An empty palette matches
/// nothing and yields an all-zero mask.
///
/// # Panics
/// Panics if the three buffers differ in shape.
pub fn detect_foreground(
    ycbcr: &Image<[u8; 3]>,
    palette: &[ChromaColor],
    distance_threshold: u16,
    mask: &mut Image<u8>,
    colorized: &mut Image<[u8; 3]>,
) -> usize {
    assert_same_shape(ycbcr, mask);
    assert_same_shape(ycbcr, colorized);

    let mut foreground = 0;
    let pixels = ycbcr.as_slice();
    let mask_px = mask.as_mut_slice();
    let vis_px = colorized.as_mut_slice();

    for (i, &pixel) in pixels.iter().enumerate() {
        match nearest(pixel, palette) {
            Some((idx, d)) if d == 0 || d < distance_threshold => {
                let entry = palette[idx];
                mask_px[i] = 255;
                vis_px[i] = [pixel[LUMA], entry.cb, entry.cr];
                foreground += 1;
            }
            _ => {
                mask_px[i] = 0;
                vis_px[i] = pixel;
            }
        }
    }

    foreground
}

/// Mark pixels whose luma moved by more than `threshold` since `background`.
///
/// Writes 255/0 into `mask` over the full frame and returns the number of
/// changed pixels. Only one previous frame is compared; there is no
/// running background model.
pub fn background_difference(
    current: &Image<u8>,
    background: &Image<u8>,
    threshold: u8,
    mask: &mut Image<u8>,
) -> usize {
    assert_same_shape(current, background);
    assert_same_shape(current, mask);

    let mut changed = 0;
    let pairs = current.as_slice().iter().zip(background.as_slice());
    for (m, (&c, &b)) in mask.as_mut_slice().iter_mut().zip(pairs) {
        if c.abs_diff(b) > threshold {
            *m = 255;
            changed += 1;
        } else {
            *m = 0;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_difference() {
        let bg = Image::from_vec(3, 1, vec![100u8, 100, 100]);
        let cur = Image::from_vec(3, 1, vec![100u8, 120, 60]);
        let mut mask: Image<u8> = Image::new(3, 1);
        assert_eq!(background_difference(&cur, &bg, 20, &mut mask), 1);
        assert_eq!(mask.as_slice(), &[0, 0, 255]);
    }

    #[test]
    fn test_distance_ignores_luma() {
        let a = ChromaColor::of([10, 100, 150]);
        let b = ChromaColor::of([240, 100, 150]);
        assert_eq!(a.distance(b), 0);
    }

    #[test]
    fn test_nearest_tie_prefers_first() {
        let palette = [ChromaColor::new(100, 100), ChromaColor::new(120, 100)];
        // Equidistant (10 from each).
        assert_eq!(nearest([0, 110, 100], &palette), Some((0, 10)));
    }

    #[test]
    fn test_nearest_empty_palette() {
        assert_eq!(nearest([0, 128, 128], &[]), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let ycc = Image::from_vec(1, 1, vec![[50u8, 110, 100]]);
        let palette = [ChromaColor::new(100, 100)];
        let mut mask: Image<u8> = Image::new(1, 1);
        let mut vis: Image<[u8; 3]> = Image::new(1, 1);

        assert_eq!(detect_foreground(&ycc, &palette, 10, &mut mask, &mut vis), 0);
        assert_eq!(mask.get(0, 0), 0);

        assert_eq!(detect_foreground(&ycc, &palette, 11, &mut mask, &mut vis), 1);
        assert_eq!(mask.get(0, 0), 255);
        assert_eq!(vis.get(0, 0), [50, 100, 100]);
    }

    #[test]
    fn test_exact_match_at_zero_threshold() {
        let ycc = Image::from_vec(1, 1, vec![[77u8, 90, 200]]);
        let palette = [ChromaColor::new(90, 200), ChromaColor::new(91, 200)];
        let mut mask: Image<u8> = Image::new(1, 1);
        let mut vis: Image<[u8; 3]> = Image::new(1, 1);
        assert_eq!(detect_foreground(&ycc, &palette, 0, &mut mask, &mut vis), 1);
        assert_eq!(mask.get(0, 0), 255);
        assert_eq!(nearest(ycc.get(0, 0), &palette), Some((0, 0)));
    }

    #[test]
    fn test_unmatched_pixels_overwrite_stale_colorized() {
        let palette = [ChromaColor::new(100, 100)];
        let hit = Image::from_vec(1, 1, vec![[40u8, 100, 100]]);
        let miss = Image::from_vec(1, 1, vec![[60u8, 200, 30]]);
        let mut mask: Image<u8> = Image::new(1, 1);
        let mut vis: Image<[u8; 3]> = Image::new(1, 1);

        detect_foreground(&hit, &palette, 5, &mut mask, &mut vis);
        assert_eq!(vis.get(0, 0), [40, 100, 100]);
        detect_foreground(&miss, &palette, 5, &mut mask, &mut vis);
        assert_eq!(vis.get(0, 0), [60, 200, 30]);
    }

    #[test]
    fn test_empty_palette_clears_mask() {
        let ycc = Image::from_vec(2, 1, vec![[0u8, 128, 128]; 2]);
        let mut mask = Image::from_vec(2, 1, vec![255u8; 2]);
        let mut vis: Image<[u8; 3]> = Image::new(2, 1);
        assert_eq!(detect_foreground(&ycc, &[], 500, &mut mask, &mut vis), 0);
        assert_eq!(mask.count(0), 2);
    }
}
