// threshold.rs — Foreground/background split of a grayscale buffer.
//
// Two ways to pick the cut value:
//
// 1. MANUAL: the host supplies a fixed threshold (e.g. from a slider).
//
// 2. AUTOMATIC (Otsu): build a 256-bin histogram over the whole frame and
//    pick the split K that maximises the between-class variance surrogate
//
//        score(K) = w0 * w1 * (mu0 - mu1)^2
//
//    where class 0 holds samples <= K and class 1 holds samples > K, w is a
//    class's pixel count and mu its mean value. Recomputed every frame.
//    The cut handed to `binarize` is K + 1, so "sample < cut" is class 0.
//
// Binarization writes 255 for samples *below* the threshold by default: the
// sensor sees dark objects on a bright background, so "dark" is foreground.
// `Polarity::Bright` flips that for bright objects on a dark background.
//
// Mask convention on output: {0, 255}.

use crate::image::{assert_same_shape, Image};

/// Which cut value `binarize` uses this frame.
///
/// Flipped by the host's reset signal; starts out `Automatic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThresholdMode {
    /// Otsu's threshold computed from the current frame.
    Automatic,
    /// Externally supplied threshold.
    Manual,
}

impl ThresholdMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ThresholdMode::Automatic => ThresholdMode::Manual,
            ThresholdMode::Manual => ThresholdMode::Automatic,
        }
    }

    /// Resolve the threshold for `image` under this mode.
    ///
    /// `None` means the automatic cut found no split (constant or empty
    /// frame): the caller must skip binarization so that the mask stays
    /// empty under either polarity.
    pub fn resolve(self, manual: u8, image: &Image<u8>) -> Option<u8> {
        match self {
            ThresholdMode::Manual => Some(manual),
            ThresholdMode::Automatic => otsu_split(&histogram(image)).map(|k| k + 1),
        }
    }
}

/// Which side of the threshold is foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    /// `sample < threshold` is foreground.
    #[default]
    Dark,
    /// `sample >= threshold` is foreground.
    Bright,
}

/// 256-bin histogram of every sample in the frame.
pub fn histogram(image: &Image<u8>) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for y in 0..image.height() {
        for &v in image.row(y) {
            hist[v as usize] += 1;
        }
    }
    hist
}

/// Otsu's threshold over the full frame, ready for `binarize`.
pub fn otsu_threshold(image: &Image<u8>) -> u8 {
    otsu_from_histogram(&histogram(image))
}

/// Otsu's cut value from a precomputed histogram.
///
/// Returns `K + 1` for the best split K, so that `sample < threshold`
/// selects exactly class 0 (samples <= K). When no split separates two
/// non-empty classes (constant or empty frame) the result is 0, which
/// makes `binarize` report no foreground at all. Under `Polarity::Bright`
/// a cut of 0 selects everything; use `ThresholdMode::resolve` or
/// `otsu_split` to tell the degenerate case apart.
pub fn otsu_from_histogram(hist: &[u32; 256]) -> u8 {
    otsu_split(hist).map_or(0, |k| k + 1)
}

/// Best split K in 0..=254, or `None` if every split leaves a class empty.
///
/// A split that leaves one class empty scores 0 instead of dividing by
/// zero. Comparison is strict, so ties keep the lowest K.
pub fn otsu_split(hist: &[u32; 256]) -> Option<u8> {
    let total: f64 = hist.iter().map(|&h| h as f64).sum();
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum();

    // Running class-0 sums; class 1 is the complement.
    let mut w0 = 0.0f64;
    let mut sum0 = 0.0f64;
    let mut best_score = 0.0f64;
    let mut best_k = None;

    for k in 0..255usize {
        w0 += hist[k] as f64;
        sum0 += k as f64 * hist[k] as f64;
        let w1 = total - w0;

        if w0 == 0.0 || w1 == 0.0 {
            continue;
        }

        let mu0 = sum0 / w0;
        let mu1 = (sum_total - sum0) / w1;
        let score = w0 * w1 * (mu0 - mu1) * (mu0 - mu1);

        if score > best_score {
            best_score = score;
            best_k = Some(k as u8);
        }
    }

    best_k
}

/// Write the binary mask of `src < threshold` into `dst`.
///
/// Only interior pixels (at least `border` pixels away from every edge) are
/// written: 255 where the sample is below the threshold, 0 otherwise.
/// Border pixels of `dst` keep whatever they held before; clear `dst` first
/// if a zero border is required.
///
/// # Panics
/// Panics if `src` and `dst` differ in shape.
pub fn binarize(src: &Image<u8>, dst: &mut Image<u8>, threshold: u8, border: usize) {
    binarize_with(src, dst, threshold, border, Polarity::Dark);
}

/// `binarize` with an explicit foreground side.
///
/// `Polarity::Bright` writes 255 where `src >= threshold`, the exact
/// complement of `Polarity::Dark` on the interior.
pub fn binarize_with(
    src: &Image<u8>,
    dst: &mut Image<u8>,
    threshold: u8,
    border: usize,
    polarity: Polarity,
) {
    assert_same_shape(src, dst);
    let (w, h) = src.dimensions();
    if w <= 2 * border || h <= 2 * border {
        return;
    }

    for y in border..h - border {
        let src_row = &src.row(y)[border..w - border];
        let dst_row = &mut dst.row_mut(y)[border..w - border];
        for (d, &s) in dst_row.iter_mut().zip(src_row) {
            let dark = s < threshold;
            let foreground = match polarity {
                Polarity::Dark => dark,
                Polarity::Bright => !dark,
            };
            *d = if foreground { 255 } else { 0 };
        }
    }
}
