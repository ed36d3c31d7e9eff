// classify.rs — Dominant-colour label per region.
//
// For each region handed back by the labeler:
//
//   1. Walk every run, every pixel, and histogram the Cb and Cr samples of
//      the Y/Cb/Cr frame at that position (256 bins per channel).
//   2. Per channel, the dominant value is the bin with the highest count;
//      the lowest value wins ties.
//   3. Split on the dominant Cb: below 128 the region leans yellow/red
//      (WARM), otherwise it leans blue (COOL).
//
// Histogram and running max are fresh for every region, so one region's
// counts can never raise the bar for the next.

use crate::change::ChromaColor;
use crate::convert::{CB, CR};
use crate::image::Image;
use crate::overlay::DrawColor;
use crate::region::Region;

/// Dominant Cb at or above this value labels a region `Cool`.
pub const CB_SPLIT: u8 = 128;

/// Discrete colour assigned to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorLabel {
    /// Dominant Cb below the midpoint.
    Warm,
    /// Dominant Cb at or above the midpoint.
    Cool,
}

impl ColorLabel {
    pub fn from_cb(cb: u8) -> Self {
        if cb < CB_SPLIT {
            ColorLabel::Warm
        } else {
            ColorLabel::Cool
        }
    }

    /// Overlay colour used when annotating a region with this label.
    pub fn draw_color(self) -> DrawColor {
        match self {
            ColorLabel::Warm => DrawColor::Red,
            ColorLabel::Cool => DrawColor::Blue,
        }
    }
}

/// Index of the largest bin; first one wins ties. All-zero → 0.
fn argmax(hist: &[u32; 256]) -> u8 {
    let mut best_i = 0usize;
    let mut best = hist[0];
    for (i, &count) in hist.iter().enumerate().skip(1) {
        if count > best {
            best = count;
            best_i = i;
        }
    }
    best_i as u8
}

/// Most frequent Cb and Cr values over the region's pixels.
///
/// A region without runs has empty histograms and reports (0, 0).
///
/// # Panics
/// Panics if a run lies outside `ycbcr`.
pub fn dominant_chroma(region: &Region, ycbcr: &Image<[u8; 3]>) -> ChromaColor {
    let mut hist_cb = [0u32; 256];
    let mut hist_cr = [0u32; 256];

    for run in &region.runs {
        let row = ycbcr.row(run.row);
        assert!(
            run.end < row.len(),
            "run {run:?} exceeds frame width {}",
            row.len()
        );
        for px in &row[run.start..=run.end] {
            hist_cb[px[CB] as usize] += 1;
            hist_cr[px[CR] as usize] += 1;
        }
    }

    ChromaColor::new(argmax(&hist_cb), argmax(&hist_cr))
}

/// One label per region, in input order.
pub fn classify_regions(regions: &[Region], ycbcr: &Image<[u8; 3]>) -> Vec<ColorLabel> {
    regions
        .iter()
        .map(|region| ColorLabel::from_cb(dominant_chroma(region, ycbcr).cb))
        .collect()
}
