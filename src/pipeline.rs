// pipeline.rs — Per-frame driver.
//
// Called once per sensor tick with a 1-based step counter:
//
//   step == 1   INIT    clear every buffer, mode = Automatic, no detection
//   otherwise   STEADY  run the full chain below
//
// STEADY chain:
//
//   1. Copy the sensor frame in, convert B/G/R → Y/Cb/Cr, extract luma.
//   2. Segment into `threshold` ({0, 255}) by one of:
//        - luma threshold, manual or Otsu depending on the mode flag
//        - nearest palette colour in Cb/Cr
//        - luma difference against the previous frame
//   3. Open the mask (erode into `index0`, dilate back into `threshold`).
//   4. Convert to {0, 1} in `index0` and hand it to the labeler.
//   5. Classify each region's dominant chroma into a colour label.
//   6. Draw a box and a centroid cross per region, plus a status line.
//   7. Keep the sensor frame as next frame's background.
//
// The reset signal flips the mode flag (and the status text colour). It
// never touches buffers and only affects frames processed after it.
//
// Everything runs on the caller's thread to completion; no stage keeps a
// borrow past its own call.

use std::fmt;
use std::time::{Duration, Instant};

use crate::buffers::FrameBuffers;
use crate::change::{self, ChromaColor};
use crate::classify::{classify_regions, ColorLabel};
use crate::convert::{self, LUMA};
use crate::error::ConfigError;
use crate::image::Image;
use crate::morphology;
use crate::overlay::{DrawColor, Overlay, TextSize};
use crate::region::{self, BoundingBox, RegionLabeler};
use crate::threshold::{self, Polarity, ThresholdMode};

/// Half-length in pixels of the centroid cross arms.
const CROSS_HALF: usize = 4;

/// How the foreground mask is produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segmentation {
    /// Luma threshold, manual or automatic according to the pipeline's
    /// mode flag. `polarity` picks the foreground side.
    Threshold { polarity: Polarity },
    /// Chroma within `max_distance` (L1, exclusive) of a palette entry.
    Color {
        palette: Vec<ChromaColor>,
        max_distance: u16,
    },
    /// Luma changed by more than `threshold` since the previous frame.
    BackgroundDifference { threshold: u8 },
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineConfig {
    /// Sensor width in pixels.
    pub width: usize,
    /// Sensor height in pixels.
    pub height: usize,
    /// Pixels along each edge that thresholding and morphology skip.
    pub border: usize,
    pub segmentation: Segmentation,
    /// Draw a cross at each region centroid in addition to its box.
    pub draw_centroids: bool,
}

impl Default for PipelineConfig {
    /// MT9V032-class global-shutter sensor at full resolution.
    fn default() -> Self {
        PipelineConfig {
            width: 752,
            height: 480,
            border: 1,
            segmentation: Segmentation::Threshold {
                polarity: Polarity::Dark,
            },
            draw_centroids: true,
        }
    }
}

impl PipelineConfig {
    /// Check the geometry and segmentation parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyFrame {
                width: self.width,
                height: self.height,
            });
        }
        if self.border == 0 {
            return Err(ConfigError::BorderTooSmall(self.border));
        }
        if self.width <= 2 * self.border || self.height <= 2 * self.border {
            return Err(ConfigError::BorderTooLarge {
                width: self.width,
                height: self.height,
                border: self.border,
            });
        }
        if let Segmentation::Color { palette, .. } = &self.segmentation {
            if palette.is_empty() {
                return Err(ConfigError::EmptyPalette);
            }
        }
        Ok(())
    }
}

/// Which branch of the driver a frame went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Init,
    Steady,
}

/// Geometry and label of one detected region.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedRegion {
    pub bbox: BoundingBox,
    pub centroid: (f32, f32),
    pub area: usize,
    pub label: ColorLabel,
}

/// Result of one `process_frame` call.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub step: u64,
    pub state: FrameState,
    /// Mode flag in effect for this frame.
    pub mode: ThresholdMode,
    /// Cut value used, for threshold segmentation only. `None` also when
    /// the automatic cut found no split in a constant frame.
    pub threshold: Option<u8>,
    /// Foreground pixels left after morphology.
    pub foreground_pixels: usize,
    pub regions: Vec<DetectedRegion>,
    /// Wall time spent inside `process_frame`.
    pub elapsed: Duration,
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} {:?}: mode={:?} threshold={} fg={} regions={} ({:.2} ms)",
            self.step,
            self.state,
            self.mode,
            self.threshold.map_or_else(|| "-".to_string(), |t| t.to_string()),
            self.foreground_pixels,
            self.regions.len(),
            self.elapsed.as_secs_f64() * 1e3,
        )
    }
}

/// The per-frame segmentation pipeline and all of its persistent state.
pub struct Pipeline {
    config: PipelineConfig,
    buffers: FrameBuffers,
    mode: ThresholdMode,
    text_color: DrawColor,
    /// False until one steady frame has been stored as background.
    background_valid: bool,
}

impl Pipeline {
    /// Validate `config` and allocate every buffer.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let buffers = FrameBuffers::new(config.width, config.height);
        log::debug!(
            "pipeline: {}×{} border={} segmentation={:?}",
            config.width,
            config.height,
            config.border,
            config.segmentation,
        );
        Ok(Pipeline {
            config,
            buffers,
            mode: ThresholdMode::Automatic,
            text_color: DrawColor::Cyan,
            background_valid: false,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    /// Cleaned foreground mask of the last steady frame, {0, 255}.
    pub fn mask(&self) -> &Image<u8> {
        &self.buffers.threshold
    }

    pub fn mode(&self) -> ThresholdMode {
        self.mode
    }

    pub fn text_color(&self) -> DrawColor {
        self.text_color
    }

    /// External reset edge: flip manual/automatic thresholding.
    pub fn reset(&mut self) {
        self.mode = self.mode.toggled();
        self.text_color = match self.text_color {
            DrawColor::Cyan => DrawColor::Magenta,
            _ => DrawColor::Cyan,
        };
        log::info!("reset: threshold mode now {:?}", self.mode);
    }

    /// Process one sensor frame.
    ///
    /// `sensor` is B/G/R with the configured geometry. `manual_threshold` is
    /// only consulted in manual mode with threshold segmentation.
    ///
    /// # Panics
    /// Panics if `sensor` does not match the configured geometry.
    pub fn process_frame(
        &mut self,
        step: u64,
        sensor: &Image<[u8; 3]>,
        manual_threshold: u8,
        labeler: &mut dyn RegionLabeler,
        overlay: &mut dyn Overlay,
    ) -> FrameReport {
        let start = Instant::now();

        if step == 1 {
            self.buffers.clear();
            self.mode = ThresholdMode::Automatic;
            self.text_color = DrawColor::Cyan;
            self.background_valid = false;
            log::info!(
                "init: {}×{} buffers cleared, threshold mode {:?}",
                self.config.width,
                self.config.height,
                self.mode,
            );
            return FrameReport {
                step,
                state: FrameState::Init,
                mode: self.mode,
                threshold: None,
                foreground_pixels: 0,
                regions: Vec::new(),
                elapsed: start.elapsed(),
            };
        }

        let border = self.config.border;
        let mode = self.mode;
        let b = &mut self.buffers;

        // Stage 1: bring the frame in.
        b.sensor.copy_from(sensor);
        convert::bgr_to_ycbcr(&b.sensor, &mut b.ycbcr);
        convert::extract_channel(&b.ycbcr, LUMA, &mut b.gray);

        // Stage 2: segmentation into a {0, 255} mask with a zero border.
        b.clear_masks();
        let threshold = match &self.config.segmentation {
            Segmentation::Threshold { polarity } => {
                // No cut: the cleared mask already means "no foreground".
                let t = mode.resolve(manual_threshold, &b.gray);
                if let Some(t) = t {
                    threshold::binarize_with(&b.gray, &mut b.threshold, t, border, *polarity);
                }
                t
            }
            Segmentation::Color {
                palette,
                max_distance,
            } => {
                change::detect_foreground(
                    &b.ycbcr,
                    palette,
                    *max_distance,
                    &mut b.threshold,
                    &mut b.colorized,
                );
                b.threshold.fill_border(border, 0);
                None
            }
            Segmentation::BackgroundDifference { threshold } => {
                if self.background_valid {
                    convert::bgr_to_gray(&b.background, &mut b.index1);
                    change::background_difference(&b.gray, &b.index1, *threshold, &mut b.threshold);
                    b.threshold.fill_border(border, 0);
                }
                None
            }
        };
        log::trace!("segmented: {} raw foreground pixels", b.threshold.count(255));

        // Stage 3: opening removes specks smaller than 3×3.
        morphology::open3x3(&mut b.threshold, &mut b.index0, border);
        let foreground_pixels = b.threshold.count(255);

        // Stage 4: labeling on the {0, 1} copy.
        region::to_unit_mask(&b.threshold, &mut b.index0);
        let regions = labeler.label(&b.index0);

        // Stage 5: colour labels.
        let labels = classify_regions(&regions, &b.ycbcr);

        // Stage 6: annotation.
        let detected: Vec<DetectedRegion> = regions
            .iter()
            .zip(&labels)
            .map(|(r, &label)| DetectedRegion {
                bbox: r.bbox,
                centroid: r.centroid,
                area: r.area,
                label,
            })
            .collect();
        self.draw(&detected, threshold, overlay);

        // Stage 7: this frame becomes the next frame's background.
        let b = &mut self.buffers;
        b.background.copy_from(&b.sensor);
        self.background_valid = true;

        let report = FrameReport {
            step,
            state: FrameState::Steady,
            mode,
            threshold,
            foreground_pixels,
            regions: detected,
            elapsed: start.elapsed(),
        };
        log::debug!("{report}");
        report
    }

    fn draw(&self, regions: &[DetectedRegion], threshold: Option<u8>, overlay: &mut dyn Overlay) {
        let (w, h) = (self.config.width, self.config.height);

        for r in regions {
            let color = r.label.draw_color();
            overlay.draw_bounding_box(r.bbox.left, r.bbox.top, r.bbox.right, r.bbox.bottom, false, color);

            if self.config.draw_centroids {
                let cx = (r.centroid.0.round() as usize).min(w - 1);
                let cy = (r.centroid.1.round() as usize).min(h - 1);
                overlay.draw_line(
                    cx.saturating_sub(CROSS_HALF),
                    cy,
                    (cx + CROSS_HALF).min(w - 1),
                    cy,
                    color,
                );
                overlay.draw_line(
                    cx,
                    cy.saturating_sub(CROSS_HALF),
                    cx,
                    (cy + CROSS_HALF).min(h - 1),
                    color,
                );
            }
        }

        let status = match threshold {
            Some(t) => format!("{:?} t={t} n={}", self.mode, regions.len()),
            None => format!("n={}", regions.len()),
        };
        overlay.draw_string(2, 2, &status, TextSize::Tiny, self.text_color);
    }
}
