// buffers.rs — The pipeline's fixed set of frame buffers.
//
// Every buffer has the sensor's geometry and is allocated exactly once, when
// the pipeline is built. Stages read and write them in place every frame;
// nothing is reallocated in steady state.
//
//   buffer       samples    contents
//   ──────────   ────────   ───────────────────────────────────────────
//   sensor       [u8; 3]    current frame, B/G/R
//   background   [u8; 3]    previous frame, B/G/R
//   ycbcr        [u8; 3]    current frame, Y/Cb/Cr
//   colorized    [u8; 3]    change-detector visualization, Y/Cb/Cr
//   gray         u8         luma of the current frame
//   threshold    u8         foreground mask, {0, 255}
//   index0       u8         morphology scratch, then labeling mask {0, 1}
//   index1       u8         luma of the background (difference mode)
//
// Fields are public so a stage can borrow one buffer immutably and another
// mutably at the same time; the borrow checker sees disjoint fields.

use crate::image::Image;

/// Named, same-size working buffers shared by all pipeline stages.
pub struct FrameBuffers {
    pub sensor: Image<[u8; 3]>,
    pub background: Image<[u8; 3]>,
    pub ycbcr: Image<[u8; 3]>,
    pub colorized: Image<[u8; 3]>,
    pub gray: Image<u8>,
    pub threshold: Image<u8>,
    pub index0: Image<u8>,
    pub index1: Image<u8>,
}

impl FrameBuffers {
    /// Allocate all buffers, zero-filled.
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffers {
            sensor: Image::new(width, height),
            background: Image::new(width, height),
            ycbcr: Image::new(width, height),
            colorized: Image::new(width, height),
            gray: Image::new(width, height),
            threshold: Image::new(width, height),
            index0: Image::new(width, height),
            index1: Image::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.sensor.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.sensor.height()
    }

    /// Zero every buffer.
    pub fn clear(&mut self) {
        self.sensor.clear();
        self.background.clear();
        self.ycbcr.clear();
        self.colorized.clear();
        self.gray.clear();
        self.threshold.clear();
        self.index0.clear();
        self.index1.clear();
    }

    /// Zero only the mask buffers, so stages that skip the border leave 0 there.
    pub fn clear_masks(&mut self) {
        self.threshold.clear();
        self.index0.clear();
    }
}
