// frameseg: per-frame segmentation pipeline for a fixed-geometry camera
//
// threshold / colour match → 3×3 opening → region labeling → colour label
// → annotation, once per sensor tick, in preallocated buffers.

pub mod image;
pub mod buffers;
pub mod convert;
pub mod threshold;
pub mod morphology;
pub mod change;
pub mod region;
pub mod classify;
pub mod overlay;
pub mod error;
pub mod pipeline;

pub use error::ConfigError;
pub use pipeline::{FrameReport, Pipeline, PipelineConfig, Segmentation};
pub use threshold::{Polarity, ThresholdMode};
