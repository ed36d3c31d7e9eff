// error.rs — Configuration errors.
//
// The per-frame path has no error channel: degenerate input produces an
// empty or degraded detection for that frame and the next tick carries on.
// The only fallible step is building a pipeline from a configuration,
// which happens once at startup.

use thiserror::Error;

/// Reasons a `PipelineConfig` is rejected by `Pipeline::new`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("frame dimensions must be non-zero (got {width}×{height})")]
    EmptyFrame { width: usize, height: usize },

    #[error("border must be at least 1 pixel for 3×3 filtering (got {0})")]
    BorderTooSmall(usize),

    #[error("frame {width}×{height} has no interior pixels with border {border}")]
    BorderTooLarge {
        width: usize,
        height: usize,
        border: usize,
    },

    #[error("colour segmentation needs at least one palette entry")]
    EmptyPalette,
}
