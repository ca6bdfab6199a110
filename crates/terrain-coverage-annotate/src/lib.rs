//! Terrain annotation for rectified boards.
//!
//! An [`AnnotationSession`] replays add-point / finalize / undo / terminate
//! events into a union [`CoverageMask`], from which [`coverage`] computes the
//! covered fraction and deficit against a target, and [`overlay`] renders the
//! marked region over the board image.

mod mask;
mod polygon;
mod session;

pub mod coverage;
pub mod overlay;

pub use coverage::{
    measure_mask, measure_threshold, threshold_mask, CoverageResult, Deficit,
    DEFAULT_INTENSITY_THRESHOLD, DEFAULT_TARGET_FRACTION,
};
pub use mask::CoverageMask;
pub use overlay::{compose_overlay, draw_polygon_outlines, OverlayError, OverlayStyle};
pub use polygon::{Polygon, MIN_POLYGON_VERTICES};
pub use session::{AnnotationEvent, AnnotationSession, SessionError, SessionOutcome, SessionState};
