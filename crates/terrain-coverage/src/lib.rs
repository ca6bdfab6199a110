//! High-level facade crate for the `terrain-coverage-*` workspace.
//!
//! Tabletop-wargame players photograph their board at an angle; this crate
//! rectifies the photo into a plan-view square from four picked corners,
//! replays a polygon annotation session over it, and reports how much of the
//! surface is covered by terrain against a recommended minimum.
//!
//! ## Quickstart
//!
//! ```no_run
//! use terrain_coverage::annotate::{measure_mask, AnnotationEvent, AnnotationSession};
//! use terrain_coverage::pipeline::decode_image;
//! use terrain_coverage::core::rectify_full_frame;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let photo = decode_image("board.jpg")?;
//! let board = rectify_full_frame(&photo.as_view())?;
//!
//! let mut session = AnnotationSession::new(board.side, board.side);
//! session.apply(AnnotationEvent::AddPoint { x: 10.0, y: 10.0 })?;
//! session.apply(AnnotationEvent::AddPoint { x: 90.0, y: 10.0 })?;
//! session.apply(AnnotationEvent::AddPoint { x: 50.0, y: 80.0 })?;
//! session.apply(AnnotationEvent::Terminate)?;
//!
//! let result = measure_mask(session.mask(), 0.33);
//! println!("{result}");
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - [`core`]: corner ordering, homography estimation, perspective warping.
//! - [`annotate`]: annotation sessions, union masks, coverage, overlays.
//! - [`script`]: JSON annotation scripts and coverage reports.
//! - [`pipeline`] (feature `image`): decode, rectify, annotate, persist.
//! - [`batch`] (feature `image`): directory-level orchestration.

pub use terrain_coverage_annotate as annotate;
pub use terrain_coverage_core as core;

pub use terrain_coverage_annotate::{
    AnnotationEvent, AnnotationSession, CoverageMask, CoverageResult, Deficit, OverlayStyle,
    Polygon,
};
pub use terrain_coverage_core::{BoardQuad, ColorImage, Homography, RectifiedBoard};

pub mod script;

#[cfg(feature = "image")]
pub mod batch;
#[cfg(feature = "image")]
pub mod convert;
#[cfg(feature = "image")]
pub mod pipeline;
