//! Geometry and imaging primitives for tabletop terrain coverage estimation.
//!
//! This crate is intentionally small and purely computational. It rectifies a
//! photographed board into a plan-view square from four user-picked corners,
//! and knows nothing about file formats, windowing, or annotation sessions.

mod corners;
mod homography;
mod image;
mod logger;
mod rectify;

pub use corners::{order_corners, BoardQuad, CornerOrderError};
pub use homography::{
    homography_from_quads, square_destination, warp_perspective, Homography, HomographyError,
};
pub use image::{
    sample_bilinear_channel, BufferError, ColorImage, ColorImageView, GrayImage, GrayImageView,
};
pub use rectify::{rectify_board, rectify_full_frame, rectify_points, RectifiedBoard, RectifyError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
