use crate::{
    homography_from_quads, order_corners, square_destination, warp_perspective, BoardQuad,
    ColorImage, ColorImageView, CornerOrderError, Homography, HomographyError,
};
use nalgebra::Point2;

#[derive(thiserror::Error, Debug)]
pub enum RectifyError {
    #[error(transparent)]
    Corners(#[from] CornerOrderError),
    #[error(transparent)]
    Homography(#[from] HomographyError),
    #[error("estimated transform is not invertible")]
    NonInvertible,
}

/// A rectified plan-view board plus the transforms that produced it.
#[derive(Clone, Debug)]
pub struct RectifiedBoard {
    /// Square plan-view image of the playing surface.
    pub image: ColorImage,
    /// Image -> board transform (the estimated projective map).
    pub h_board_from_img: Homography,
    /// Board -> image transform, used for resampling.
    pub h_img_from_board: Homography,
    pub side: usize,
}

/// Rectify the source through an already-ordered quadrilateral.
pub fn rectify_board(
    src: &ColorImageView<'_>,
    quad: &BoardQuad,
) -> Result<RectifiedBoard, RectifyError> {
    let (dst, side) = square_destination(quad)?;
    let h_board_from_img = homography_from_quads(quad, &dst)?;
    let h_img_from_board = h_board_from_img
        .inverse()
        .ok_or(RectifyError::NonInvertible)?;

    log::debug!(
        "rectifying {}x{} source into {side}x{side} board",
        src.width,
        src.height
    );
    let image = warp_perspective(src, h_img_from_board, side);

    Ok(RectifiedBoard {
        image,
        h_board_from_img,
        h_img_from_board,
        side,
    })
}

/// Rectify from 4 unordered user-picked corner points.
pub fn rectify_points(
    src: &ColorImageView<'_>,
    points: &[Point2<f32>],
) -> Result<RectifiedBoard, RectifyError> {
    let quad = order_corners(points)?;
    rectify_board(src, &quad)
}

/// Skip mode: rectify using the buffer's own corners.
pub fn rectify_full_frame(src: &ColorImageView<'_>) -> Result<RectifiedBoard, RectifyError> {
    let quad = BoardQuad::full_frame(src.width, src.height);
    rectify_board(src, &quad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorImage;

    fn gradient(width: usize, height: usize) -> ColorImage {
        let mut img = ColorImage::zeroed(width, height, 3).unwrap();
        for y in 0..height {
            for x in 0..width {
                let base = (y * width + x) * 3;
                img.data[base] = (8 * x) as u8;
                img.data[base + 1] = (8 * y) as u8;
                img.data[base + 2] = 128;
            }
        }
        img
    }

    #[test]
    fn identity_rectification_reproduces_source() {
        let src = gradient(32, 32);
        let out = rectify_full_frame(&src.as_view()).unwrap();
        assert_eq!(out.side, 31);

        // The full-frame quad maps the 32-wide frame onto a 31-wide square,
        // so interior pixels shift by under a pixel. A linear gradient turns
        // that into a small, bounded value error.
        for y in 1..out.side - 1 {
            for x in 1..out.side - 1 {
                let base = (y * out.side + x) * 3;
                let got_r = out.image.data[base] as i32;
                let got_g = out.image.data[base + 1] as i32;
                let want_r = src.data[(y * 32 + x) * 3] as i32;
                let want_g = src.data[(y * 32 + x) * 3 + 1] as i32;
                assert!(
                    (got_r - want_r).abs() <= 14 && (got_g - want_g).abs() <= 14,
                    "pixel ({x},{y}): got ({got_r},{got_g}), want ~({want_r},{want_g})"
                );
                assert_eq!(out.image.data[base + 2], 128);
            }
        }
    }

    #[test]
    fn point_count_errors_propagate() {
        let src = gradient(8, 8);
        let err = rectify_points(&src.as_view(), &[Point2::new(0.0, 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            RectifyError::Corners(CornerOrderError::InvalidPointCount { got: 1 })
        ));
    }

    #[test]
    fn degenerate_corners_fail_cleanly() {
        let src = gradient(8, 8);
        let p = Point2::new(2.0, 2.0);
        let err = rectify_points(&src.as_view(), &[p, p, p, p]).unwrap_err();
        assert!(matches!(
            err,
            RectifyError::Homography(HomographyError::DegenerateQuadrilateral { .. })
        ));
    }
}
