use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum CornerOrderError {
    #[error("expected exactly 4 corner points, got {got}")]
    InvalidPointCount { got: usize },
}

/// A board quadrilateral in canonical corner order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardQuad {
    pub top_left: Point2<f32>,
    pub top_right: Point2<f32>,
    pub bottom_right: Point2<f32>,
    pub bottom_left: Point2<f32>,
}

impl BoardQuad {
    /// Corners in (tl, tr, br, bl) order, the order the homography
    /// destination square uses.
    pub fn to_array(&self) -> [Point2<f32>; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Skip-mode quadrilateral: the buffer's own corners.
    pub fn full_frame(width: usize, height: usize) -> Self {
        let w = (width.max(1) - 1) as f32;
        let h = (height.max(1) - 1) as f32;
        Self {
            top_left: Point2::new(0.0, 0.0),
            top_right: Point2::new(w, 0.0),
            bottom_right: Point2::new(w, h),
            bottom_left: Point2::new(0.0, h),
        }
    }
}

/// Canonicalize 4 user-picked points into (tl, tr, br, bl).
///
/// Uses the sum/difference heuristic: smallest `x + y` is top-left, largest
/// is bottom-right, largest `x - y` is top-right, smallest is bottom-left.
/// The result depends only on the point set, not the input order. The
/// heuristic is only reliable for roughly axis-aligned quadrilaterals;
/// quadrilaterals rotated close to 45 degrees can be mis-ordered. That is a
/// known limitation of the method, kept for parity with the sizing formula
/// downstream.
pub fn order_corners(points: &[Point2<f32>]) -> Result<BoardQuad, CornerOrderError> {
    if points.len() != 4 {
        return Err(CornerOrderError::InvalidPointCount { got: points.len() });
    }

    let mut top_left = points[0];
    let mut bottom_right = points[0];
    let mut top_right = points[0];
    let mut bottom_left = points[0];

    for &p in points {
        let sum = p.x + p.y;
        let diff = p.x - p.y;
        if sum < top_left.x + top_left.y {
            top_left = p;
        }
        if sum > bottom_right.x + bottom_right.y {
            bottom_right = p;
        }
        if diff > top_right.x - top_right.y {
            top_right = p;
        }
        if diff < bottom_left.x - bottom_left.y {
            bottom_left = p;
        }
    }

    Ok(BoardQuad {
        top_left,
        top_right,
        bottom_right,
        bottom_left,
    })
}
