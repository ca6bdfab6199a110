use crate::{sample_bilinear_channel, BoardQuad, ColorImage, ColorImageView};
use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};

#[derive(thiserror::Error, Debug)]
pub enum HomographyError {
    #[error("degenerate quadrilateral (destination side {side} < 1)")]
    DegenerateQuadrilateral { side: i64 },
    #[error("singular transform: corner correspondences do not admit a projective map")]
    SingularTransform,
}

/// A plane-to-plane projective transform, 8 degrees of freedom, stored as a
/// 3x3 matrix with the bottom-right entry normalized to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        Point2::new((v[0] / w) as f32, (v[1] / w) as f32)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

/// Side length and destination square for a rectified board.
///
/// The side is the floor of the longest quadrilateral edge, so the warped
/// board roughly preserves the scale of its most foreshortened-free edge.
pub fn square_destination(quad: &BoardQuad) -> Result<(BoardQuad, usize), HomographyError> {
    fn dist(a: Point2<f32>, b: Point2<f32>) -> f64 {
        let dx = (a.x - b.x) as f64;
        let dy = (a.y - b.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    let width_bottom = dist(quad.bottom_right, quad.bottom_left);
    let width_top = dist(quad.top_right, quad.top_left);
    let height_right = dist(quad.top_right, quad.bottom_right);
    let height_left = dist(quad.top_left, quad.bottom_left);

    let side = width_bottom
        .max(width_top)
        .max(height_right.max(height_left))
        .floor() as i64;
    if side < 1 {
        return Err(HomographyError::DegenerateQuadrilateral { side });
    }

    let s = (side - 1) as f32;
    let dst = BoardQuad {
        top_left: Point2::new(0.0, 0.0),
        top_right: Point2::new(s, 0.0),
        bottom_right: Point2::new(s, s),
        bottom_left: Point2::new(0.0, s),
    };
    Ok((dst, side as usize))
}

// Hartley conditioning: translate to the centroid and scale so the mean
// distance from it is sqrt(2). Keeps the 8x8 system well conditioned for
// pixel-scale coordinates.
fn conditioning_transform(pts: &[Point2<f32>; 4]) -> Matrix3<f64> {
    let mut cx = 0.0_f64;
    let mut cy = 0.0_f64;
    for p in pts {
        cx += p.x as f64;
        cy += p.y as f64;
    }
    cx /= 4.0;
    cy /= 4.0;

    let mut mean_dist = 0.0_f64;
    for p in pts {
        mean_dist += ((p.x as f64 - cx).powi(2) + (p.y as f64 - cy).powi(2)).sqrt();
    }
    mean_dist /= 4.0;

    let s = if mean_dist > 1e-12 {
        2.0_f64.sqrt() / mean_dist
    } else {
        1.0
    };
    Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn condition(pts: &[Point2<f32>; 4], t: &Matrix3<f64>) -> [Point2<f64>; 4] {
    pts.map(|p| {
        let v = t * Vector3::new(p.x as f64, p.y as f64, 1.0);
        Point2::new(v[0], v[1])
    })
}

/// Estimate H such that `dst ~ H * src` from the 4 corner correspondences of
/// two canonically ordered quadrilaterals.
///
/// Solves the standard 4-point system (8 equations in 8 unknowns, h33 = 1)
/// by LU after Hartley conditioning of both point sets. Fails with
/// [`HomographyError::SingularTransform`] for collinear or duplicated source
/// corners.
pub fn homography_from_quads(src: &BoardQuad, dst: &BoardQuad) -> Result<Homography, HomographyError> {
    let src_pts = src.to_array();
    let dst_pts = dst.to_array();

    let t_src = conditioning_transform(&src_pts);
    let t_dst = conditioning_transform(&dst_pts);
    let s = condition(&src_pts, &t_src);
    let d = condition(&dst_pts, &t_dst);

    // For each correspondence (x,y) -> (u,v):
    //   h11 x + h12 y + h13 - u h31 x - u h32 y = u
    //   h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for k in 0..4 {
        let (x, y) = (s[k].x, s[k].y);
        let (u, v) = (d[k].x, d[k].y);

        let r = 2 * k;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -u * y;
        b[r] = u;

        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -v * x;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = v;
    }

    let x = a.lu().solve(&b).ok_or(HomographyError::SingularTransform)?;

    let hn = Matrix3::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    // Undo the conditioning: H = T_dst^-1 * Hn * T_src, renormalized to h33 = 1.
    let t_dst_inv = t_dst
        .try_inverse()
        .ok_or(HomographyError::SingularTransform)?;
    let h = t_dst_inv * hn * t_src;
    let scale = h[(2, 2)];
    if scale.abs() < 1e-12 {
        return Err(HomographyError::SingularTransform);
    }
    Ok(Homography::new(h / scale))
}

/// Warp the source through `h_img_from_board` into a `side`-square output:
/// every destination pixel center maps back into the source and samples
/// bilinearly, with out-of-bounds reads as black.
pub fn warp_perspective(
    src: &ColorImageView<'_>,
    h_img_from_board: Homography,
    side: usize,
) -> ColorImage {
    let channels = src.channels;
    let mut out = vec![0u8; side * side * channels];

    for y in 0..side {
        for x in 0..side {
            let p_board = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
            let p_img = h_img_from_board.apply(p_board);
            let base = (y * side + x) * channels;
            for c in 0..channels {
                let v = sample_bilinear_channel(src, p_img.x, p_img.y, c);
                out[base + c] = v.clamp(0.0, 255.0) as u8;
            }
        }
    }

    ColorImage {
        width: side,
        height: side,
        channels,
        data: out,
    }
}
