use crate::CoverageMask;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Polygons with fewer vertices are degenerate and never enter the
/// committed set.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// A closed terrain footprint. Vertices are image coordinates on the
/// annotated buffer; the loop closes implicitly from the last vertex back to
/// the first. Self-intersecting loops are filled with the even-odd rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point2<f32>>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2<f32>>) -> Self {
        Self { vertices }
    }

    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < MIN_POLYGON_VERTICES
    }

    /// Scanline even-odd fill, ORed into the mask.
    ///
    /// Each mask row is tested at its pixel center (`y + 0.5`); crossings of
    /// the closed loop are collected, sorted, and paired, and a pixel is
    /// covered iff its center `x + 0.5` falls inside a crossing pair. The
    /// same code path runs on first commit and on undo recompute, so masks
    /// rebuilt from the same polygon set are bit-identical.
    pub fn fill(&self, mask: &mut CoverageMask) {
        if self.is_degenerate() || mask.total_pixels() == 0 {
            return;
        }

        let n = self.vertices.len();
        let (min_y, max_y) = self
            .vertices
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let row_lo = (min_y - 0.5).ceil().max(0.0) as usize;
        let row_hi = (max_y.max(0.0) as usize).min(mask.height() - 1);

        let mut crossings = Vec::with_capacity(n);
        for y in row_lo..=row_hi {
            let yc = y as f32 + 0.5;
            crossings.clear();

            for i in 0..n {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                // Half-open test per edge keeps shared vertices from double
                // counting.
                if (a.y > yc) != (b.y > yc) {
                    let t = (yc - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(|p, q| p.partial_cmp(q).unwrap_or(std::cmp::Ordering::Equal));

            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil().max(0.0) as usize;
                let end = ((pair[1] - 0.5).ceil().max(0.0) as usize).min(mask.width());
                for x in start..end {
                    mask.set(x, y);
                }
            }
        }
    }
}
