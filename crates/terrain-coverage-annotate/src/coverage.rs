//! Coverage and deficit arithmetic.
//!
//! Two interchangeable measurement strategies: counting mask pixels set by an
//! annotation session, or counting near-black pixels of a grayscale buffer
//! (threshold mode). Both reduce to a [`CoverageResult`].

use crate::CoverageMask;
use serde::{Deserialize, Serialize};
use std::fmt;
use terrain_coverage_core::GrayImageView;

/// Recommended minimum fraction of the board covered by terrain.
pub const DEFAULT_TARGET_FRACTION: f64 = 0.33;

/// Threshold-mode default: only near-black pixels (intensity 0) count.
pub const DEFAULT_INTENSITY_THRESHOLD: u8 = 1;

/// How far the measured coverage is from the target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Deficit {
    /// Coverage meets or exceeds the target fraction.
    AtOrAboveTarget,
    /// Nothing is covered; a relative deficit is undefined.
    NoCoverage,
    /// Percentage increase of the covered area needed to reach the target.
    RelativeMissing { percent: f64 },
}

/// Measured coverage of one board.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub covered_pixels: usize,
    pub total_pixels: usize,
    /// Covered fraction in [0, 1].
    pub fraction: f64,
    /// Target fraction the deficit is measured against.
    pub target: f64,
    pub deficit: Deficit,
}

impl CoverageResult {
    fn from_counts(covered: usize, total: usize, target: f64) -> Self {
        let fraction = if total == 0 {
            0.0
        } else {
            covered as f64 / total as f64
        };

        let deficit = if fraction >= target {
            Deficit::AtOrAboveTarget
        } else if covered == 0 {
            Deficit::NoCoverage
        } else {
            Deficit::RelativeMissing {
                percent: 100.0 / (fraction / target) - 100.0,
            }
        };

        Self {
            covered_pixels: covered,
            total_pixels: total,
            fraction,
            target,
            deficit,
        }
    }

    pub fn percent(&self) -> f64 {
        100.0 * self.fraction
    }
}

impl fmt::Display for CoverageResult {
    /// Human-readable summary, one or two lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Terrain coverage: {:.2}%. Recommended minimum is {:.0}%.",
            self.percent(),
            100.0 * self.target
        )?;
        match self.deficit {
            Deficit::AtOrAboveTarget => write!(f, " You have optimal coverage!"),
            Deficit::NoCoverage => write!(f, " No terrain marked yet."),
            Deficit::RelativeMissing { percent } => write!(
                f,
                " Add an additional {percent:.2}% of the terrain you already have."
            ),
        }
    }
}

/// Mask-based coverage: fraction of mask pixels inside the polygon union.
pub fn measure_mask(mask: &CoverageMask, target: f64) -> CoverageResult {
    CoverageResult::from_counts(mask.covered_pixels(), mask.total_pixels(), target)
}

/// Threshold-based coverage over a grayscale buffer: a pixel counts as
/// covered iff its intensity is strictly below `threshold`.
pub fn measure_threshold(gray: &GrayImageView<'_>, threshold: u8, target: f64) -> CoverageResult {
    let covered = gray.data.iter().filter(|&&v| v < threshold).count();
    CoverageResult::from_counts(covered, gray.width * gray.height, target)
}

/// Materialize the threshold predicate as a mask, for overlay rendering.
pub fn threshold_mask(gray: &GrayImageView<'_>, threshold: u8) -> CoverageMask {
    let mut mask = CoverageMask::new(gray.width, gray.height);
    for y in 0..gray.height {
        for x in 0..gray.width {
            if gray.data[y * gray.width + x] < threshold {
                mask.set(x, y);
            }
        }
    }
    mask
}
