//! JSON annotation scripts and coverage reports.
//!
//! With no interactive frontend in scope, an annotation session is described
//! by a sidecar script next to the input image: the corner source for
//! rectification plus the ordered event sequence to replay.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::Path,
};
use terrain_coverage_annotate::{AnnotationEvent, CoverageResult};

#[derive(thiserror::Error, Debug)]
pub enum ScriptIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Where the rectification quadrilateral comes from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CornerSource {
    /// Skip mode: use the photo's own corners.
    #[default]
    FullFrame,
    /// Four user-picked points, in any order.
    Points { points: Vec<[f32; 2]> },
}

/// Sidecar description of one annotation session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnnotationScript {
    #[serde(default)]
    pub corners: CornerSource,
    /// Events in the exact order they should be applied. A trailing
    /// `terminate` is implied if absent.
    #[serde(default)]
    pub events: Vec<AnnotationEvent>,
    /// Target fraction override; the recommended minimum applies otherwise.
    #[serde(default)]
    pub target: Option<f64>,
}

impl AnnotationScript {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ScriptIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ScriptIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Per-image artifact of a completed coverage run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoverageReport {
    pub image_path: String,
    /// Side length of the rectified square board.
    pub board_side: usize,
    pub committed_polygons: usize,
    pub coverage: CoverageResult,
    /// Human-readable summary, as shown to the player.
    pub summary: String,
}

impl CoverageReport {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ScriptIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ScriptIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
