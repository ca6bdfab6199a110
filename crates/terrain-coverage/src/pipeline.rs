//! Per-image coverage pipeline: decode, rectify, replay the annotation
//! session, measure coverage, and persist the artifacts.
//!
//! For each input photo the pipeline writes four artifacts into its output
//! namespace: `photo_<name>` (untouched copy), `board_<name>` (rectified
//! square), `coverage_<name>` (overlay visualization), and `report.json`.

use crate::convert::{color_from_dynamic, dynamic_from_color, ConvertError};
use crate::script::{AnnotationScript, CornerSource, CoverageReport, ScriptIoError};
use nalgebra::Point2;
use std::path::Path;
use terrain_coverage_annotate::{
    compose_overlay, draw_polygon_outlines, measure_mask, measure_threshold, threshold_mask,
    AnnotationEvent, AnnotationSession, OverlayError, OverlayStyle, SessionError,
    DEFAULT_TARGET_FRACTION,
};
use terrain_coverage_core::{ColorImage, RectifiedBoard, RectifyError};

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("input path {0:?} has no file name")]
    InvalidInputPath(std::path::PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Rectify(#[from] RectifyError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Overlay(#[from] OverlayError),
    #[error(transparent)]
    Report(#[from] ScriptIoError),
}

/// How the covered region is measured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CoverageMode {
    /// Replay the script's polygon events into a union mask.
    Polygons,
    /// Count rectified-board pixels with luma strictly below the threshold.
    Threshold { threshold: u8 },
}

#[derive(Clone, Copy, Debug)]
pub struct PipelineOptions {
    pub mode: CoverageMode,
    pub style: OverlayStyle,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            mode: CoverageMode::Polygons,
            style: OverlayStyle::default(),
        }
    }
}

/// Decode an image file into an owned RGB core buffer.
pub fn decode_image(path: impl AsRef<Path>) -> Result<ColorImage, PipelineError> {
    let decoded = image::ImageReader::open(path)?.decode()?;
    Ok(color_from_dynamic(&decoded)?)
}

/// Encode a core buffer to a file; the format follows the extension.
pub fn encode_image(path: impl AsRef<Path>, img: &ColorImage) -> Result<(), PipelineError> {
    dynamic_from_color(img)?.save(path)?;
    Ok(())
}

/// Rectify a photo according to the script's corner source.
pub fn rectify_from_script(
    photo: &ColorImage,
    corners: &CornerSource,
) -> Result<RectifiedBoard, PipelineError> {
    let view = photo.as_view();
    let board = match corners {
        CornerSource::FullFrame => terrain_coverage_core::rectify_full_frame(&view)?,
        CornerSource::Points { points } => {
            let pts: Vec<Point2<f32>> = points.iter().map(|&[x, y]| Point2::new(x, y)).collect();
            terrain_coverage_core::rectify_points(&view, &pts)?
        }
    };
    Ok(board)
}

/// Replay scripted events into a fresh session over the board.
///
/// The input source contract requires exactly one `terminate`; scripts may
/// leave it implicit, in which case it is appended here.
pub fn replay_session(
    board_side: usize,
    events: &[AnnotationEvent],
) -> Result<AnnotationSession, SessionError> {
    let mut session = AnnotationSession::new(board_side, board_side);
    for &event in events {
        session.apply(event)?;
    }
    if !events.contains(&AnnotationEvent::Terminate) {
        session.terminate()?;
    }
    Ok(session)
}

/// Run the whole pipeline for one photo and persist all four artifacts into
/// `out_dir` (which must already exist).
pub fn process_image(
    src_path: &Path,
    out_dir: &Path,
    script: &AnnotationScript,
    opts: &PipelineOptions,
) -> Result<CoverageReport, PipelineError> {
    let file_name = src_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PipelineError::InvalidInputPath(src_path.to_path_buf()))?;

    let photo = decode_image(src_path)?;
    std::fs::copy(src_path, out_dir.join(format!("photo_{file_name}")))?;

    let board = rectify_from_script(&photo, &script.corners)?;
    encode_image(out_dir.join(format!("board_{file_name}")), &board.image)?;
    log::info!(
        "{file_name}: rectified {}x{} photo to {}x{} board",
        photo.width,
        photo.height,
        board.side,
        board.side
    );

    let target = script.target.unwrap_or(DEFAULT_TARGET_FRACTION);
    let (coverage, overlay, committed_polygons) = match opts.mode {
        CoverageMode::Polygons => {
            let session = replay_session(board.side, &script.events)?;
            let outcome = session.finish();
            let coverage = measure_mask(&outcome.mask, target);

            let mut overlay = compose_overlay(&board.image.as_view(), &outcome.mask, &opts.style)?;
            if let Some(color) = opts.style.outline {
                draw_polygon_outlines(&mut overlay, &outcome.polygons, color);
            }
            (coverage, overlay, outcome.polygons.len())
        }
        CoverageMode::Threshold { threshold } => {
            let luma = board.image.to_luma();
            let coverage = measure_threshold(&luma.as_view(), threshold, target);
            let mask = threshold_mask(&luma.as_view(), threshold);
            let overlay = compose_overlay(&board.image.as_view(), &mask, &opts.style)?;
            (coverage, overlay, 0)
        }
    };

    encode_image(out_dir.join(format!("coverage_{file_name}")), &overlay)?;

    let report = CoverageReport {
        image_path: src_path.to_string_lossy().into_owned(),
        board_side: board.side,
        committed_polygons,
        coverage,
        summary: coverage.to_string(),
    };
    report.write_json(out_dir.join("report.json"))?;
    log::info!("{file_name}: {}", report.summary);

    Ok(report)
}
