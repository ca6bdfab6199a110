//! Directory-level orchestration: scan an input folder for board photos,
//! run the pipeline per image into its own output namespace, and keep going
//! past per-image failures.

use crate::pipeline::{process_image, PipelineError, PipelineOptions};
use crate::script::AnnotationScript;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// What happened to each image of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// (image file name, report) for every image processed successfully.
    pub processed: Vec<(String, crate::script::CoverageReport)>,
    /// (image file name, error text) for images that failed.
    pub failed: Vec<(String, String)>,
}

/// Collect supported image files directly under `input_dir`, sorted by name
/// for a deterministic processing order.
pub fn scan_input_dir(input_dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if path.is_file() && is_image {
            log::info!("found input image {:?}", path.file_name().unwrap_or_default());
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Sidecar script for an image: `<stem>.annotations.json` next to it.
/// Images without one get the default script (full frame, no events).
pub fn sidecar_script(image_path: &Path) -> Result<AnnotationScript, PipelineError> {
    let stem = image_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PipelineError::InvalidInputPath(image_path.to_path_buf()))?;
    let script_path = image_path.with_file_name(format!("{stem}.annotations.json"));
    if script_path.exists() {
        Ok(AnnotationScript::load_json(&script_path)?)
    } else {
        Ok(AnnotationScript::default())
    }
}

/// Run the pipeline for every image in `input_dir`.
///
/// Each image gets a fresh `output_dir/<stem>/` namespace (removed first if
/// it already exists). Geometry or script errors are fatal only to their own
/// image: they are logged and recorded in the summary while the batch moves
/// on to the next image.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    opts: &PipelineOptions,
) -> Result<BatchSummary, std::io::Error> {
    let mut summary = BatchSummary::default();

    for image_path in scan_input_dir(input_dir)? {
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let out_dir = output_dir.join(&stem);
        if out_dir.exists() {
            std::fs::remove_dir_all(&out_dir)?;
        }
        std::fs::create_dir_all(&out_dir)?;

        let result = sidecar_script(&image_path)
            .and_then(|script| process_image(&image_path, &out_dir, &script, opts));
        match result {
            Ok(report) => summary.processed.push((file_name, report)),
            Err(err) => {
                log::error!("{file_name}: {err}");
                summary.failed.push((file_name, err.to_string()));
            }
        }
    }

    Ok(summary)
}
