//! End-to-end batch test over synthetic board photos.

use terrain_coverage::batch::run_batch;
use terrain_coverage::pipeline::PipelineOptions;
use terrain_coverage::script::{AnnotationScript, CoverageReport};
use terrain_coverage::{AnnotationEvent, Deficit};

fn write_board_photo(path: &std::path::Path, side: u32) {
    let img = image::RgbImage::from_fn(side, side, |x, y| {
        // Felt-green board with a light grid, so rectification has texture.
        if x % 8 == 0 || y % 8 == 0 {
            image::Rgb([90, 140, 90])
        } else {
            image::Rgb([40, 110, 40])
        }
    });
    img.save(path).unwrap();
}

#[test]
fn batch_produces_all_artifacts_and_a_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    std::fs::create_dir_all(&input).unwrap();

    write_board_photo(&input.join("table.png"), 64);

    // Half-board rectangle; terminate left implicit.
    let script = AnnotationScript {
        events: vec![
            AnnotationEvent::AddPoint { x: 0.0, y: 0.0 },
            AnnotationEvent::AddPoint { x: 63.0, y: 0.0 },
            AnnotationEvent::AddPoint { x: 63.0, y: 31.5 },
            AnnotationEvent::AddPoint { x: 0.0, y: 31.5 },
            AnnotationEvent::FinalizePolygon,
        ],
        ..AnnotationScript::default()
    };
    script
        .write_json(input.join("table.annotations.json"))
        .unwrap();

    let summary = run_batch(&input, &output, &PipelineOptions::default()).unwrap();
    assert_eq!(summary.processed.len(), 1);
    assert!(summary.failed.is_empty());

    let ns = output.join("table");
    for artifact in ["photo_table.png", "board_table.png", "coverage_table.png"] {
        assert!(ns.join(artifact).exists(), "missing {artifact}");
    }

    let report = CoverageReport::load_json(ns.join("report.json")).unwrap();
    // Full-frame 64x64 photo rectifies to a 63x63 board.
    assert_eq!(report.board_side, 63);
    assert_eq!(report.committed_polygons, 1);
    // Rectangle spans rows 0..31 of 63: 31 * 63 of 3969 pixels.
    assert_eq!(report.coverage.covered_pixels, 1953);
    assert_eq!(report.coverage.deficit, Deficit::AtOrAboveTarget);
    assert!(report.summary.contains("Terrain coverage"));

    // JSON float parsing is not bit-exact; compare counts exactly and the
    // fraction with a tolerance.
    let (_, in_memory) = &summary.processed[0];
    assert_eq!(in_memory.coverage.covered_pixels, report.coverage.covered_pixels);
    assert_eq!(in_memory.coverage.total_pixels, report.coverage.total_pixels);
    assert_eq!(in_memory.coverage.deficit, report.coverage.deficit);
    assert!((in_memory.coverage.fraction - report.coverage.fraction).abs() < 1e-12);
}

#[test]
fn one_broken_image_does_not_abort_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    std::fs::create_dir_all(&input).unwrap();

    std::fs::write(input.join("broken.png"), b"not actually a png").unwrap();
    write_board_photo(&input.join("ok.png"), 32);

    let summary = run_batch(&input, &output, &PipelineOptions::default()).unwrap();

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "broken.png");
    assert_eq!(summary.processed.len(), 1);
    assert_eq!(summary.processed[0].0, "ok.png");

    // The healthy image still has its full artifact set and an empty
    // annotation session (no sidecar): zero coverage sentinel.
    let report = CoverageReport::load_json(output.join("ok").join("report.json")).unwrap();
    assert_eq!(report.coverage.deficit, Deficit::NoCoverage);
    assert_eq!(report.committed_polygons, 0);
}

#[test]
fn unsupported_extensions_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    std::fs::create_dir_all(&input).unwrap();

    std::fs::write(input.join("notes.txt"), b"terrain list").unwrap();
    let summary = run_batch(&input, &output, &PipelineOptions::default()).unwrap();
    assert!(summary.processed.is_empty());
    assert!(summary.failed.is_empty());
}
