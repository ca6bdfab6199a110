use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use terrain_coverage::batch::run_batch;
use terrain_coverage::pipeline::{CoverageMode, PipelineOptions};
use terrain_coverage::OverlayStyle;

/// Estimate tabletop terrain coverage from board photographs.
///
/// Scans the input directory for photos, rectifies each board through the
/// corners given in its `<stem>.annotations.json` sidecar (or the full frame
/// when absent), replays the sidecar's polygon events, and writes the photo
/// copy, the rectified board, the coverage overlay, and a JSON report per
/// image.
#[derive(Parser, Debug)]
#[command(name = "terrain-coverage", version)]
struct Cli {
    /// Directory scanned for .png/.jpg/.jpeg board photos.
    #[arg(long, default_value = "input")]
    input_dir: PathBuf,

    /// Per-image output namespaces are created under this directory.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Measure near-black pixels of the rectified board (intensity strictly
    /// below the given 0-255 threshold) instead of replaying polygon events.
    #[arg(long)]
    threshold: Option<u8>,

    /// Overlay blend weight for the marker color.
    #[arg(long, default_value_t = 0.4)]
    alpha: f32,

    /// Log more (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = terrain_coverage::core::init_with_level(level);

    let opts = PipelineOptions {
        mode: match cli.threshold {
            Some(threshold) => CoverageMode::Threshold { threshold },
            None => CoverageMode::Polygons,
        },
        style: OverlayStyle {
            alpha: cli.alpha.clamp(f32::EPSILON, 1.0),
            ..OverlayStyle::default()
        },
    };

    let summary = match run_batch(&cli.input_dir, &cli.output_dir, &opts) {
        Ok(summary) => summary,
        Err(err) => {
            log::error!("batch failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    for (name, report) in &summary.processed {
        log::info!("{name}: {}", report.summary);
    }
    for (name, err) in &summary.failed {
        log::warn!("{name}: failed ({err})");
    }

    if summary.processed.is_empty() && !summary.failed.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
