use terrain_coverage::annotate::{measure_threshold, DEFAULT_INTENSITY_THRESHOLD};
use terrain_coverage::core::rectify_full_frame;
use terrain_coverage::pipeline::decode_image;

#[cfg(feature = "tracing")]
use terrain_coverage::core::init_tracing;

/// Rectify a board photo in skip mode and report threshold-based coverage.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    init_tracing(false);

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: measure_board <image_path>");
        return Ok(());
    };

    let photo = decode_image(&path)?;
    let board = rectify_full_frame(&photo.as_view())?;
    let luma = board.image.to_luma();
    let result = measure_threshold(&luma.as_view(), DEFAULT_INTENSITY_THRESHOLD, 0.33);

    println!("{result}");
    Ok(())
}
