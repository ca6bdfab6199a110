//! Adapters between the `image` crate and the core buffer types.

use terrain_coverage_core::{BufferError, ColorImage};

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Convert a decoded image into an owned RGB core buffer.
pub fn color_from_dynamic(img: &image::DynamicImage) -> Result<ColorImage, ConvertError> {
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    Ok(ColorImage::from_raw(
        w as usize,
        h as usize,
        3,
        rgb.into_raw(),
    )?)
}

/// Convert a core buffer back into an `image` buffer for encoding.
pub fn dynamic_from_color(img: &ColorImage) -> Result<image::DynamicImage, ConvertError> {
    let w = img.width as u32;
    let h = img.height as u32;
    let out = match img.channels {
        4 => image::RgbaImage::from_raw(w, h, img.data.clone())
            .map(image::DynamicImage::ImageRgba8),
        _ => {
            image::RgbImage::from_raw(w, h, img.data.clone()).map(image::DynamicImage::ImageRgb8)
        }
    };
    out.ok_or(ConvertError::Buffer(BufferError::LengthMismatch {
        expected: img.width * img.height * img.channels,
        got: img.data.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_pixels() {
        let core = ColorImage::from_raw(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let dynamic = dynamic_from_color(&core).unwrap();
        let back = color_from_dynamic(&dynamic).unwrap();
        assert_eq!(back, core);
    }
}
