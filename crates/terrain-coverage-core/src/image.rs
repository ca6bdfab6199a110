/// Errors describing a malformed pixel buffer.
#[derive(thiserror::Error, Debug)]
pub enum BufferError {
    #[error("empty source buffer (width={width}, height={height})")]
    EmptySourceBuffer { width: usize, height: usize },
    #[error("buffer length mismatch (expected {expected} bytes, got {got})")]
    LengthMismatch { expected: usize, got: usize },
    #[error("unsupported channel count {channels} (expected 3 or 4)")]
    UnsupportedChannels { channels: usize },
}

/// Borrowed view over an interleaved 8-bit color image, row-major,
/// `len = width * height * channels`.
#[derive(Clone, Copy, Debug)]
pub struct ColorImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8],
}

/// Owned interleaved 8-bit color image (3 or 4 channels).
#[derive(Clone, Debug, PartialEq)]
pub struct ColorImage {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

/// Owned single-channel 8-bit image, used for the intensity-threshold
/// coverage mode.
#[derive(Clone, Debug, PartialEq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

/// Borrowed view over a single-channel 8-bit image.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

impl ColorImage {
    /// Validate and take ownership of a raw interleaved buffer.
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, BufferError> {
        if !(channels == 3 || channels == 4) {
            return Err(BufferError::UnsupportedChannels { channels });
        }
        if width == 0 || height == 0 {
            return Err(BufferError::EmptySourceBuffer { width, height });
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Allocate a zeroed (black) image.
    pub fn zeroed(width: usize, height: usize, channels: usize) -> Result<Self, BufferError> {
        Self::from_raw(width, height, channels, vec![0u8; width * height * channels])
    }

    pub fn as_view(&self) -> ColorImageView<'_> {
        ColorImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: &self.data,
        }
    }

    /// ITU-R BT.601 luma reduction, for the threshold coverage mode.
    pub fn to_luma(&self) -> GrayImage {
        let mut data = Vec::with_capacity(self.width * self.height);
        for px in self.data.chunks_exact(self.channels) {
            let y = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            data.push(y.round().clamp(0.0, 255.0) as u8);
        }
        GrayImage {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

impl GrayImage {
    pub fn as_view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

#[inline]
fn fetch(src: &ColorImageView<'_>, x: i32, y: i32, c: usize) -> u8 {
    // Out-of-bounds samples read as black border.
    if x < 0 || y < 0 || x >= src.width as i32 || y >= src.height as i32 {
        return 0;
    }
    src.data[(y as usize * src.width + x as usize) * src.channels + c]
}

/// Bilinear sample of one channel at a fractional source coordinate.
#[inline]
pub fn sample_bilinear_channel(src: &ColorImageView<'_>, x: f32, y: f32, c: usize) -> f32 {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = fetch(src, x0, y0, c) as f32;
    let p10 = fetch(src, x0 + 1, y0, c) as f32;
    let p01 = fetch(src, x0, y0 + 1, c) as f32;
    let p11 = fetch(src, x0 + 1, y0 + 1, c) as f32;

    let top = p00 + fx * (p10 - p00);
    let bot = p01 + fx * (p11 - p01);
    top + fy * (bot - top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_bad_shapes() {
        assert!(matches!(
            ColorImage::from_raw(0, 4, 3, vec![]),
            Err(BufferError::EmptySourceBuffer { .. })
        ));
        assert!(matches!(
            ColorImage::from_raw(2, 2, 2, vec![0; 8]),
            Err(BufferError::UnsupportedChannels { channels: 2 })
        ));
        assert!(matches!(
            ColorImage::from_raw(2, 2, 3, vec![0; 11]),
            Err(BufferError::LengthMismatch {
                expected: 12,
                got: 11
            })
        ));
    }

    #[test]
    fn bilinear_interpolates_between_neighbors() {
        // 2x1 single-row image, red channel 0 then 200.
        let img = ColorImage::from_raw(2, 1, 3, vec![0, 0, 0, 200, 0, 0]).unwrap();
        let v = sample_bilinear_channel(&img.as_view(), 0.5, 0.0, 0);
        assert!((v - 100.0).abs() < 1e-4);
    }

    #[test]
    fn border_samples_black() {
        let img = ColorImage::from_raw(1, 1, 3, vec![255, 255, 255]).unwrap();
        assert_eq!(sample_bilinear_channel(&img.as_view(), -5.0, -5.0, 0), 0.0);
    }

    #[test]
    fn luma_of_pure_white_is_255() {
        let img = ColorImage::from_raw(1, 1, 3, vec![255, 255, 255]).unwrap();
        assert_eq!(img.to_luma().data, vec![255]);
    }
}
