//! Overlay rendering: alpha-blend a marker color over the covered region and
//! optionally trace committed polygon outlines, producing a new
//! visualization buffer.

use crate::{CoverageMask, Polygon};
use terrain_coverage_core::{ColorImage, ColorImageView};

#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    #[error("mask is {mask_w}x{mask_h} but base buffer is {img_w}x{img_h}")]
    DimensionMismatch {
        mask_w: usize,
        mask_h: usize,
        img_w: usize,
        img_h: usize,
    },
}

/// Marker appearance for the coverage overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    /// RGB marker color blended over covered pixels.
    pub color: [u8; 3],
    /// Blend weight of the marker color, in (0, 1].
    pub alpha: f32,
    /// Outline color for committed polygon borders, if any.
    pub outline: Option<[u8; 3]>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            alpha: 0.4,
            outline: Some([255, 255, 255]),
        }
    }
}

/// Blend `style.color` over every masked pixel of a copy of `base`:
/// `out = alpha * marker + (1 - alpha) * base`, per color channel, rounded.
/// Unmasked pixels (and the alpha channel of 4-channel buffers) pass through.
pub fn compose_overlay(
    base: &ColorImageView<'_>,
    mask: &CoverageMask,
    style: &OverlayStyle,
) -> Result<ColorImage, OverlayError> {
    if mask.width() != base.width || mask.height() != base.height {
        return Err(OverlayError::DimensionMismatch {
            mask_w: mask.width(),
            mask_h: mask.height(),
            img_w: base.width,
            img_h: base.height,
        });
    }

    let channels = base.channels;
    let mut out = base.data.to_vec();
    let a = style.alpha;

    for y in 0..base.height {
        for x in 0..base.width {
            if !mask.get(x, y) {
                continue;
            }
            let idx = (y * base.width + x) * channels;
            for c in 0..3 {
                let blended = a * style.color[c] as f32 + (1.0 - a) * out[idx + c] as f32;
                out[idx + c] = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(ColorImage {
        width: base.width,
        height: base.height,
        channels,
        data: out,
    })
}

/// Trace the closed outline of each polygon onto the image.
pub fn draw_polygon_outlines(img: &mut ColorImage, polygons: &[Polygon], color: [u8; 3]) {
    for poly in polygons {
        let n = poly.vertices.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            let a = poly.vertices[i];
            let b = poly.vertices[(i + 1) % n];
            draw_line(img, a.x, a.y, b.x, b.y, color);
        }
    }
}

// Integer Bresenham over rounded endpoints; off-buffer segments are skipped
// pixel by pixel.
fn draw_line(img: &mut ColorImage, x0: f32, y0: f32, x1: f32, y1: f32, color: [u8; 3]) {
    let mut x = x0.round() as i64;
    let mut y = y0.round() as i64;
    let xe = x1.round() as i64;
    let ye = y1.round() as i64;

    let dx = (xe - x).abs();
    let dy = -(ye - y).abs();
    let sx = if x < xe { 1 } else { -1 };
    let sy = if y < ye { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel(img, x, y, color);
        if x == xe && y == ye {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[inline]
fn put_pixel(img: &mut ColorImage, x: i64, y: i64, color: [u8; 3]) {
    if x < 0 || y < 0 || x >= img.width as i64 || y >= img.height as i64 {
        return;
    }
    let idx = (y as usize * img.width + x as usize) * img.channels;
    img.data[idx..idx + 3].copy_from_slice(&color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn gray_base(width: usize, height: usize, value: u8) -> ColorImage {
        ColorImage::from_raw(width, height, 3, vec![value; width * height * 3]).unwrap()
    }

    #[test]
    fn blends_only_masked_pixels() {
        let base = gray_base(4, 1, 100);
        let mut mask = CoverageMask::new(4, 1);
        mask.set(1, 0);

        let style = OverlayStyle {
            color: [255, 0, 0],
            alpha: 0.4,
            outline: None,
        };
        let out = compose_overlay(&base.as_view(), &mask, &style).unwrap();

        // 0.4*255 + 0.6*100 = 162, 0.4*0 + 0.6*100 = 60.
        assert_eq!(&out.data[3..6], &[162, 60, 60]);
        // Neighbors untouched.
        assert_eq!(&out.data[0..3], &[100, 100, 100]);
        assert_eq!(&out.data[6..9], &[100, 100, 100]);
        // Base not mutated.
        assert_eq!(base.data[3], 100);
    }

    #[test]
    fn alpha_channel_passes_through() {
        let base = ColorImage::from_raw(1, 1, 4, vec![10, 20, 30, 200]).unwrap();
        let mut mask = CoverageMask::new(1, 1);
        mask.set(0, 0);

        let out = compose_overlay(&base.as_view(), &mask, &OverlayStyle::default()).unwrap();
        assert_eq!(out.data[3], 200);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let base = gray_base(4, 4, 0);
        let mask = CoverageMask::new(3, 4);
        assert!(matches!(
            compose_overlay(&base.as_view(), &mask, &OverlayStyle::default()),
            Err(OverlayError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn outlines_touch_the_border_pixels() {
        let mut img = gray_base(8, 8, 0);
        let poly = Polygon::new(vec![
            Point2::new(1.0, 1.0),
            Point2::new(6.0, 1.0),
            Point2::new(6.0, 6.0),
            Point2::new(1.0, 6.0),
        ]);
        draw_polygon_outlines(&mut img, &[poly], [255, 255, 255]);

        for x in 1..=6 {
            assert_eq!(img.data[(1 * 8 + x) * 3], 255, "top edge x={x}");
            assert_eq!(img.data[(6 * 8 + x) * 3], 255, "bottom edge x={x}");
        }
        // Interior untouched.
        assert_eq!(img.data[(3 * 8 + 3) * 3], 0);
    }
}
