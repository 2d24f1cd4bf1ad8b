//! Display rendering: the scaled image composited over a checkerboard.
//!
//! Transparent areas show a light/grey checkerboard so erased regions are
//! visible on screen. Nothing here touches the source pixels.

use image::{RgbImage, RgbaImage};

use crate::buffer::PixelBuffer;

/// Edge length of one checkerboard tile, in display pixels.
pub const CHECKER_TILE: u32 = 10;
/// Shade of the light tiles.
pub const CHECKER_LIGHT: u8 = 255;
/// Shade of the dark tiles.
pub const CHECKER_DARK: u8 = 220;

/// Checkerboard shade at display pixel `(x, y)`.
#[must_use]
pub fn checker_shade(x: u32, y: u32) -> u8 {
    if (x / CHECKER_TILE + y / CHECKER_TILE) % 2 == 0 {
        CHECKER_DARK
    } else {
        CHECKER_LIGHT
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn blend(src: u8, alpha: u8, bg: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(src) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8
}

fn composite_row(view: &RgbaImage, y: u32, row: &mut [u8]) {
    for (x, out) in (0..view.width()).zip(row.chunks_exact_mut(3)) {
        let px = view.get_pixel(x, y);
        let bg = checker_shade(x, y);
        out[0] = blend(px[0], px[3], bg);
        out[1] = blend(px[1], px[3], bg);
        out[2] = blend(px[2], px[3], bg);
    }
}

/// Render `buffer` at `scale` over a checkerboard covering the whole scaled
/// image.
///
/// Rows are composited in parallel when the `cli` feature is enabled.
#[must_use]
pub fn render(buffer: &PixelBuffer, scale: f64) -> RgbImage {
    let view = buffer.resize_view(scale);
    let (width, height) = view.dimensions();
    let mut out = RgbImage::new(width, height);
    let stride = width as usize * 3;

    #[cfg(feature = "cli")]
    {
        use rayon::prelude::*;
        out.par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| composite_row(&view, row_index(y), row));
    }

    #[cfg(not(feature = "cli"))]
    {
        out.chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| composite_row(&view, row_index(y), row));
    }

    out
}

#[allow(clippy::cast_possible_truncation)]
fn row_index(y: usize) -> u32 {
    y as u32
}
