//! Exact-color, 4-connected flood fill.
//!
//! Matching compares RGB only. Alpha is ignored, so a region that was
//! already erased still matches seeds of its original color.

use image::Rgba;
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::Result;
use crate::mask::Mask;

#[inline]
fn same_rgb(a: &Rgba<u8>, b: &Rgba<u8>) -> bool {
    a[0] == b[0] && a[1] == b[1] && a[2] == b[2]
}

/// Compute the maximal 4-connected region around `(seed_x, seed_y)` whose
/// pixels have exactly the seed's RGB.
///
/// Each pixel is visited at most once and `buffer` is never modified.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if the seed lies outside the buffer.
pub fn flood_fill(buffer: &PixelBuffer, seed_x: u32, seed_y: u32) -> Result<Mask> {
    let target = buffer.get_pixel(seed_x, seed_y)?;
    let img = buffer.as_image();
    let (width, height) = img.dimensions();

    // mask doubles as the visited set
    let mut mask = Mask::new(width, height);
    let mut stack: Vec<(u32, u32)> = Vec::with_capacity(1024);
    mask.insert_index(mask.index(seed_x, seed_y));
    stack.push((seed_x, seed_y));

    while let Some((x, y)) = stack.pop() {
        let mut visit = |nx: u32, ny: u32| {
            let idx = mask.index(nx, ny);
            if !mask.get_index(idx) && same_rgb(img.get_pixel(nx, ny), &target) {
                mask.insert_index(idx);
                stack.push((nx, ny));
            }
        };
        if x > 0 {
            visit(x - 1, y);
        }
        if x + 1 < width {
            visit(x + 1, y);
        }
        if y > 0 {
            visit(x, y - 1);
        }
        if y + 1 < height {
            visit(x, y + 1);
        }
    }

    debug!(seed_x, seed_y, pixels = mask.count(), "flood fill complete");
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::RgbaImage;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    fn block_on_green() -> PixelBuffer {
        // 10x10 red block at (5, 5) inside a 20x20 green field
        let img = RgbaImage::from_fn(20, 20, |x, y| {
            if (5..15).contains(&x) && (5..15).contains(&y) {
                RED
            } else {
                GREEN
            }
        });
        PixelBuffer::from_image(img).unwrap()
    }

    #[test]
    fn fill_returns_exact_rectangle() {
        let buf = block_on_green();
        let mask = flood_fill(&buf, 9, 9).unwrap();
        assert_eq!(mask.count(), 100);
        assert_eq!(mask.bounds(), Some((5, 5, 14, 14)));
        for (x, y) in mask.iter() {
            assert_eq!(buf.get_pixel(x, y).unwrap(), RED);
        }
    }

    #[test]
    fn fill_surrounding_region_excludes_block() {
        let buf = block_on_green();
        let mask = flood_fill(&buf, 0, 0).unwrap();
        assert_eq!(mask.count(), 400 - 100);
        assert!(!mask.contains(5, 5));
    }

    #[test]
    fn diagonal_neighbours_are_not_connected() {
        let mut img = RgbaImage::from_pixel(3, 3, GREEN);
        img.put_pixel(0, 0, RED);
        img.put_pixel(1, 1, RED);
        img.put_pixel(2, 2, RED);
        let buf = PixelBuffer::from_image(img).unwrap();

        let mask = flood_fill(&buf, 1, 1).unwrap();
        assert_eq!(mask.count(), 1);
        assert!(mask.contains(1, 1));
        assert!(!mask.contains(0, 0));
        assert!(!mask.contains(2, 2));
    }

    #[test]
    fn alpha_is_ignored_when_matching() {
        let mut img = RgbaImage::from_pixel(4, 1, RED);
        img.put_pixel(1, 0, Rgba([255, 0, 0, 0]));
        img.put_pixel(2, 0, Rgba([255, 0, 0, 17]));
        let buf = PixelBuffer::from_image(img).unwrap();

        let mask = flood_fill(&buf, 0, 0).unwrap();
        assert_eq!(mask.count(), 4);
    }

    #[test]
    fn near_colors_do_not_match() {
        let mut img = RgbaImage::from_pixel(3, 1, RED);
        img.put_pixel(1, 0, Rgba([254, 0, 0, 255]));
        let buf = PixelBuffer::from_image(img).unwrap();

        let mask = flood_fill(&buf, 0, 0).unwrap();
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn fill_does_not_mutate_buffer() {
        let buf = block_on_green();
        let before = buf.clone();
        let _ = flood_fill(&buf, 0, 0).unwrap();
        assert_eq!(buf, before);
    }

    #[test]
    fn out_of_bounds_seed_is_an_error() {
        let buf = block_on_green();
        assert!(matches!(
            flood_fill(&buf, 20, 0),
            Err(Error::OutOfBounds { x: 20, y: 0, .. })
        ));
        assert!(flood_fill(&buf, 0, 25).is_err());
    }
}
