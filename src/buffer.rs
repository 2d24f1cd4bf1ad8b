//! In-memory RGBA pixel storage, decoding, PNG encoding and display views.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A fully transparent pixel value.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// The editable image: `width x height` RGBA pixels stored row-major.
///
/// Dimensions are fixed once the buffer exists. Transparency lives only in
/// the alpha channel; erasing a pixel never touches its RGB values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: RgbaImage,
}

impl PixelBuffer {
    /// Decode an image file into RGBA pixels.
    ///
    /// Sources without an alpha channel come out fully opaque.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if the file cannot be read or decoded, or
    /// [`Error::EmptyImage`] if it has no pixels.
    pub fn load(path: &Path) -> Result<Self> {
        let pixels = image::open(path)?.to_rgba8();
        let buffer = Self::from_image(pixels)?;
        info!(
            path = %path.display(),
            width = buffer.width(),
            height = buffer.height(),
            "image loaded"
        );
        Ok(buffer)
    }

    /// Decode an in-memory JPEG or PNG.
    ///
    /// # Errors
    ///
    /// Same as [`PixelBuffer::load`].
    pub fn from_memory(bytes: &[u8]) -> Result<Self> {
        Self::from_image(image::load_from_memory(bytes)?.to_rgba8())
    }

    /// Wrap an existing RGBA image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] if either dimension is zero.
    pub fn from_image(pixels: RgbaImage) -> Result<Self> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        Ok(Self { pixels })
    }

    /// Create a buffer filled with a single color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] if either dimension is zero.
    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Result<Self> {
        Self::from_image(RgbaImage::from_pixel(width, height, color))
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether `(x, y)` addresses a pixel of this buffer.
    #[must_use]
    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height()
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    /// Read one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `(x, y)` is outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Rgba<u8>> {
        self.check_bounds(x, y)?;
        Ok(*self.pixels.get_pixel(x, y))
    }

    /// Overwrite one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `(x, y)` is outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: Rgba<u8>) -> Result<()> {
        self.check_bounds(x, y)?;
        self.pixels.put_pixel(x, y, value);
        Ok(())
    }

    /// Callers must have bounds-checked `(x, y)`; masks built against this
    /// buffer satisfy that.
    pub(crate) fn pixel_mut(&mut self, x: u32, y: u32) -> &mut Rgba<u8> {
        self.pixels.get_pixel_mut(x, y)
    }

    /// Borrow the underlying image.
    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Number of pixels with alpha 0.
    #[must_use]
    pub fn transparent_count(&self) -> usize {
        self.pixels.pixels().filter(|p| p[3] == 0).count()
    }

    /// Encode the buffer as PNG bytes, alpha preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if encoding fails.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.pixels.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// Save as PNG.
    ///
    /// PNG is the only accepted format that keeps per-pixel transparency, so
    /// the extension of `path` is replaced by `.png` whatever it was. Returns
    /// the path actually written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the parent directory cannot be created, or
    /// [`Error::Image`] if encoding or writing fails.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        let target = png_path(path);
        ensure_parent_dir(&target)?;
        self.pixels.save_with_format(&target, ImageFormat::Png)?;
        info!(path = %target.display(), "image saved");
        Ok(target)
    }

    /// Size of the display view at `scale`: `max(1, round(dim * scale))`.
    #[must_use]
    pub fn display_dimensions(&self, scale: f64) -> (u32, u32) {
        (
            scaled_dimension(self.width(), scale),
            scaled_dimension(self.height(), scale),
        )
    }

    /// A nearest-neighbour resized copy for display at `scale`.
    ///
    /// The buffer itself is left untouched; edits always address source pixels.
    #[must_use]
    pub fn resize_view(&self, scale: f64) -> RgbaImage {
        let (w, h) = self.display_dimensions(scale);
        if (w, h) == self.pixels.dimensions() {
            return self.pixels.clone();
        }
        debug!(scale, width = w, height = h, "resizing display view");
        imageops::resize(&self.pixels, w, h, FilterType::Nearest)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_dimension(dim: u32, scale: f64) -> u32 {
    ((f64::from(dim) * scale).round() as u32).max(1)
}

/// Create the missing parent directories of `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if a directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// `path` with its extension forced to `.png`.
#[must_use]
pub fn png_path(path: &Path) -> PathBuf {
    path.with_extension("png")
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_transparent.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_transparent.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> PixelBuffer {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 128])
            }
        });
        PixelBuffer::from_image(img).unwrap()
    }

    #[test]
    fn empty_images_are_rejected() {
        let err = PixelBuffer::from_image(RgbaImage::new(0, 5)).unwrap_err();
        assert!(matches!(
            err,
            Error::EmptyImage {
                width: 0,
                height: 5
            }
        ));
    }

    #[test]
    fn pixel_access_is_bounds_checked() {
        let mut buf = checker(4, 3);
        assert_eq!(buf.get_pixel(0, 0).unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(buf.get_pixel(1, 0).unwrap(), Rgba([0, 0, 255, 128]));
        assert!(matches!(
            buf.get_pixel(4, 0),
            Err(Error::OutOfBounds { x: 4, y: 0, .. })
        ));
        assert!(buf.set_pixel(0, 3, TRANSPARENT).is_err());

        buf.set_pixel(3, 2, TRANSPARENT).unwrap();
        assert_eq!(buf.get_pixel(3, 2).unwrap(), TRANSPARENT);
        assert_eq!(buf.transparent_count(), 1);
    }

    #[test]
    fn png_bytes_round_trip_alpha() {
        let mut buf = checker(5, 5);
        buf.set_pixel(2, 2, Rgba([9, 8, 7, 0])).unwrap();
        let bytes = buf.encode_png().unwrap();
        let back = PixelBuffer::from_memory(&bytes).unwrap();
        assert_eq!(back, buf);
    }

    #[test]
    fn rgb_sources_decode_opaque() {
        let rgb = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        let mut bytes = Cursor::new(Vec::new());
        rgb.write_to(&mut bytes, ImageFormat::Png).unwrap();
        let buf = PixelBuffer::from_memory(bytes.get_ref()).unwrap();
        assert!(buf.as_image().pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn resize_view_leaves_source_untouched() {
        let buf = checker(10, 4);
        let before = buf.clone();

        let view = buf.resize_view(2.0);
        assert_eq!(view.dimensions(), (20, 8));
        assert_eq!(*view.get_pixel(0, 0), *buf.as_image().get_pixel(0, 0));

        let tiny = buf.resize_view(0.01);
        assert_eq!(tiny.dimensions(), (1, 1));
        assert_eq!(buf, before);
    }

    #[test]
    fn output_paths_are_png() {
        assert_eq!(png_path(Path::new("a/b.jpg")), PathBuf::from("a/b.png"));
        assert_eq!(png_path(Path::new("out")), PathBuf::from("out.png"));
        assert_eq!(
            default_output_path(Path::new("/tmp/photo.jpg")),
            PathBuf::from("/tmp/photo_transparent.png")
        );
    }
}
