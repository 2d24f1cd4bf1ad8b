//! Error types for the flood-eraser crate.

/// Errors that can occur while loading, editing, or saving an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while decoding or encoding image data.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// The file extension is not one of the accepted image formats.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// More than one file was handed over where exactly one is expected.
    #[error("expected a single image file, got {0}")]
    MultipleFiles(usize),

    /// A pixel coordinate lies outside the image.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// The decoded image has no pixels.
    #[error("image has an empty dimension ({width}x{height})")]
    EmptyImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// The operation needs an open image but none is loaded.
    #[error("no image is open")]
    NoImage,

    /// A textual command could not be parsed.
    #[error("invalid command: {0}")]
    ParseCommand(String),
}

impl Error {
    /// Whether the error belongs to the file-access family (unreadable,
    /// undecodable, unsupported, or unwritable file).
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Image(_) | Self::UnsupportedFormat(_) | Self::EmptyImage { .. }
        )
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
