//! Click-to-erase orchestration over a single image.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::buffer::PixelBuffer;
use crate::error::Result;
use crate::fill;
use crate::history::{Edit, EditHistory};
use crate::zoom;

/// Options controlling editor behavior.
#[derive(Debug, Clone, Default)]
pub struct EditorOptions {
    /// Skip recording clicks that land on an already fully transparent
    /// region. Off by default, so every accepted click becomes a history
    /// entry.
    pub skip_noop_edits: bool,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// What a click did to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click fell outside the image; nothing changed.
    Ignored,
    /// The region was already transparent and no-op edits are skipped.
    Unchanged,
    /// A region was erased and recorded in history.
    Erased {
        /// Number of pixels in the erased region.
        pixels: usize,
    },
}

impl ClickOutcome {
    /// Whether the image should be redrawn.
    #[must_use]
    pub fn needs_redraw(self) -> bool {
        matches!(self, Self::Erased { .. })
    }
}

/// One open image together with its edit history.
///
/// Every mutation goes through `&mut self`; the buffer and history are
/// owned here and nowhere else.
#[derive(Debug, Clone)]
pub struct Editor {
    buffer: PixelBuffer,
    history: EditHistory,
    options: EditorOptions,
}

impl Editor {
    /// Start editing `buffer` with an empty history.
    #[must_use]
    pub fn new(buffer: PixelBuffer, options: EditorOptions) -> Self {
        Self {
            buffer,
            history: EditHistory::new(),
            options,
        }
    }

    /// Load an image file and start editing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn open(path: &Path, options: EditorOptions) -> Result<Self> {
        Ok(Self::new(PixelBuffer::load(path)?, options))
    }

    /// The image being edited.
    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// The edit history.
    #[must_use]
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// The options this editor was created with.
    #[must_use]
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Handle a click at display coordinates `(x, y)` on an image drawn at
    /// `scale`.
    ///
    /// Clicks that map outside the image are ignored without error and
    /// leave no history entry.
    pub fn apply_click(&mut self, x: f64, y: f64, scale: f64) -> ClickOutcome {
        let Some((sx, sy)) = zoom::display_to_source(x, y, scale) else {
            return ClickOutcome::Ignored;
        };
        if !self.buffer.in_bounds(sx, sy) {
            debug!(x, y, scale, sx, sy, "click outside image ignored");
            return ClickOutcome::Ignored;
        }
        self.erase_at(sx, sy).unwrap_or(ClickOutcome::Ignored)
    }

    /// Erase the region connected to source pixel `(x, y)`.
    ///
    /// The region is computed before anything is written, so a failure
    /// leaves the buffer and history untouched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if `(x, y)` is outside the image.
    pub fn erase_at(&mut self, x: u32, y: u32) -> Result<ClickOutcome> {
        let mask = fill::flood_fill(&self.buffer, x, y)?;
        let edit = Edit::capture(&self.buffer, mask);

        if self.options.skip_noop_edits && edit.is_noop() {
            debug!(x, y, "region already transparent, not recorded");
            return Ok(ClickOutcome::Unchanged);
        }

        let pixels = edit.len();
        // captured on this buffer, so it always fits
        edit.apply(&mut self.buffer);
        self.history.record(edit);
        debug!(
            x,
            y,
            pixels,
            cursor = self.history.cursor(),
            "region erased"
        );
        Ok(ClickOutcome::Erased { pixels })
    }

    /// Revert the most recent edit. Returns `false` if there was nothing to
    /// undo.
    pub fn undo(&mut self) -> bool {
        let Some(edit) = self.history.undo() else {
            return false;
        };
        let reverted = edit.revert(&mut self.buffer);
        debug!(cursor = self.history.cursor(), "undo");
        reverted
    }

    /// Re-apply the most recently undone edit. Returns `false` if there was
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(edit) = self.history.redo() else {
            return false;
        };
        let applied = edit.apply(&mut self.buffer);
        debug!(cursor = self.history.cursor(), "redo");
        applied
    }

    /// Save the current image as PNG. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        let written = self.buffer.save(path)?;
        info!(
            path = %written.display(),
            edits = self.history.cursor(),
            "saved edited image"
        );
        Ok(written)
    }
}
