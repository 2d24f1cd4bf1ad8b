//! Reversible edits and the linear undo/redo log.

use image::Rgba;
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::mask::Mask;

/// One reversible erase: the affected pixels and what they held before.
///
/// `previous` stores the full RGBA of every masked pixel, in the mask's
/// row-major order, so undo is exact even when earlier edits left the region
/// with mixed alpha. Applying the edit zeroes alpha and keeps RGB, so both
/// directions are idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    mask: Mask,
    previous: Vec<Rgba<u8>>,
}

impl Edit {
    /// Record the current values under `mask` before they are changed.
    ///
    /// `mask` must have the buffer's dimensions.
    #[must_use]
    pub fn capture(buffer: &PixelBuffer, mask: Mask) -> Self {
        debug_assert_eq!(
            (mask.width(), mask.height()),
            (buffer.width(), buffer.height())
        );
        let img = buffer.as_image();
        let previous = mask.iter().map(|(x, y)| *img.get_pixel(x, y)).collect();
        Self { mask, previous }
    }

    /// The pixels this edit touches.
    #[must_use]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Number of pixels this edit touches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.previous.len()
    }

    /// Whether the edit touches no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }

    /// Value the pixel at `(x, y)` had before the edit, if it is masked.
    #[must_use]
    pub fn previous_at(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if !self.mask.contains(x, y) {
            return None;
        }
        self.mask
            .iter()
            .position(|p| p == (x, y))
            .map(|i| self.previous[i])
    }

    /// Whether applying the edit would change nothing: every masked pixel
    /// was already transparent.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.previous.iter().all(|p| p[3] == 0)
    }

    /// Whether the edit was captured on a buffer of `buffer`'s size.
    #[must_use]
    pub fn fits(&self, buffer: &PixelBuffer) -> bool {
        (self.mask.width(), self.mask.height()) == (buffer.width(), buffer.height())
    }

    /// Make every masked pixel transparent, leaving RGB as it is.
    ///
    /// Writes nothing and returns `false` if the buffer has another size.
    pub(crate) fn apply(&self, buffer: &mut PixelBuffer) -> bool {
        if !self.fits(buffer) {
            return false;
        }
        for (x, y) in self.mask.iter() {
            buffer.pixel_mut(x, y)[3] = 0;
        }
        true
    }

    /// Restore every masked pixel to its recorded value.
    ///
    /// Writes nothing and returns `false` if the buffer has another size.
    pub(crate) fn revert(&self, buffer: &mut PixelBuffer) -> bool {
        if !self.fits(buffer) {
            return false;
        }
        for ((x, y), prev) in self.mask.iter().zip(&self.previous) {
            *buffer.pixel_mut(x, y) = *prev;
        }
        true
    }
}

/// Linear undo/redo log.
///
/// `cursor` separates undoable entries (`..cursor`) from redoable ones
/// (`cursor..`). Recording after an undo drops the redoable tail.
#[derive(Debug, Clone)]
pub struct EditHistory<E = Edit> {
    edits: Vec<E>,
    cursor: usize,
}

impl<E> Default for EditHistory<E> {
    fn default() -> Self {
        Self {
            edits: Vec::new(),
            cursor: 0,
        }
    }
}

impl<E> EditHistory<E> {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `edit`, discarding anything that could still be redone.
    pub fn record(&mut self, edit: E) {
        if self.cursor < self.edits.len() {
            debug!(
                dropped = self.edits.len() - self.cursor,
                "truncating redo branch"
            );
            self.edits.truncate(self.cursor);
        }
        self.edits.push(edit);
        self.cursor += 1;
    }

    /// Step back one entry and return it for the caller to revert.
    ///
    /// Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&E> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.edits.get(self.cursor)
    }

    /// Step forward one entry and return it for the caller to re-apply.
    ///
    /// Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&E> {
        if self.cursor == self.edits.len() {
            return None;
        }
        self.cursor += 1;
        self.edits.get(self.cursor - 1)
    }

    /// Number of recorded entries, including redoable ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Current cursor position, in `0..=len()`.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether [`EditHistory::undo`] would return an entry.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`EditHistory::redo`] would return an entry.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.edits.len()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.edits.clear();
        self.cursor = 0;
    }
}
