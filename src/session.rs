//! The editor session: at most one open image plus its view state.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{debug, info};

use crate::buffer::{self, PixelBuffer};
use crate::command::Command;
use crate::editor::{ClickOutcome, Editor, EditorOptions};
use crate::error::{Error, Result};
use crate::intake;
use crate::render;
use crate::zoom::Zoom;

/// Display pixels scrolled per wheel unit.
pub const SCROLL_STEP: u32 = 20;

/// Zoom steps that take any scale to either end of the range.
pub const MAX_ZOOM_STEPS: u32 = 16;

/// Everything a single editor window owns.
///
/// Commands run one at a time to completion. Loading a new image or
/// resetting drops the previous buffer and history entirely.
#[derive(Debug, Default)]
pub struct EditorSession {
    editor: Option<Editor>,
    zoom: Zoom,
    scroll: (u32, u32),
    viewport: (u32, u32),
    options: EditorOptions,
}

impl EditorSession {
    /// An empty session; nothing is open yet.
    #[must_use]
    pub fn new(options: EditorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The open editor, if any.
    #[must_use]
    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    /// The open image, if any.
    #[must_use]
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.editor.as_ref().map(Editor::buffer)
    }

    /// Current display scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.zoom.scale()
    }

    /// Current scroll offset in display pixels, `(x, y)`.
    #[must_use]
    pub fn scroll_offset(&self) -> (u32, u32) {
        self.scroll
    }

    /// Open an image file, replacing whatever was open.
    ///
    /// On failure the current image, history and view are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for unaccepted extensions, or
    /// the load error if decoding fails.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let path = intake::validate_path(path)?;
        let editor = Editor::open(&path, self.options.clone())?;
        self.install(editor);
        Ok(())
    }

    /// Open the single image of a drag-and-drop payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MultipleFiles`] or [`Error::UnsupportedFormat`] for
    /// payloads that are not exactly one accepted image; nothing is loaded.
    pub fn drop_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        let path = intake::validate_drop(paths)?;
        self.open(&path)
    }

    /// Start editing an in-memory buffer, replacing whatever was open.
    pub fn load_buffer(&mut self, buffer: PixelBuffer) {
        self.install(Editor::new(buffer, self.options.clone()));
    }

    fn install(&mut self, editor: Editor) {
        self.editor = Some(editor);
        self.zoom.reset();
        self.scroll = (0, 0);
    }

    /// Discard the image, its history and the view state.
    pub fn reset(&mut self) {
        if self.editor.take().is_some() {
            info!("session reset");
        }
        self.zoom.reset();
        self.scroll = (0, 0);
    }

    /// Click at window coordinates. The scroll offset is added before the
    /// point is converted to source pixels.
    pub fn click(&mut self, x: f64, y: f64) -> ClickOutcome {
        let scale = self.zoom.scale();
        let (sx, sy) = self.scroll;
        match self.editor.as_mut() {
            Some(editor) => editor.apply_click(x + f64::from(sx), y + f64::from(sy), scale),
            None => ClickOutcome::Ignored,
        }
    }

    /// Undo the last edit; `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.editor.as_mut().is_some_and(Editor::undo)
    }

    /// Redo the last undone edit; `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.editor.as_mut().is_some_and(Editor::redo)
    }

    /// One zoom-in step. Returns the new scale.
    pub fn zoom_in(&mut self) -> f64 {
        let scale = self.zoom.zoom_in();
        self.clamp_scroll();
        debug!(scale, "zoom in");
        scale
    }

    /// One zoom-out step. Returns the new scale.
    pub fn zoom_out(&mut self) -> f64 {
        let scale = self.zoom.zoom_out();
        self.clamp_scroll();
        debug!(scale, "zoom out");
        scale
    }

    /// Set the size of the visible area in display pixels.
    ///
    /// Scrolling stops once the far edge of the image reaches the far edge
    /// of the viewport. With no viewport set, at least one display pixel of
    /// the image stays visible.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.clamp_scroll();
    }

    /// Apply `steps` zoom steps: positive zooms in, negative zooms out.
    /// Returns the new scale.
    pub fn zoom_by(&mut self, steps: i32) -> f64 {
        for _ in 0..steps.unsigned_abs().min(MAX_ZOOM_STEPS) {
            if steps > 0 {
                self.zoom.zoom_in();
            } else {
                self.zoom.zoom_out();
            }
        }
        self.clamp_scroll();
        debug!(steps, scale = self.zoom.scale(), "zoom by");
        self.zoom.scale()
    }

    /// Scroll by wheel units. Offsets keep part of the image in view.
    pub fn scroll_by(&mut self, dx: i32, dy: i32) {
        let (max_x, max_y) = self.scroll_limits();
        self.scroll = (
            step(self.scroll.0, dx, max_x),
            step(self.scroll.1, dy, max_y),
        );
    }

    fn scroll_limits(&self) -> (u32, u32) {
        let Some(buffer) = self.buffer() else {
            return (0, 0);
        };
        let (width, height) = buffer.display_dimensions(self.zoom.scale());
        (
            width.saturating_sub(self.viewport.0.max(1)),
            height.saturating_sub(self.viewport.1.max(1)),
        )
    }

    fn clamp_scroll(&mut self) {
        let (max_x, max_y) = self.scroll_limits();
        self.scroll = (self.scroll.0.min(max_x), self.scroll.1.min(max_y));
    }

    /// Save the open image as PNG. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImage`] if nothing is open, or the write error.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        self.editor.as_ref().ok_or(Error::NoImage)?.save(path)
    }

    /// Render the open image at the current zoom over a checkerboard.
    #[must_use]
    pub fn render(&self) -> Option<RgbImage> {
        self.buffer().map(|b| render::render(b, self.zoom.scale()))
    }

    /// Write the rendered view to `path` as PNG. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImage`] if nothing is open, or the write error.
    pub fn preview(&self, path: &Path) -> Result<PathBuf> {
        let view = self.render().ok_or(Error::NoImage)?;
        let target = buffer::png_path(path);
        buffer::ensure_parent_dir(&target)?;
        view.save_with_format(&target, image::ImageFormat::Png)?;
        Ok(target)
    }

    /// Run one command. Returns whether the display needs a redraw.
    ///
    /// # Errors
    ///
    /// Load and save failures are returned; the session is left as it was.
    pub fn execute(&mut self, command: &Command) -> Result<bool> {
        debug!(%command, "execute");
        let redraw = match command {
            Command::Open(path) => {
                self.open(path)?;
                true
            }
            Command::Click { x, y } => self.click(*x, *y).needs_redraw(),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::ZoomIn => {
                self.zoom_in();
                self.editor.is_some()
            }
            Command::ZoomOut => {
                self.zoom_out();
                self.editor.is_some()
            }
            Command::Scroll { dx, dy } => {
                let before = self.scroll;
                self.scroll_by(*dx, *dy);
                before != self.scroll
            }
            Command::Save(path) => {
                self.save(path)?;
                false
            }
            Command::Preview(path) => {
                self.preview(path)?;
                false
            }
            Command::Reset => {
                self.reset();
                true
            }
        };
        Ok(redraw)
    }
}

fn step(offset: u32, units: i32, max: u32) -> u32 {
    let delta = i64::from(units) * i64::from(SCROLL_STEP);
    let next = (i64::from(offset) + delta).clamp(0, i64::from(max));
    u32::try_from(next).unwrap_or(max)
}
