//! Click a region of an image to make its connected same-color pixels
//! transparent, with undo/redo.
//!
//! A click runs an exact-RGB, 4-connected flood fill from the clicked pixel,
//! zeroes the alpha of the region, and records a reversible [`Edit`] holding
//! every affected pixel's previous value. Undo and redo replay those edits
//! without recomputing the fill.
//!
//! # Quick Start
//!
//! ```no_run
//! use flood_eraser::{Editor, EditorOptions};
//! use std::path::Path;
//!
//! let mut editor = Editor::open(Path::new("photo.jpg"), EditorOptions::default())
//!     .expect("failed to open image");
//! editor.apply_click(10.0, 10.0, 1.0);
//! editor.undo();
//! editor.redo();
//! editor.save(Path::new("photo_transparent.png")).unwrap();
//! ```
//!
//! # Sessions
//!
//! [`EditorSession`] wraps an editor with zoom and scroll state and runs
//! [`Command`]s, which also have a one-line text form.
//!
//! ```no_run
//! use flood_eraser::{Command, EditorSession};
//!
//! let mut session = EditorSession::default();
//! for line in ["open photo.png", "zoom in", "click 40 40", "save out.png"] {
//!     let cmd: Command = line.parse().unwrap();
//!     session.execute(&cmd).unwrap();
//! }
//! ```

#![deny(missing_docs)]

pub mod buffer;
pub mod command;
mod editor;
pub mod error;
pub mod fill;
pub mod history;
pub mod intake;
pub mod mask;
pub mod render;
mod session;
pub mod zoom;

pub use buffer::{default_output_path, PixelBuffer};
pub use command::{parse_script, Command};
pub use editor::{ClickOutcome, Editor, EditorOptions};
pub use error::{Error, Result};
pub use history::{Edit, EditHistory};
pub use mask::Mask;
pub use session::{EditorSession, MAX_ZOOM_STEPS, SCROLL_STEP};
pub use zoom::Zoom;
