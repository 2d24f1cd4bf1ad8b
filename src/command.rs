//! The editor's command surface and its one-command-per-line text form.
//!
//! ```text
//! open photo.jpg
//! zoom in
//! click 120 48
//! undo
//! redo
//! scroll 0 3
//! save out.png
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// One user-level action, independent of how it was triggered.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load an image, discarding the current one and its history.
    Open(PathBuf),
    /// Click at window coordinates.
    Click {
        /// Horizontal window coordinate.
        x: f64,
        /// Vertical window coordinate.
        y: f64,
    },
    /// Revert the last edit.
    Undo,
    /// Re-apply the last undone edit.
    Redo,
    /// One zoom-in step.
    ZoomIn,
    /// One zoom-out step.
    ZoomOut,
    /// Scroll by wheel units; positive moves right/down.
    Scroll {
        /// Horizontal units (shift+wheel).
        dx: i32,
        /// Vertical units (plain wheel).
        dy: i32,
    },
    /// Save the image as PNG.
    Save(PathBuf),
    /// Write the rendered view (checkerboard composite) to a file.
    Preview(PathBuf),
    /// Discard the image and its history.
    Reset,
}

fn number<T: FromStr>(token: Option<&str>, line: &str) -> Result<T> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| Error::ParseCommand(line.to_string()))
}

fn path_arg(rest: &str, line: &str) -> Result<PathBuf> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(Error::ParseCommand(line.to_string()))
    } else {
        Ok(PathBuf::from(rest))
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let mut args = rest.split_whitespace();

        let cmd = match word.to_lowercase().as_str() {
            "open" => Self::Open(path_arg(rest, line)?),
            "save" => Self::Save(path_arg(rest, line)?),
            "preview" => Self::Preview(path_arg(rest, line)?),
            "click" => Self::Click {
                x: number(args.next(), line)?,
                y: number(args.next(), line)?,
            },
            "scroll" => Self::Scroll {
                dx: number(args.next(), line)?,
                dy: number(args.next(), line)?,
            },
            "zoom" => match args.next() {
                Some("in" | "+") => Self::ZoomIn,
                Some("out" | "-") => Self::ZoomOut,
                _ => return Err(Error::ParseCommand(line.to_string())),
            },
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "reset" => Self::Reset,
            _ => return Err(Error::ParseCommand(line.to_string())),
        };

        let takes_path = matches!(cmd, Self::Open(_) | Self::Save(_) | Self::Preview(_));
        if !takes_path && args.next().is_some() {
            return Err(Error::ParseCommand(line.to_string()));
        }
        Ok(cmd)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(p) => write!(f, "open {}", p.display()),
            Self::Click { x, y } => write!(f, "click {x} {y}"),
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
            Self::ZoomIn => f.write_str("zoom in"),
            Self::ZoomOut => f.write_str("zoom out"),
            Self::Scroll { dx, dy } => write!(f, "scroll {dx} {dy}"),
            Self::Save(p) => write!(f, "save {}", p.display()),
            Self::Preview(p) => write!(f, "preview {}", p.display()),
            Self::Reset => f.write_str("reset"),
        }
    }
}

/// Parse a script of commands, one per line. Blank lines and lines starting
/// with `#` are skipped.
///
/// # Errors
///
/// Returns [`Error::ParseCommand`] naming the first bad line.
pub fn parse_script(script: &str) -> Result<Vec<Command>> {
    script
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
        .map(|(n, l)| {
            l.parse()
                .map_err(|_| Error::ParseCommand(format!("line {n}: {l}")))
        })
        .collect()
}
