//! Validation of files handed to the editor by drag-and-drop or a dialog.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};

/// Check if a file has an extension the editor accepts (jpg, jpeg, png).
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(ext.to_lowercase().as_str(), "jpg" | "jpeg" | "png"),
        None => false,
    }
}

/// Accept a dropped payload only if it is exactly one supported image.
///
/// # Errors
///
/// Returns [`Error::MultipleFiles`] if more than one path was dropped,
/// [`Error::UnsupportedFormat`] if the payload is empty or the single file
/// has an unsupported extension.
pub fn validate_drop<P: AsRef<Path>>(paths: &[P]) -> Result<PathBuf> {
    match paths {
        [] => {
            warn!("drop payload contained no files");
            Err(Error::UnsupportedFormat("no file".to_string()))
        }
        [single] => validate_path(single.as_ref()),
        many => {
            warn!(count = many.len(), "rejected drop of multiple files");
            Err(Error::MultipleFiles(many.len()))
        }
    }
}

/// Accept a single path if its extension is supported.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for any other extension.
pub fn validate_path(path: &Path) -> Result<PathBuf> {
    if is_supported_image(path) {
        Ok(path.to_path_buf())
    } else {
        warn!(path = %path.display(), "rejected unsupported file");
        Err(Error::UnsupportedFormat(path.display().to_string()))
    }
}
