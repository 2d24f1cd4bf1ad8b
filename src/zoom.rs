//! Zoom level and display-to-source coordinate conversion.

/// Smallest allowed display scale.
pub const SCALE_MIN: f64 = 0.3;
/// Largest allowed display scale.
pub const SCALE_MAX: f64 = 5.0;
/// Multiplier applied per zoom-in step.
pub const ZOOM_IN_FACTOR: f64 = 1.25;
/// Multiplier applied per zoom-out step.
pub const ZOOM_OUT_FACTOR: f64 = 0.8;
/// Scales this close to 1.0 snap to exactly 1.0.
pub const SNAP_TOLERANCE: f64 = 1e-5;

/// Display scale of the image, kept within `[SCALE_MIN, SCALE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    scale: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Zoom {
    /// Start at `scale`, clamped and snapped like any other step.
    #[must_use]
    pub fn new(scale: f64) -> Self {
        Self {
            scale: normalize(scale),
        }
    }

    /// Current scale.
    #[must_use]
    pub fn scale(self) -> f64 {
        self.scale
    }

    /// One zoom-in step (`x1.25`). Returns the new scale.
    pub fn zoom_in(&mut self) -> f64 {
        self.scale = normalize(self.scale * ZOOM_IN_FACTOR);
        self.scale
    }

    /// One zoom-out step (`x0.8`). Returns the new scale.
    pub fn zoom_out(&mut self) -> f64 {
        self.scale = normalize(self.scale * ZOOM_OUT_FACTOR);
        self.scale
    }

    /// Back to 1.0.
    pub fn reset(&mut self) {
        self.scale = 1.0;
    }

    /// Convert a display coordinate at this zoom into a source pixel.
    #[must_use]
    pub fn to_source(self, x: f64, y: f64) -> Option<(u32, u32)> {
        display_to_source(x, y, self.scale)
    }
}

fn normalize(scale: f64) -> f64 {
    let clamped = scale.clamp(SCALE_MIN, SCALE_MAX);
    if (clamped - 1.0).abs() < SNAP_TOLERANCE {
        1.0
    } else {
        clamped
    }
}

/// Map a display coordinate to source pixel coordinates:
/// `floor(coord / scale)` on each axis.
///
/// Every display-to-source conversion goes through here. Returns `None` for
/// negative or non-finite results; the caller still has to check the upper
/// bounds against the image.
#[must_use]
pub fn display_to_source(x: f64, y: f64, scale: f64) -> Option<(u32, u32)> {
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }
    Some((axis(x, scale)?, axis(y, scale)?))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn axis(coord: f64, scale: f64) -> Option<u32> {
    let src = (coord / scale).floor();
    if src.is_finite() && src >= 0.0 && src <= f64::from(u32::MAX) {
        Some(src as u32)
    } else {
        None
    }
}
