//! EMU (English Metric Unit) conversion for slide geometry.
//!
//! All positions and sizes in a PPTX package are expressed in EMUs
//! (914,400 per inch). This module converts them into pixel space for a
//! fixed target render width, and into typographic points for font-sized
//! values. Every function is pure; the only failure mode is a package
//! declaring a zero-width slide.

use crate::error::{Error, Result};

/// EMUs per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// EMUs per typographic point.
pub const EMU_PER_POINT: f64 = 12_700.0;

/// Reference pixel density used for EMU-to-pixel mapping.
pub const PX_PER_INCH: f64 = 96.0;

/// Width in pixels that every parsed presentation is scaled to.
pub const TARGET_RENDER_WIDTH: f64 = 960.0;

/// Default native slide width (16:9, 13.333 in) used when the package
/// declares no size.
pub const DEFAULT_SLIDE_WIDTH_EMU: i64 = 12_192_000;

/// Default native slide height (16:9, 7.5 in).
pub const DEFAULT_SLIDE_HEIGHT_EMU: i64 = 6_858_000;

/// Convert an EMU length to pixels under the given global scale factor.
pub fn emu_to_px(emu: i64, scale: f64) -> f64 {
    emu as f64 / EMU_PER_INCH * PX_PER_INCH * scale
}

/// Convert an EMU length to typographic points.
pub fn emu_to_pt(emu: i64) -> f64 {
    emu as f64 / EMU_PER_POINT
}

/// Convert typographic points to pixels (96 px per 72 pt).
pub fn pt_to_px(pt: f64) -> f64 {
    pt * PX_PER_INCH / 72.0
}

/// Compute the global scale factor mapping the declared native slide width
/// onto [`TARGET_RENDER_WIDTH`].
///
/// The factor is computed once per package and threaded through every
/// per-slide extraction call, so all elements across all slides share one
/// coordinate space.
pub fn scale_factor(native_width_emu: i64) -> Result<f64> {
    if native_width_emu <= 0 {
        return Err(Error::InvalidData(format!(
            "slide width must be positive, got {} EMU",
            native_width_emu
        )));
    }
    Ok(TARGET_RENDER_WIDTH / (native_width_emu as f64 / EMU_PER_INCH * PX_PER_INCH))
}

/// Convert a rotation in 60,000ths of a degree (the `rot` attribute
/// encoding) to degrees.
pub fn rot_to_degrees(rot: i64) -> f64 {
    rot as f64 / 60_000.0
}
