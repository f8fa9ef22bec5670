//! Pure calculation functions for derivative dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Fit an image inside a target width: scale down preserving aspect ratio,
/// never enlarge.
///
/// The width is the constrained edge — height follows from the aspect ratio.
/// A source already narrower than the target is returned unchanged.
///
/// # Examples
/// ```
/// # use respix::imaging::{Dimensions, fit_width};
/// // 1920x1080 fitted to 480 wide → 480x270
/// assert_eq!(
///     fit_width(Dimensions { width: 1920, height: 1080 }, 480),
///     Dimensions { width: 480, height: 270 }
/// );
///
/// // 400x300 fitted to 480 wide → unchanged (no enlargement)
/// assert_eq!(
///     fit_width(Dimensions { width: 400, height: 300 }, 480),
///     Dimensions { width: 400, height: 300 }
/// );
/// ```
pub fn fit_width(source: Dimensions, max_width: u32) -> Dimensions {
    if source.width <= max_width {
        return source;
    }
    let ratio = max_width as f64 / source.width as f64;
    Dimensions {
        width: max_width,
        height: (source.height as f64 * ratio).round().max(1.0) as u32,
    }
}
