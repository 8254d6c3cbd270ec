// SPDX-License-Identifier: MPL-2.0
//! Default values for configuration fields.
//!
//! # Categories
//!
//! - **Export**: output scale, PNG quality and file naming
//! - **Editor**: zoom step used by the mouse wheel

use crate::domain::frame::{scale_bounds, zoom_bounds};

// ==========================================================================
// Export Defaults
// ==========================================================================

/// Device pixel multiplier applied when exporting.
pub const DEFAULT_EXPORT_SCALE: f32 = scale_bounds::DEFAULT;

/// PNG quality hint in `0.0..=1.0`.
pub const DEFAULT_EXPORT_QUALITY: f32 = 1.0;

/// File stem used when the caption is empty.
pub const DEFAULT_FILE_STEM: &str = crate::media::composition::DEFAULT_FILE_STEM;

// ==========================================================================
// Editor Defaults
// ==========================================================================

/// Zoom change per mouse wheel notch.
pub const DEFAULT_WHEEL_ZOOM_STEP: f32 = zoom_bounds::STEP;

/// Smallest accepted wheel zoom step.
pub const MIN_WHEEL_ZOOM_STEP: f32 = 0.01;

/// Largest accepted wheel zoom step (one notch crosses the whole range).
pub const MAX_WHEEL_ZOOM_STEP: f32 = zoom_bounds::MAX - zoom_bounds::MIN;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(DEFAULT_EXPORT_SCALE >= scale_bounds::MIN);
    assert!(DEFAULT_EXPORT_SCALE <= scale_bounds::MAX);
    assert!(DEFAULT_EXPORT_QUALITY >= 0.0 && DEFAULT_EXPORT_QUALITY <= 1.0);
    assert!(MIN_WHEEL_ZOOM_STEP < DEFAULT_WHEEL_ZOOM_STEP);
    assert!(DEFAULT_WHEEL_ZOOM_STEP <= MAX_WHEEL_ZOOM_STEP);
};
