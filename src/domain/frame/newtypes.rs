// SPDX-License-Identifier: MPL-2.0
//! Frame newtypes.
//!
//! This module provides type-safe wrappers for the values that drive the
//! circular photo viewport and the export pipeline, ensuring they are always
//! within valid ranges.

// =============================================================================
// Zoom Bounds
// =============================================================================

/// Zoom factor bounds (1× to 3×).
pub mod zoom_bounds {
    /// Minimum zoom factor. At 1× the photo exactly covers the circle.
    pub const MIN: f32 = 1.0;
    /// Maximum zoom factor.
    pub const MAX: f32 = 3.0;
    /// Default zoom factor applied when a photo is loaded.
    pub const DEFAULT: f32 = 1.0;
    /// Slider step.
    pub const STEP: f32 = 0.1;
}

// =============================================================================
// ZoomFactor
// =============================================================================

/// Uniform scale applied to the photo layer, guaranteed to be within 1×–3×.
///
/// Values below 1× would leave parts of the circle uncovered, so they are
/// clamped at construction rather than checked at usage sites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomFactor(f32);

impl ZoomFactor {
    /// Creates a new zoom factor, clamping the value to the valid range.
    ///
    /// `NaN` is mapped to the default factor.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(zoom_bounds::MIN, zoom_bounds::MAX))
    }

    /// Returns the raw factor.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns whether the zoom is at the minimum value.
    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= zoom_bounds::MIN
    }

    /// Returns whether the zoom is at the maximum value.
    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= zoom_bounds::MAX
    }

    /// Adds `delta` and clamps the result.
    #[must_use]
    pub fn offset_by(self, delta: f32) -> Self {
        Self::new(self.0 + delta)
    }
}

impl Default for ZoomFactor {
    fn default() -> Self {
        Self(zoom_bounds::DEFAULT)
    }
}

// =============================================================================
// Offset
// =============================================================================

/// Translation of the photo relative to the viewport center, in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    /// The origin (photo centered in the viewport).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamps both axes independently to `[-limit, limit]`.
    #[must_use]
    pub fn clamped(self, limit: f32) -> Self {
        let limit = limit.max(0.0);
        Self {
            x: self.x.clamp(-limit, limit),
            y: self.y.clamp(-limit, limit),
        }
    }

    /// Returns whether both axes lie within `[-limit, limit]`.
    #[must_use]
    pub fn is_within(self, limit: f32) -> bool {
        self.x.abs() <= limit && self.y.abs() <= limit
    }
}

// =============================================================================
// Export Scale
// =============================================================================

/// Export supersampling bounds.
pub mod scale_bounds {
    /// Minimum supersampling factor (layout resolution).
    pub const MIN: f32 = 1.0;
    /// Maximum supersampling factor.
    pub const MAX: f32 = 8.0;
    /// Default supersampling factor.
    pub const DEFAULT: f32 = 4.0;
}

/// Pixel density multiplier applied when rasterizing an export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportScale(f32);

impl ExportScale {
    /// Creates a new scale, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(scale_bounds::MIN, scale_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for ExportScale {
    fn default() -> Self {
        Self(scale_bounds::DEFAULT)
    }
}

// =============================================================================
// Export Quality
// =============================================================================

/// Encoding quality in `[0.0, 1.0]`; higher values trade speed for size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportQuality(f32);

impl ExportQuality {
    /// Highest quality.
    pub const MAX: Self = Self(1.0);

    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for ExportQuality {
    fn default() -> Self {
        Self::MAX
    }
}
