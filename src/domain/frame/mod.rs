// SPDX-License-Identifier: MPL-2.0
//! Frame domain types.
//!
//! Value objects for the circular viewport and the export pipeline that are
//! independent of any presentation framework.

pub mod newtypes;

// Re-export commonly used types
pub use newtypes::{scale_bounds, zoom_bounds, ExportQuality, ExportScale, Offset, ZoomFactor};
