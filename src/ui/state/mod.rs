// SPDX-License-Identifier: MPL-2.0
//! UI state management modules
//!
//! This module contains the viewport transform logic separated from the
//! widgets that display it, so it can be driven and tested without a window.

pub mod drag;
pub mod pointer;
pub mod viewport;

// Re-export commonly used types for convenience
pub use drag::DragSession;
pub use pointer::{PointerAdapter, PointerEvent};
pub use viewport::{TransformController, ViewportState, ZoomPolicy};
