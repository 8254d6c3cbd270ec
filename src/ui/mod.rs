// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! Follows the Elm-style "state down, messages up" pattern: components own
//! their state, return events to the application and never perform I/O.
//!
//! - [`frame_editor`] - Photo frame preview, drag/zoom overlay and controls
//! - [`state`] - Viewport transform, drag session and pointer normalization
//! - [`notifications`] - Toast notification system for user feedback
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)

pub mod design_tokens;
pub mod frame_editor;
pub mod notifications;
pub mod state;
