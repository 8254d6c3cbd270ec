// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core business logic with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`frame`]: Viewport and export value objects ([`ZoomFactor`](frame::ZoomFactor),
//!   [`Offset`](frame::Offset), [`ExportScale`](frame::ExportScale),
//!   [`ExportQuality`](frame::ExportQuality))

pub mod frame;
