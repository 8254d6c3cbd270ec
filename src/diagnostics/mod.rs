// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for collecting and exporting activity reports.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`DiagnosticEvent`]: Timestamped user actions, operations, warnings and errors
//! - [`DiagnosticsCollector`]: Owns the buffer; [`DiagnosticsHandle`] feeds it
//!   from any thread

mod buffer;
mod collector;
mod events;

pub use buffer::{buffer_capacity_bounds, BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{AppOperation, DiagnosticEvent, DiagnosticEventKind, UserAction};
