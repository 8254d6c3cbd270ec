// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! Background jobs log through a cloned [`DiagnosticsHandle`]; the UI thread
//! drains the channel into the circular buffer on each tick.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::Serialize;

use super::{
    AppOperation, BufferCapacity, CircularBuffer, DiagnosticEvent, DiagnosticEventKind, UserAction,
};

/// Default channel capacity for event buffering.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Handle for sending diagnostic events to the collector.
///
/// Cheap to clone and shareable across threads. Sends never block: events
/// are dropped when the channel is full.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    fn send(&self, kind: DiagnosticEventKind) {
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }

    pub fn log_action(&self, action: UserAction) {
        self.send(DiagnosticEventKind::UserAction {
            action,
            details: None,
        });
    }

    pub fn log_operation(&self, operation: AppOperation) {
        self.send(DiagnosticEventKind::Operation { operation });
    }

    pub fn log_warning(&self, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Warning {
            message: message.into(),
        });
    }

    pub fn log_error(&self, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Error {
            message: message.into(),
        });
    }
}

#[derive(Serialize)]
struct DiagnosticReport<'a> {
    app_version: &'static str,
    collection_started_at: DateTime<Utc>,
    exported_at: DateTime<Utc>,
    event_count: usize,
    events: Vec<&'a DiagnosticEvent>,
}

/// Central collector for diagnostic events.
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: Receiver<DiagnosticEvent>,
    event_tx: Sender<DiagnosticEvent>,
    collection_started_at: DateTime<Utc>,
}

impl std::fmt::Debug for DiagnosticsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticsCollector")
            .field("events", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .finish()
    }
}

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);
        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Moves queued events from the channel into the buffer.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.buffer.push(event);
        }
    }

    /// Logs an action directly to the buffer, bypassing the channel.
    pub fn log_action(&mut self, action: UserAction) {
        self.buffer.push(DiagnosticEvent::new(DiagnosticEventKind::UserAction {
            action,
            details: None,
        }));
    }

    /// Logs an action with free-form details directly to the buffer.
    pub fn log_action_with_details(&mut self, action: UserAction, details: Option<String>) {
        self.buffer
            .push(DiagnosticEvent::new(DiagnosticEventKind::UserAction { action, details }));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Serializes the buffered events as a pretty JSON report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        let events: Vec<&DiagnosticEvent> = self.buffer.iter().collect();
        let report = DiagnosticReport {
            app_version: env!("CARGO_PKG_VERSION"),
            collection_started_at: self.collection_started_at,
            exported_at: Utc::now(),
            event_count: events.len(),
            events,
        };
        serde_json::to_string_pretty(&report)
    }

    /// Writes the JSON report to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> crate::error::Result<()> {
        let json = self
            .export_json()
            .map_err(|e| crate::error::Error::Io(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}
