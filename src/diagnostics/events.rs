// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for activity tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-initiated actions worth correlating with warnings and errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    /// A photo was picked (dialog, CLI argument or drop).
    LoadPhoto {
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },

    /// A drag gesture finished.
    DragPhoto,

    /// The zoom slider or wheel changed the zoom.
    SetZoom { zoom: f32 },

    /// The save button was pressed.
    ExportImage,

    /// The diagnostics report was written.
    ExportDiagnostics,
}

/// Timed operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum AppOperation {
    /// A photo was decoded.
    DecodePhoto {
        duration_ms: u64,
        width: u32,
        height: u32,
    },

    /// An export finished successfully.
    ExportComposition { duration_ms: u64, size_bytes: usize },
}

/// A diagnostic event with its wall-clock timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event stamped with the current time.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction {
        action: UserAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },

    Operation {
        operation: AppOperation,
    },

    /// Non-critical issue, usually also shown as a warning toast.
    Warning {
        message: String,
    },

    /// Failed operation, usually also shown as an error toast.
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_serializes_with_type_tag() {
        let warning = DiagnosticEventKind::Warning {
            message: "test warning".to_string(),
        };
        let json = serde_json::to_string(&warning).expect("serialization should succeed");
        assert!(json.contains("\"type\":\"warning\""));
        assert!(json.contains("\"message\":\"test warning\""));
    }

    #[test]
    fn user_action_round_trips_through_json() {
        let json = r#"{"type":"user_action","action":{"action":"set_zoom","zoom":2.5}}"#;
        let kind: DiagnosticEventKind =
            serde_json::from_str(json).expect("deserialization should succeed");
        match kind {
            DiagnosticEventKind::UserAction { action, details } => {
                assert_eq!(action, UserAction::SetZoom { zoom: 2.5 });
                assert!(details.is_none());
            }
            _ => panic!("expected UserAction variant"),
        }
    }

    #[test]
    fn event_flattens_kind_next_to_timestamp() {
        let event = DiagnosticEvent::new(DiagnosticEventKind::Operation {
            operation: AppOperation::ExportComposition {
                duration_ms: 12,
                size_bytes: 2048,
            },
        });
        let value = serde_json::to_value(&event).expect("serialization should succeed");
        assert_eq!(value["type"], "operation");
        assert_eq!(value["operation"]["operation"], "export_composition");
        assert!(value["timestamp"].is_string());
    }
}
