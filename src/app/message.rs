// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::error::{ExportError, UploadError};
use crate::media::frame_export::SavedFile;
use crate::media::image::PhotoSource;
use crate::ui::frame_editor;
use crate::ui::notifications;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Editor(frame_editor::Message),
    Notification(notifications::NotificationMessage),
    /// Result from the photo picker.
    UploadDialogResult(Option<PathBuf>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// Result from decoding a photo in the background.
    PhotoDecoded {
        result: Result<PhotoSource, UploadError>,
        duration_ms: u64,
    },
    /// Result from the background export job.
    ExportCompleted {
        result: Result<SavedFile, ExportError>,
        duration_ms: u64,
    },
    /// Save the diagnostics report (Ctrl+Shift+D).
    ExportDiagnostics,
    /// Result from the diagnostics Save As dialog.
    DiagnosticsDialogResult(Option<PathBuf>),
    /// Periodic tick for toast expiry and diagnostics draining.
    Tick(Instant),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `bn`, `en-US`).
    pub lang: Option<String>,
    /// Optional photo to place in the frame on startup.
    pub photo_path: Option<String>,
    /// Optional data directory override (diagnostics reports).
    /// Takes precedence over `PHOTOFRAME_DATA_DIR`.
    pub data_dir: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `PHOTOFRAME_CONFIG_DIR`.
    pub config_dir: Option<String>,
}
