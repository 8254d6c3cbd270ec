// SPDX-License-Identifier: MPL-2.0
//! Message handlers for the application.
//!
//! Editor events become side effects here: the file picker, background photo
//! decoding, background export and the diagnostics report.

use super::config::Config;
use super::{paths, Message};
use crate::diagnostics::{AppOperation, DiagnosticsCollector, UserAction};
use crate::error::{ExportError, UploadError};
use crate::media::frame_export::SavedFile;
use crate::media::image::{decode_upload, PhotoSource, UPLOAD_EXTENSIONS};
use crate::media::DefaultExporter;
use crate::ui::frame_editor::{self, Event as EditorEvent};
use crate::ui::notifications::{self, Notification};
use iced::Task;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// File name offered for diagnostics reports.
const DIAGNOSTICS_FILE_NAME: &str = "goru-frame-diagnostics.json";

/// Mutable view of the application state handed to the handlers.
pub struct UpdateContext<'a> {
    pub config: &'a Config,
    pub editor: &'a mut frame_editor::State,
    pub exporter: &'a Arc<DefaultExporter>,
    pub notifications: &'a mut notifications::Manager,
    pub diagnostics: &'a mut DiagnosticsCollector,
}

pub fn handle_editor_message(
    ctx: &mut UpdateContext<'_>,
    message: frame_editor::Message,
) -> Task<Message> {
    match ctx.editor.update(message) {
        EditorEvent::None => Task::none(),
        EditorEvent::UploadRequested => open_upload_dialog(),
        EditorEvent::ExportRequested => start_export(ctx),
        EditorEvent::DragFinished => {
            ctx.diagnostics.log_action(UserAction::DragPhoto);
            Task::none()
        }
        EditorEvent::Zoomed(zoom) => {
            ctx.diagnostics.log_action(UserAction::SetZoom { zoom: zoom.value() });
            Task::none()
        }
    }
}

fn open_upload_dialog() -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncFileDialog::new()
                .add_filter("Images", UPLOAD_EXTENSIONS)
                .pick_file()
                .await
                .map(|handle| handle.path().to_path_buf())
        },
        Message::UploadDialogResult,
    )
}

/// Decodes `path` off the UI thread.
pub fn decode_photo(path: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            let started = Instant::now();
            let result = tokio::task::spawn_blocking(move || decode_upload(&path))
                .await
                .map_err(|e| UploadError::Io(e.to_string()))
                .and_then(|result| result);
            (result, elapsed_ms(started))
        },
        |(result, duration_ms)| Message::PhotoDecoded {
            result,
            duration_ms,
        },
    )
}

pub fn handle_photo_decoded(
    ctx: &mut UpdateContext<'_>,
    result: Result<PhotoSource, UploadError>,
    duration_ms: u64,
) -> Task<Message> {
    match result {
        Ok(photo) => {
            ctx.notifications.clear_upload_errors();
            ctx.diagnostics.log_action(UserAction::LoadPhoto {
                source: Some(photo.name.clone()),
            });
            ctx.diagnostics
                .handle()
                .log_operation(AppOperation::DecodePhoto {
                    duration_ms,
                    width: photo.image.width,
                    height: photo.image.height,
                });
            ctx.editor.load_photo(photo);
        }
        Err(err) if err.is_silent() => {
            ctx.diagnostics.handle().log_warning(err.to_string());
        }
        Err(err) => {
            ctx.notifications
                .push(Notification::warning(err.i18n_key()).with_detail(err.to_string()));
        }
    }
    Task::none()
}

fn start_export(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    ctx.diagnostics.log_action(UserAction::ExportImage);

    let Some(request) = ctx.editor.export_request(ctx.config.default_file_stem()) else {
        // Refused before any rendering happens
        if let Err(err) = ctx.exporter.export(None) {
            push_export_error(ctx.notifications, &err);
        }
        return Task::none();
    };

    ctx.editor.set_exporting(true);
    let exporter = Arc::clone(ctx.exporter);
    Task::perform(
        async move {
            let started = Instant::now();
            let result = tokio::task::spawn_blocking(move || exporter.export(Some(request)))
                .await
                .map_err(|e| ExportError::Interrupted(e.to_string()))
                .and_then(|result| result);
            (result, elapsed_ms(started))
        },
        |(result, duration_ms)| Message::ExportCompleted {
            result,
            duration_ms,
        },
    )
}

pub fn handle_export_completed(
    ctx: &mut UpdateContext<'_>,
    result: Result<SavedFile, ExportError>,
    duration_ms: u64,
) -> Task<Message> {
    ctx.editor.set_exporting(false);
    match result {
        Ok(saved) => {
            ctx.diagnostics
                .handle()
                .log_operation(AppOperation::ExportComposition {
                    duration_ms,
                    size_bytes: saved.size,
                });
            ctx.notifications.push(
                Notification::success("notification-export-success")
                    .with_arg("path", saved.path.display().to_string()),
            );
        }
        Err(err) => push_export_error(ctx.notifications, &err),
    }
    Task::none()
}

fn push_export_error(notifications: &mut notifications::Manager, err: &ExportError) {
    let notification = match err {
        ExportError::NoImageLoaded | ExportError::InProgress => {
            Notification::warning(err.i18n_key())
        }
        _ => Notification::error(err.i18n_key()),
    };
    notifications.push(notification.with_detail(err.to_string()));
}

pub fn open_diagnostics_dialog() -> Task<Message> {
    let directory = paths::get_diagnostics_dir().filter(|dir| std::fs::create_dir_all(dir).is_ok());
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new()
                .set_file_name(DIAGNOSTICS_FILE_NAME)
                .add_filter("JSON", &["json"]);
            if let Some(dir) = directory {
                dialog = dialog.set_directory(&dir);
            }
            dialog.save_file().await.map(|h| h.path().to_path_buf())
        },
        Message::DiagnosticsDialogResult,
    )
}

pub fn save_diagnostics(ctx: &mut UpdateContext<'_>, path: &Path) {
    ctx.diagnostics.process_pending();
    ctx.diagnostics.log_action(UserAction::ExportDiagnostics);
    match ctx.diagnostics.export_to_file(path) {
        Ok(()) => ctx.notifications.push(
            Notification::success("notification-diagnostics-saved")
                .with_arg("path", path.display().to_string()),
        ),
        Err(err) => ctx.notifications.push(
            Notification::error("notification-diagnostics-error").with_detail(err.to_string()),
        ),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
