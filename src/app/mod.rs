// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration around the frame editor.
//!
//! The `App` struct wires together the editor, localization, configuration,
//! notifications and diagnostics, and turns editor events into side effects
//! such as the file picker, photo decoding and PNG export.

pub mod config;
mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::diagnostics::DiagnosticsCollector;
use crate::i18n::fluent::I18n;
use crate::media::composition::ImageRef;
use crate::media::frame_export::DownloadsSink;
use crate::media::image::{default_template, load_template};
use crate::media::render::SoftwareRasterizer;
use crate::media::{DefaultExporter, Exporter};
use crate::ui::frame_editor::{self, StateConfig as EditorConfig};
use crate::ui::notifications::{self, Notification};
use config::Config;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    config: Config,
    editor: frame_editor::State,
    /// Shared with background export jobs.
    exporter: Arc<DefaultExporter>,
    notifications: notifications::Manager,
    diagnostics: DiagnosticsCollector,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("has_photo", &self.editor.has_photo())
            .field("exporting", &self.editor.is_exporting())
            .finish()
    }
}

pub const WINDOW_DEFAULT_WIDTH: u32 = 960;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 620;
pub const MIN_WINDOW_WIDTH: u32 = 880;
pub const MIN_WINDOW_HEIGHT: u32 = 580;

pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced requires a `Fn` boot closure; flags are consumed on the first call
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

/// Builds the exporter described by the `[export]` section.
///
/// Images under `asset_root` are same-origin; others follow the
/// `use_cors` / `allow_taint` settings.
fn build_exporter(config: &Config, asset_root: Option<PathBuf>) -> DefaultExporter {
    let sink = match &config.export.download_dir {
        Some(directory) => DownloadsSink::with_directory(directory),
        None => DownloadsSink::new(),
    };
    Exporter::new(
        SoftwareRasterizer::for_asset_root(asset_root),
        sink,
        config.raster_options(),
    )
}

/// Picks the configured template, falling back to the bundled one.
///
/// A readable configured file is passed by path so the rasterizer applies
/// its cross-origin rules. Returns the i18n key of a warning when the
/// configured file is unusable.
fn resolve_template(
    config: &Config,
    config_dir: Option<&Path>,
) -> (Option<ImageRef>, Option<&'static str>) {
    let mut warning = None;
    if let Some(path) = config.template_path(config_dir) {
        match load_template(&path) {
            Ok(_) => return (Some(ImageRef::Path(path)), None),
            Err(err) => {
                eprintln!("Failed to load frame template {}: {}", path.display(), err);
                warning = Some("notification-template-load-error");
            }
        }
    }
    match default_template() {
        Ok(template) => (Some(ImageRef::Decoded(template)), warning),
        Err(err) => {
            eprintln!("Failed to render bundled frame template: {}", err);
            (None, warning)
        }
    }
}

impl App {
    fn with_config(
        config: Config,
        i18n: I18n,
        config_dir: Option<PathBuf>,
    ) -> (Self, Vec<&'static str>) {
        let mut warnings = Vec::new();
        let (template, template_warning) = resolve_template(&config, config_dir.as_deref());
        warnings.extend(template_warning);

        let editor = frame_editor::State::new(EditorConfig {
            layout: config.frame_layout(),
            template,
            zoom_policy: config.zoom_policy(),
            wheel_step: config.wheel_zoom_step(),
            asset_root: config_dir.clone(),
            preview_options: config.preview_options(),
        });

        let diagnostics = DiagnosticsCollector::default();
        let mut notifications = notifications::Manager::new();
        notifications.set_diagnostics(diagnostics.handle());

        let app = Self {
            i18n,
            exporter: Arc::new(build_exporter(&config, config_dir)),
            config,
            editor,
            notifications,
            diagnostics,
        };
        (app, warnings)
    }

    /// Initializes application state and optionally kicks off decoding of a
    /// photo passed on the command line.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());

        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), &config);
        let (mut app, warnings) = Self::with_config(config, i18n, paths::get_app_config_dir());

        if let Some(key) = config_warning {
            app.notifications.push(Notification::warning(key));
        } else if let Err(err) = config::save_if_missing(&app.config) {
            eprintln!("Failed to write default settings: {}", err);
            app.notifications
                .push(Notification::warning("notification-config-save-error"));
        }
        for key in warnings {
            app.notifications.push(Notification::warning(key));
        }

        let task = match flags.photo_path {
            Some(path) => update::decode_photo(PathBuf::from(path)),
            None => Task::none(),
        };
        (app, task)
    }

    fn title(&self) -> String {
        self.i18n.tr("app-title")
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(),
            subscription::create_tick_subscription(self.notifications.has_notifications()),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let mut ctx = update::UpdateContext {
            config: &self.config,
            editor: &mut self.editor,
            exporter: &self.exporter,
            notifications: &mut self.notifications,
            diagnostics: &mut self.diagnostics,
        };

        match message {
            Message::Editor(editor_message) => {
                update::handle_editor_message(&mut ctx, editor_message)
            }
            Message::Notification(notification_message) => {
                ctx.notifications.handle_message(&notification_message);
                Task::none()
            }
            Message::UploadDialogResult(path) => match path {
                Some(path) => update::decode_photo(path),
                None => Task::none(),
            },
            Message::FileDropped(path) => update::decode_photo(path),
            Message::PhotoDecoded {
                result,
                duration_ms,
            } => update::handle_photo_decoded(&mut ctx, result, duration_ms),
            Message::ExportCompleted {
                result,
                duration_ms,
            } => update::handle_export_completed(&mut ctx, result, duration_ms),
            Message::ExportDiagnostics => update::open_diagnostics_dialog(),
            Message::DiagnosticsDialogResult(path) => {
                if let Some(path) = path {
                    update::save_diagnostics(&mut ctx, &path);
                }
                Task::none()
            }
            Message::Tick(_instant) => {
                ctx.notifications.tick();
                ctx.diagnostics.process_pending();
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            editor: &self.editor,
            notifications: &self.notifications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::solid_photo;
    use crate::ui::frame_editor::Message as EditorMessage;
    use tempfile::tempdir;

    fn test_app(download_dir: &std::path::Path) -> App {
        let mut config = Config::default();
        config.export.download_dir = Some(download_dir.to_path_buf());
        config.export.scale = Some(1.0);
        config.frame.show_credit = Some(false);
        let (app, warnings) = App::with_config(config, I18n::default(), None);
        assert!(warnings.is_empty());
        app
    }

    #[test]
    fn missing_configured_template_warns_and_falls_back() {
        let mut config = Config::default();
        config.frame.template = Some("/definitely/not/here.svg".into());
        let (template, warning) = resolve_template(&config, None);
        assert!(template.is_some());
        assert_eq!(warning, Some("notification-template-load-error"));
    }

    #[test]
    fn decoded_photo_is_placed_in_the_editor() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut app = test_app(temp_dir.path());
        let photo = solid_photo("me.png", 2, [255; 4]);

        let _ = app.update(Message::PhotoDecoded {
            result: Ok(photo),
            duration_ms: 3,
        });
        app.diagnostics.process_pending();

        assert!(app.editor.has_photo());
        assert_eq!(app.diagnostics.len(), 2);
    }

    #[test]
    fn decode_failure_shows_warning_but_invalid_type_is_silent() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut app = test_app(temp_dir.path());

        let _ = app.update(Message::PhotoDecoded {
            result: Err(crate::error::UploadError::InvalidFileType),
            duration_ms: 0,
        });
        assert_eq!(app.notifications.visible_count(), 0);

        let _ = app.update(Message::PhotoDecoded {
            result: Err(crate::error::UploadError::Decode("bad".into())),
            duration_ms: 0,
        });
        assert_eq!(app.notifications.visible_count(), 1);
        assert!(!app.editor.has_photo());
    }

    #[test]
    fn save_without_photo_is_refused_with_notification() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut app = test_app(temp_dir.path());

        // The button is disabled, but a stray message must not export anything
        let _ = app.update(Message::Editor(EditorMessage::SavePressed));

        assert!(!app.editor.is_exporting());
        let keys: Vec<_> = app
            .notifications
            .visible()
            .map(|n| n.message_key().to_string())
            .collect();
        assert_eq!(keys, vec!["notification-export-no-image".to_string()]);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn export_completion_clears_busy_state() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut app = test_app(temp_dir.path());
        app.editor.set_exporting(true);

        let _ = app.update(Message::ExportCompleted {
            result: Err(crate::error::ExportError::Save("disk full".into())),
            duration_ms: 1,
        });

        assert!(!app.editor.is_exporting());
        assert_eq!(app.notifications.visible_count(), 1);
    }

    #[test]
    fn diagnostics_report_is_written() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut app = test_app(temp_dir.path());
        let report = temp_dir.path().join("report.json");

        let _ = app.update(Message::DiagnosticsDialogResult(Some(report.clone())));

        let content = std::fs::read_to_string(&report).expect("report should exist");
        assert!(content.contains("\"event_count\""));
    }

    /// App whose template lives at `template`, with `config_dir` as the
    /// same-origin root and exports going to `download_dir`.
    fn app_with_template(
        template: &Path,
        config_dir: &Path,
        download_dir: &Path,
        use_cors: bool,
        allow_taint: bool,
    ) -> App {
        let mut config = Config::default();
        config.export.download_dir = Some(download_dir.to_path_buf());
        config.export.scale = Some(1.0);
        config.export.use_cors = Some(use_cors);
        config.export.allow_taint = Some(allow_taint);
        config.frame.template = Some(template.to_path_buf());
        let (mut app, warnings) =
            App::with_config(config, I18n::default(), Some(config_dir.to_path_buf()));
        assert!(warnings.is_empty());
        let _ = app.update(Message::PhotoDecoded {
            result: Ok(solid_photo("me.png", 2, [255; 4])),
            duration_ms: 0,
        });
        app
    }

    fn write_template(path: &Path) {
        image_rs::RgbaImage::from_pixel(2, 2, image_rs::Rgba([0, 0, 255, 255]))
            .save(path)
            .expect("write template");
    }

    #[test]
    fn configured_template_is_passed_by_path() {
        let config_dir = tempdir().expect("failed to create temp dir");
        write_template(&config_dir.path().join("bg.png"));
        let mut config = Config::default();
        config.frame.template = Some(PathBuf::from("bg.png"));

        let (template, warning) = resolve_template(&config, Some(config_dir.path()));

        assert!(warning.is_none());
        assert!(matches!(
            template,
            Some(ImageRef::Path(path)) if path == config_dir.path().join("bg.png")
        ));
    }

    #[test]
    fn outside_template_taints_export_without_cors() {
        let config_dir = tempdir().expect("failed to create temp dir");
        let elsewhere = tempdir().expect("failed to create temp dir");
        let downloads = tempdir().expect("failed to create temp dir");
        let template = elsewhere.path().join("bg.png");
        write_template(&template);

        let app = app_with_template(&template, config_dir.path(), downloads.path(), false, true);
        let result = app.exporter.export(app.editor.export_request("profile"));

        assert_eq!(result, Err(crate::error::ExportError::Tainted));
        assert_eq!(std::fs::read_dir(downloads.path()).unwrap().count(), 0);
    }

    #[test]
    fn outside_template_is_skipped_when_taint_is_not_allowed() {
        let config_dir = tempdir().expect("failed to create temp dir");
        let elsewhere = tempdir().expect("failed to create temp dir");
        let downloads = tempdir().expect("failed to create temp dir");
        let template = elsewhere.path().join("bg.png");
        write_template(&template);

        let app = app_with_template(&template, config_dir.path(), downloads.path(), false, false);
        let saved = app
            .exporter
            .export(app.editor.export_request("profile"))
            .expect("export succeeds without the template");

        let png = image_rs::open(&saved.path).expect("valid png").to_rgba8();
        // Fallback fill instead of the blue template
        assert_eq!(png.get_pixel(0, 0).0, [139, 0, 0, 255]);
    }

    #[test]
    fn template_inside_config_dir_is_same_origin() {
        let config_dir = tempdir().expect("failed to create temp dir");
        let downloads = tempdir().expect("failed to create temp dir");
        let template = config_dir.path().join("bg.png");
        write_template(&template);

        let app = app_with_template(&template, config_dir.path(), downloads.path(), false, false);
        let saved = app
            .exporter
            .export(app.editor.export_request("profile"))
            .expect("export succeeds");

        let png = image_rs::open(&saved.path).expect("valid png").to_rgba8();
        assert_eq!(png.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }
}
