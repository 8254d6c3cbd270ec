// SPDX-License-Identifier: MPL-2.0
use goru_frame::app::config::{self, Config};
use goru_frame::domain::frame::ExportScale;
use goru_frame::i18n::fluent::I18n;
use goru_frame::media::{
    Captions, CompositionRequest, CompositionRoot, DownloadsSink, Exporter, FrameLayout,
    PhotoSource, RasterOptions, SoftwareRasterizer,
};
use goru_frame::ui::state::{TransformController, ZoomPolicy};
use iced::Point;
use tempfile::tempdir;

fn solid_photo(name: &str, rgba: [u8; 4]) -> PhotoSource {
    let pixels = rgba.iter().copied().cycle().take(8 * 8 * 4).collect();
    PhotoSource::from_rgba(name, 8, 8, pixels)
}

fn exporter_into(dir: &std::path::Path, scale: f32) -> Exporter<SoftwareRasterizer, DownloadsSink> {
    let options = RasterOptions {
        scale: ExportScale::new(scale),
        ..RasterOptions::default()
    };
    Exporter::new(
        SoftwareRasterizer::new(),
        DownloadsSink::with_directory(dir),
        options,
    )
}

#[test]
fn drag_and_zoom_stay_clamped_through_a_session() {
    let mut controller = TransformController::new(ZoomPolicy::PreserveOffset);
    controller.load_image(solid_photo("me.png", [0, 0, 255, 255]));

    // At 1x there is no slack: the photo cannot move
    assert!(controller.begin_drag(Point::new(100.0, 100.0), 240.0));
    controller.update_drag(Point::new(180.0, 40.0));
    assert_eq!(controller.state().offset.x, 0.0);
    assert_eq!(controller.state().offset.y, 0.0);
    controller.end_drag();

    // At 2x the limit is (480 - 240) / 2 = 120
    controller.set_zoom(2.0);
    assert!(controller.begin_drag(Point::new(0.0, 0.0), 240.0));
    controller.update_drag(Point::new(500.0, -30.0));
    controller.end_drag();
    assert_eq!(controller.state().offset.x, 120.0);
    assert_eq!(controller.state().offset.y, -30.0);

    // Zooming back out keeps the stale offset until the next drag
    controller.set_zoom(1.0);
    assert_eq!(controller.state().offset.x, 120.0);
    assert!(controller.begin_drag(Point::new(0.0, 0.0), 240.0));
    controller.update_drag(Point::new(1.0, 1.0));
    assert_eq!(controller.state().offset.x, 0.0);
    assert_eq!(controller.state().offset.y, 0.0);
}

#[test]
fn reclamp_policy_pulls_offset_in_on_zoom_out() {
    let mut controller = TransformController::new(ZoomPolicy::ReclampOffset);
    controller.load_image(solid_photo("me.png", [0, 0, 255, 255]));
    controller.set_zoom(3.0);
    controller.begin_drag(Point::new(0.0, 0.0), 240.0);
    controller.update_drag(Point::new(1000.0, 1000.0));
    controller.end_drag();
    assert_eq!(controller.state().offset.x, 240.0);

    controller.set_zoom(2.0);
    assert_eq!(controller.state().offset.x, 120.0);
    assert_eq!(controller.state().offset.y, 120.0);
}

#[test]
fn exported_png_has_scaled_size_and_photo_in_circle() {
    let dir = tempdir().expect("failed to create temp dir");
    let exporter = exporter_into(dir.path(), 2.0);

    let mut controller = TransformController::default();
    controller.load_image(solid_photo("me.png", [0, 0, 255, 255]));
    controller.set_zoom(1.5);

    let layout = FrameLayout {
        credit: None,
        ..FrameLayout::default()
    };
    let captions = Captions {
        name: "Rahim".into(),
        info: String::new(),
    };
    let root = CompositionRoot::snapshot(controller.state(), &layout, None, &captions)
        .expect("photo is loaded");
    let request = CompositionRequest::new(root, &captions.name, "profile");

    let saved = exporter.export(Some(request)).expect("export succeeds");

    assert_eq!(
        saved.path.file_name().and_then(|n| n.to_str()),
        Some("Rahim-image.png")
    );
    let png = image_rs_open(&saved.path);
    assert_eq!(png.dimensions(), (916, 916));

    let circle = layout.mask_circle();
    let center = png.get_pixel((circle.center_x * 2.0) as u32, (circle.center_y * 2.0) as u32);
    assert_eq!(center.0, [0, 0, 255, 255]);
    // Outside the circle the frame fill shows through
    assert_eq!(png.get_pixel(2, 2).0, [139, 0, 0, 255]);
}

#[test]
fn repeated_exports_never_overwrite() {
    let dir = tempdir().expect("failed to create temp dir");
    let exporter = exporter_into(dir.path(), 1.0);

    let mut controller = TransformController::default();
    controller.load_image(solid_photo("me.png", [10, 200, 10, 255]));
    let layout = FrameLayout::default();
    let captions = Captions::default();

    let mut names = Vec::new();
    for _ in 0..3 {
        let root = CompositionRoot::snapshot(controller.state(), &layout, None, &captions)
            .expect("photo is loaded");
        let saved = exporter
            .export(Some(CompositionRequest::new(root, "", "profile")))
            .expect("export succeeds");
        names.push(
            saved
                .path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .unwrap_or_default(),
        );
    }

    assert_eq!(
        names,
        vec![
            "profile-image.png".to_string(),
            "profile-image (1).png".to_string(),
            "profile-image (2).png".to_string(),
        ]
    );
}

#[test]
fn export_without_photo_writes_nothing() {
    let dir = tempdir().expect("failed to create temp dir");
    let exporter = exporter_into(dir.path(), 1.0);

    let err = exporter.export(None).expect_err("nothing to export");
    assert_eq!(err.i18n_key(), "notification-export-no-image");
    assert_eq!(std::fs::read_dir(dir.path()).expect("readable").count(), 0);
}

#[test]
fn language_setting_round_trips_through_settings_file() {
    let dir = tempdir().expect("failed to create temp dir");
    let path = dir.path().join("settings.toml");

    let mut settings = Config::default();
    settings.general.language = Some("bn".to_string());
    config::save_to_path(&settings, &path).expect("write settings");

    let loaded = config::load_from_path(&path).expect("read settings");
    let i18n = I18n::new(None, &loaded);
    assert_eq!(i18n.current_locale().to_string(), "bn");

    // CLI flag wins over the file
    let i18n = I18n::new(Some("en-US".to_string()), &loaded);
    assert_eq!(i18n.current_locale().to_string(), "en-US");
}

fn image_rs_open(path: &std::path::Path) -> image_rs::RgbaImage {
    image_rs::open(path).expect("valid png").to_rgba8()
}
