// SPDX-License-Identifier: MPL-2.0
//! Frame editor screen: the circular photo viewport, captions and export
//! controls.
//!
//! This module follows the "state down, messages up" pattern: widgets emit
//! [`Message`]s, [`State::update`] applies them and returns an [`Event`] for
//! side effects the parent owns (file picker, export job, diagnostics).
//!
//! The preview is produced by the same rasterizer as the export, at layout
//! density, so what is on screen is what ends up in the PNG.

mod messages;
mod overlay;
mod view;

pub use messages::{CanvasMessage, Event, Message};
pub use overlay::PhotoOverlay;
pub use view::{view, ViewContext};

use crate::domain::frame::{ExportScale, ZoomFactor};
use crate::media::composition::{
    Captions, CompositionRequest, CompositionRoot, FrameLayout, ImageRef,
};
use crate::media::image::PhotoSource;
use crate::media::rasterizer::{RasterOptions, Rasterizer};
use crate::media::render::SoftwareRasterizer;
use crate::ui::state::{TransformController, ViewportState, ZoomPolicy};
use iced::widget::image;
use std::path::PathBuf;

/// Settings the editor is created with.
#[derive(Debug, Clone)]
pub struct StateConfig {
    pub layout: FrameLayout,
    pub template: Option<ImageRef>,
    pub zoom_policy: ZoomPolicy,
    /// Zoom change per wheel notch.
    pub wheel_step: f32,
    /// Directory whose images count as same-origin for the preview.
    pub asset_root: Option<PathBuf>,
    /// Rendering rules for the preview; the scale is forced to 1.
    pub preview_options: RasterOptions,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            layout: FrameLayout::default(),
            template: None,
            zoom_policy: ZoomPolicy::default(),
            wheel_step: crate::domain::frame::zoom_bounds::STEP,
            asset_root: None,
            preview_options: RasterOptions::preview(),
        }
    }
}

/// Local UI state for the editor screen.
#[derive(Debug)]
pub struct State {
    controller: TransformController,
    captions: Captions,
    layout: FrameLayout,
    template: Option<ImageRef>,
    wheel_step: f32,
    /// Set while an export job runs; disables the save button.
    exporting: bool,
    renderer: SoftwareRasterizer,
    preview_options: RasterOptions,
    preview: Option<image::Handle>,
}

impl Default for State {
    fn default() -> Self {
        Self::new(StateConfig::default())
    }
}

impl State {
    pub fn new(config: StateConfig) -> Self {
        let mut controller = TransformController::new(config.zoom_policy);
        controller.set_viewport_size(config.layout.mask.diameter);

        let mut state = Self {
            controller,
            captions: Captions::default(),
            layout: config.layout,
            template: config.template,
            wheel_step: config.wheel_step,
            exporting: false,
            renderer: SoftwareRasterizer::for_asset_root(config.asset_root),
            preview_options: RasterOptions {
                scale: ExportScale::new(1.0),
                ..config.preview_options
            },
            preview: None,
        };
        state.refresh_preview();
        state
    }

    /// Update the state and emit an [`Event`] for the parent when needed.
    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::Canvas(canvas_message) => self.handle_canvas_message(canvas_message),
            Message::ZoomChanged(value) => {
                if !self.has_photo() {
                    return Event::None;
                }
                let zoom = self.controller.set_zoom(value);
                self.refresh_preview();
                Event::Zoomed(zoom)
            }
            Message::NameChanged(name) => {
                self.captions.name = name;
                self.refresh_preview();
                Event::None
            }
            Message::InfoChanged(info) => {
                self.captions.info = info;
                self.refresh_preview();
                Event::None
            }
            Message::UploadPressed => Event::UploadRequested,
            Message::ResetPosition => {
                if let Some(photo) = self.controller.state().photo().cloned() {
                    self.controller.load_image(photo);
                    self.refresh_preview();
                }
                Event::None
            }
            Message::SavePressed => {
                if self.exporting {
                    Event::None
                } else {
                    Event::ExportRequested
                }
            }
        }
    }

    fn handle_canvas_message(&mut self, message: CanvasMessage) -> Event {
        match message {
            CanvasMessage::DragStarted { position } => {
                self.controller
                    .begin_drag(position, self.layout.mask.diameter);
                Event::None
            }
            CanvasMessage::DragMoved { position } => {
                if self.controller.update_drag(position).is_some() {
                    self.refresh_preview();
                }
                Event::None
            }
            CanvasMessage::DragEnded => {
                if self.controller.is_dragging() {
                    self.controller.end_drag();
                    Event::DragFinished
                } else {
                    Event::None
                }
            }
            CanvasMessage::WheelScrolled { notches } => {
                if !self.has_photo() || notches == 0.0 {
                    return Event::None;
                }
                let zoom = self.controller.zoom_by(notches * self.wheel_step);
                self.refresh_preview();
                Event::Zoomed(zoom)
            }
        }
    }

    /// Places a freshly decoded photo at the origin at 1×.
    pub fn load_photo(&mut self, photo: PhotoSource) {
        self.controller.load_image(photo);
        self.refresh_preview();
    }

    /// Replaces the frame template background.
    pub fn set_template(&mut self, template: Option<ImageRef>) {
        self.template = template;
        self.refresh_preview();
    }

    pub fn set_exporting(&mut self, exporting: bool) {
        self.exporting = exporting;
    }

    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    #[must_use]
    pub fn has_photo(&self) -> bool {
        self.controller.state().has_photo()
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        self.controller.state()
    }

    #[must_use]
    pub fn zoom(&self) -> ZoomFactor {
        self.controller.state().zoom
    }

    #[must_use]
    pub fn captions(&self) -> &Captions {
        &self.captions
    }

    #[must_use]
    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    #[must_use]
    pub fn preview(&self) -> Option<&image::Handle> {
        self.preview.as_ref()
    }

    /// Snapshot of what the preview shows, or `None` without a photo.
    #[must_use]
    pub fn composition(&self) -> Option<CompositionRoot> {
        CompositionRoot::snapshot(
            self.controller.state(),
            &self.layout,
            self.template.as_ref(),
            &self.captions,
        )
    }

    /// Export job for the current composition, named after the caption.
    #[must_use]
    pub fn export_request(&self, default_stem: &str) -> Option<CompositionRequest> {
        self.composition()
            .map(|root| CompositionRequest::new(root, &self.captions.name, default_stem))
    }

    /// Canvas program for the interactive overlay.
    #[must_use]
    pub fn overlay(&self) -> PhotoOverlay {
        PhotoOverlay {
            circle: self.layout.mask_circle(),
            frame_width: self.layout.width,
            has_photo: self.has_photo(),
            dragging: self.controller.is_dragging(),
        }
    }

    fn refresh_preview(&mut self) {
        let options = &self.preview_options;
        let rendered = match self.composition() {
            Some(root) => self.renderer.rasterize(&root, options),
            None => self.renderer.render_empty_frame(
                &self.layout,
                self.template.as_ref(),
                &self.layout.text_layers(&self.captions),
                options,
            ),
        };
        match rendered {
            Ok(bitmap) => {
                self.preview = Some(image::Handle::from_rgba(
                    bitmap.width,
                    bitmap.height,
                    bitmap.pixels,
                ));
            }
            Err(err) => eprintln!("Failed to render frame preview: {}", err),
        }
    }
}
