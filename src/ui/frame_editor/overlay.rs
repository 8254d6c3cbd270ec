// SPDX-License-Identifier: MPL-2.0
//! Interactive overlay laid over the frame preview.
//!
//! The canvas covers the whole preview and hit-tests the circular viewport
//! itself, so the photo can be dragged from anywhere inside the circle and a
//! drag keeps following the pointer once it leaves it.

use super::messages::{CanvasMessage, Message};
use crate::media::composition::Circle;
use crate::ui::design_tokens::{border, palette};
use crate::ui::state::{PointerAdapter, PointerEvent};
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke};
use iced::widget::Action;
use iced::{mouse, Point, Rectangle, Renderer, Theme};

/// Pixels scrolled that count as one wheel notch.
const PIXELS_PER_NOTCH: f32 = 50.0;

/// Canvas program translating pointer input over the circular viewport.
#[derive(Debug, Clone, Copy)]
pub struct PhotoOverlay {
    /// Circular viewport in layout pixels.
    pub circle: Circle,
    /// Width of the frame in layout pixels.
    pub frame_width: f32,
    pub has_photo: bool,
    pub dragging: bool,
}

impl PhotoOverlay {
    /// Layout pixels per screen pixel for the given bounds.
    fn scale(&self, bounds: Rectangle) -> f32 {
        if bounds.width > 0.0 {
            self.frame_width / bounds.width
        } else {
            1.0
        }
    }

    /// Converts an absolute window position to frame layout coordinates.
    fn to_layout(&self, position: Point, bounds: Rectangle) -> Point {
        let scale = self.scale(bounds);
        Point::new(
            (position.x - bounds.x) * scale,
            (position.y - bounds.y) * scale,
        )
    }

    fn hits_circle(&self, position: Point, bounds: Rectangle) -> bool {
        let local = self.to_layout(position, bounds);
        bounds.contains(position) && self.circle.contains(local.x, local.y)
    }

    fn is_hovered(&self, bounds: Rectangle, cursor: mouse::Cursor) -> bool {
        cursor
            .position()
            .is_some_and(|position| self.hits_circle(position, bounds))
    }
}

impl canvas::Program<Message> for PhotoOverlay {
    type State = PointerAdapter;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        if let iced::Event::Mouse(mouse::Event::WheelScrolled { delta }) = event {
            if !self.has_photo || !self.is_hovered(bounds, cursor) {
                return None;
            }
            let notches = match delta {
                mouse::ScrollDelta::Lines { y, .. } => *y,
                mouse::ScrollDelta::Pixels { y, .. } => *y / PIXELS_PER_NOTCH,
            };
            return Some(
                Action::publish(CanvasMessage::WheelScrolled { notches }.into()).and_capture(),
            );
        }

        match state.adapt(event, cursor)? {
            PointerEvent::Pressed(position) => {
                if !self.hits_circle(position, bounds) {
                    state.reset();
                    return None;
                }
                if !self.has_photo {
                    state.reset();
                    return Some(Action::publish(Message::UploadPressed).and_capture());
                }
                let position = self.to_layout(position, bounds);
                Some(Action::publish(CanvasMessage::DragStarted { position }.into()).and_capture())
            }
            PointerEvent::Moved(position) => {
                if !self.dragging {
                    return None;
                }
                let position = self.to_layout(position, bounds);
                Some(Action::publish(CanvasMessage::DragMoved { position }.into()).and_capture())
            }
            PointerEvent::Released => self
                .dragging
                .then(|| Action::publish(CanvasMessage::DragEnded.into()).and_capture()),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        // Only the hover ring of the empty viewport is drawn here; everything
        // else is part of the rasterized preview.
        if self.has_photo || !self.is_hovered(bounds, cursor) {
            return Vec::new();
        }

        let mut frame = Frame::new(renderer, bounds.size());
        let scale = self.scale(bounds);
        let center = Point::new(self.circle.center_x / scale, self.circle.center_y / scale);
        let ring = Path::circle(center, self.circle.radius / scale - border::WIDTH_MD);
        frame.stroke(
            &ring,
            Stroke::default()
                .with_width(border::WIDTH_MD)
                .with_color(palette::PRIMARY_500),
        );
        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.dragging {
            mouse::Interaction::Grabbing
        } else if !self.is_hovered(bounds, cursor) {
            mouse::Interaction::default()
        } else if self.has_photo {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::Pointer
        }
    }
}
