// SPDX-License-Identifier: MPL-2.0
//! Pointer input normalization
//!
//! Mouse and touch events are turned into a single device-agnostic
//! [`PointerEvent`] before they reach the transform controller. Only the
//! first finger that touches down is tracked; additional fingers are ignored
//! until it lifts.

use iced::{mouse, touch, Point};

/// Uniform pointer event consumed by the viewport controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button or first finger went down at the given position.
    Pressed(Point),
    /// The tracked pointer moved.
    Moved(Point),
    /// The tracked pointer was released, lost or left the window.
    Released,
}

impl PointerEvent {
    /// Position carried by the event, if any.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Pressed(position) | Self::Moved(position) => Some(*position),
            Self::Released => None,
        }
    }
}

/// Stateful adapter tracking which finger owns the current gesture.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerAdapter {
    active_finger: Option<touch::Finger>,
}

impl PointerAdapter {
    /// Converts a raw window event into a [`PointerEvent`].
    ///
    /// `cursor` supplies the position for mouse button events, which carry
    /// none of their own.
    pub fn adapt(&mut self, event: &iced::Event, cursor: mouse::Cursor) -> Option<PointerEvent> {
        match event {
            iced::Event::Mouse(mouse_event) => Self::adapt_mouse(mouse_event, cursor),
            iced::Event::Touch(touch_event) => self.adapt_touch(touch_event),
            _ => None,
        }
    }

    fn adapt_mouse(event: &mouse::Event, cursor: mouse::Cursor) -> Option<PointerEvent> {
        match event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                cursor.position().map(PointerEvent::Pressed)
            }
            mouse::Event::CursorMoved { position } => Some(PointerEvent::Moved(*position)),
            mouse::Event::ButtonReleased(mouse::Button::Left) | mouse::Event::CursorLeft => {
                Some(PointerEvent::Released)
            }
            _ => None,
        }
    }

    fn adapt_touch(&mut self, event: &touch::Event) -> Option<PointerEvent> {
        match *event {
            touch::Event::FingerPressed { id, position } => {
                if self.active_finger.is_some() {
                    return None;
                }
                self.active_finger = Some(id);
                Some(PointerEvent::Pressed(position))
            }
            touch::Event::FingerMoved { id, position } => {
                (self.active_finger == Some(id)).then_some(PointerEvent::Moved(position))
            }
            touch::Event::FingerLifted { id, .. } | touch::Event::FingerLost { id, .. } => {
                if self.active_finger == Some(id) {
                    self.active_finger = None;
                    Some(PointerEvent::Released)
                } else {
                    None
                }
            }
        }
    }

    /// Forgets the tracked finger, e.g. after a press was rejected.
    pub fn reset(&mut self) {
        self.active_finger = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finger(id: u64) -> touch::Finger {
        touch::Finger(id)
    }

    #[test]
    fn mouse_press_uses_cursor_position() {
        let mut adapter = PointerAdapter::default();
        let event = iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        let result = adapter.adapt(&event, mouse::Cursor::Available(Point::new(4.0, 9.0)));
        assert_eq!(result, Some(PointerEvent::Pressed(Point::new(4.0, 9.0))));
    }

    #[test]
    fn mouse_press_without_cursor_is_ignored() {
        let mut adapter = PointerAdapter::default();
        let event = iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        assert!(adapter.adapt(&event, mouse::Cursor::Unavailable).is_none());
    }

    #[test]
    fn right_button_is_ignored() {
        let mut adapter = PointerAdapter::default();
        let event = iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right));
        let cursor = mouse::Cursor::Available(Point::ORIGIN);
        assert!(adapter.adapt(&event, cursor).is_none());
    }

    #[test]
    fn mouse_move_and_release_are_forwarded() {
        let mut adapter = PointerAdapter::default();
        let moved = iced::Event::Mouse(mouse::Event::CursorMoved {
            position: Point::new(1.0, 2.0),
        });
        let left = iced::Event::Mouse(mouse::Event::CursorLeft);
        let cursor = mouse::Cursor::Unavailable;

        assert_eq!(
            adapter.adapt(&moved, cursor),
            Some(PointerEvent::Moved(Point::new(1.0, 2.0)))
        );
        assert_eq!(adapter.adapt(&left, cursor), Some(PointerEvent::Released));
    }

    #[test]
    fn only_first_finger_is_tracked() {
        let mut adapter = PointerAdapter::default();
        let cursor = mouse::Cursor::Unavailable;

        let first_down = iced::Event::Touch(touch::Event::FingerPressed {
            id: finger(1),
            position: Point::new(10.0, 10.0),
        });
        let second_down = iced::Event::Touch(touch::Event::FingerPressed {
            id: finger(2),
            position: Point::new(50.0, 50.0),
        });
        let second_move = iced::Event::Touch(touch::Event::FingerMoved {
            id: finger(2),
            position: Point::new(60.0, 60.0),
        });
        let first_move = iced::Event::Touch(touch::Event::FingerMoved {
            id: finger(1),
            position: Point::new(12.0, 14.0),
        });
        let first_up = iced::Event::Touch(touch::Event::FingerLifted {
            id: finger(1),
            position: Point::new(12.0, 14.0),
        });

        assert_eq!(
            adapter.adapt(&first_down, cursor),
            Some(PointerEvent::Pressed(Point::new(10.0, 10.0)))
        );
        assert!(adapter.adapt(&second_down, cursor).is_none());
        assert!(adapter.adapt(&second_move, cursor).is_none());
        assert_eq!(
            adapter.adapt(&first_move, cursor),
            Some(PointerEvent::Moved(Point::new(12.0, 14.0)))
        );
        assert_eq!(adapter.adapt(&first_up, cursor), Some(PointerEvent::Released));

        // A new gesture can start once the first finger lifted.
        assert!(adapter.adapt(&second_down, cursor).is_some());
    }
}
