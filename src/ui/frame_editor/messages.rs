// SPDX-License-Identifier: MPL-2.0
//! Frame editor message/event types re-exported by the facade.

use crate::domain::frame::ZoomFactor;
use iced::Point;

/// Pointer interaction reported by the photo overlay, in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasMessage {
    /// Primary pointer went down inside the circle.
    DragStarted { position: Point },
    /// The pointer moved while a drag may be active.
    DragMoved { position: Point },
    /// The pointer was released or left the window.
    DragEnded,
    /// Mouse wheel over the circle, in notches (positive zooms in).
    WheelScrolled { notches: f32 },
}

/// Messages emitted directly by the editor widgets.
#[derive(Debug, Clone)]
pub enum Message {
    Canvas(CanvasMessage),
    ZoomChanged(f32),
    NameChanged(String),
    InfoChanged(String),
    UploadPressed,
    ResetPosition,
    SavePressed,
}

impl From<CanvasMessage> for Message {
    fn from(message: CanvasMessage) -> Self {
        Message::Canvas(message)
    }
}

/// Events propagated to the parent application for side effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    None,
    /// Open the file picker.
    UploadRequested,
    /// Export the current composition.
    ExportRequested,
    /// A drag gesture finished.
    DragFinished,
    /// The zoom was changed by the slider or the wheel.
    Zoomed(ZoomFactor),
}
