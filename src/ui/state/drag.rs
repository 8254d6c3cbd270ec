// SPDX-License-Identifier: MPL-2.0
//! Drag session management
//!
//! Models the `Idle → Dragging → Idle` transitions used to pan the photo
//! inside its circular viewport.

use crate::domain::frame::Offset;
use iced::Point;

/// Grab-and-drag state. Exists as `Dragging` only while a pointer button or
/// touch is held.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragSession {
    /// No pointer is held over the photo.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging {
        /// Pointer position minus the photo offset at drag start. Deltas are
        /// computed against this anchor so repeated moves never drift.
        anchor: Point,
    },
}

impl DragSession {
    /// Opens a session anchored at `pointer - offset`.
    pub fn begin(&mut self, pointer: Point, offset: Offset) {
        *self = Self::Dragging {
            anchor: Point::new(pointer.x - offset.x, pointer.y - offset.y),
        };
    }

    /// Closes the session. Idempotent.
    pub fn end(&mut self) {
        *self = Self::Idle;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Returns the anchor of the active session.
    #[must_use]
    pub fn anchor(&self) -> Option<Point> {
        match self {
            Self::Dragging { anchor } => Some(*anchor),
            Self::Idle => None,
        }
    }

    /// Unclamped offset the photo would take if the pointer were at `pointer`.
    ///
    /// Returns `None` when no session is active.
    #[must_use]
    pub fn candidate_offset(&self, pointer: Point) -> Option<Offset> {
        let anchor = self.anchor()?;
        Some(Offset::new(pointer.x - anchor.x, pointer.y - anchor.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_idle() {
        let session = DragSession::default();
        assert!(!session.is_active());
        assert!(session.anchor().is_none());
    }

    #[test]
    fn begin_records_anchor_relative_to_offset() {
        let mut session = DragSession::default();
        session.begin(Point::new(100.0, 50.0), Offset::new(20.0, 10.0));

        assert!(session.is_active());
        assert_eq!(session.anchor(), Some(Point::new(80.0, 40.0)));
    }

    #[test]
    fn end_clears_state_and_is_idempotent() {
        let mut session = DragSession::default();
        session.begin(Point::new(100.0, 50.0), Offset::ZERO);
        session.end();
        session.end();

        assert_eq!(session, DragSession::Idle);
    }

    #[test]
    fn candidate_offset_returns_none_when_idle() {
        let session = DragSession::default();
        assert!(session.candidate_offset(Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn candidate_offset_follows_pointer_without_drift() {
        let mut session = DragSession::default();
        session.begin(Point::new(200.0, 150.0), Offset::new(5.0, -5.0));

        // Pointer moved right by 30 and up by 10
        let first = session.candidate_offset(Point::new(230.0, 140.0));
        assert_eq!(first, Some(Offset::new(35.0, -15.0)));

        // Back to the start position restores the original offset
        let back = session.candidate_offset(Point::new(200.0, 150.0));
        assert_eq!(back, Some(Offset::new(5.0, -5.0)));
    }
}
