// SPDX-License-Identifier: MPL-2.0
//! Viewport state management
//!
//! Owns the live transform (offset, zoom) of the uploaded photo relative to
//! its circular viewport. Every mutation goes through [`TransformController`],
//! which is the single place where the coverage invariant is enforced:
//!
//! ```text
//! |offset.x| <= max_offset && |offset.y| <= max_offset
//! max_offset  = (viewport_size * zoom - viewport_size) / 2
//! ```
//!
//! so the photo always fully covers the circular mask.

use super::drag::DragSession;
use crate::domain::frame::{Offset, ZoomFactor};
use crate::media::image::PhotoSource;
use iced::Point;

/// Viewport side length used when the rendered container reports no size.
pub const FALLBACK_VIEWPORT_SIZE: f32 = 200.0;

/// How a zoom change treats an offset that the new zoom no longer allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomPolicy {
    /// Keep the offset untouched; it is corrected by the next drag.
    #[default]
    PreserveOffset,
    /// Clamp the offset against the new bounds immediately.
    ReclampOffset,
}

impl ZoomPolicy {
    #[must_use]
    pub fn from_reclamp_flag(reclamp: bool) -> Self {
        if reclamp {
            Self::ReclampOffset
        } else {
            Self::PreserveOffset
        }
    }
}

/// Transform of the photo inside the circular viewport.
#[derive(Debug, Clone)]
pub struct ViewportState {
    /// Translation of the photo relative to the viewport center.
    pub offset: Offset,

    /// Uniform scale of the photo layer.
    pub zoom: ZoomFactor,

    /// Side length of the circular mask container, in layout pixels.
    pub viewport_size: f32,

    /// Photo currently placed in the viewport.
    photo: Option<PhotoSource>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            offset: Offset::ZERO,
            zoom: ZoomFactor::default(),
            viewport_size: FALLBACK_VIEWPORT_SIZE,
            photo: None,
        }
    }
}

impl ViewportState {
    /// Largest legal offset on either axis for the current zoom and size.
    #[must_use]
    pub fn max_offset(&self) -> f32 {
        max_offset(self.viewport_size, self.zoom)
    }

    /// Returns whether the photo currently covers the whole mask.
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        self.offset.is_within(self.max_offset())
    }

    #[must_use]
    pub fn photo(&self) -> Option<&PhotoSource> {
        self.photo.as_ref()
    }

    #[must_use]
    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }
}

/// Computes `(size * zoom - size) / 2`.
#[must_use]
pub fn max_offset(viewport_size: f32, zoom: ZoomFactor) -> f32 {
    let image_size = viewport_size * zoom.value();
    ((image_size - viewport_size) / 2.0).max(0.0)
}

/// Normalizes a measured container size, falling back when it is unusable.
fn effective_viewport_size(measured: f32) -> f32 {
    if measured.is_finite() && measured > 0.0 {
        measured
    } else {
        FALLBACK_VIEWPORT_SIZE
    }
}

/// Converts pointer input and slider changes into legal viewport states.
#[derive(Debug, Clone, Default)]
pub struct TransformController {
    state: ViewportState,
    drag: DragSession,
    zoom_policy: ZoomPolicy,
}

impl TransformController {
    #[must_use]
    pub fn new(zoom_policy: ZoomPolicy) -> Self {
        Self {
            zoom_policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    #[must_use]
    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    #[must_use]
    pub fn zoom_policy(&self) -> ZoomPolicy {
        self.zoom_policy
    }

    pub fn set_zoom_policy(&mut self, policy: ZoomPolicy) {
        self.zoom_policy = policy;
    }

    /// Records the rendered container size ahead of the first drag.
    pub fn set_viewport_size(&mut self, size: f32) {
        self.state.viewport_size = effective_viewport_size(size);
    }

    /// Opens a drag session at `pointer`.
    ///
    /// `viewport_size` is the side length of the rendered mask container at
    /// drag start. Returns `false` without touching any state when no photo
    /// is loaded.
    pub fn begin_drag(&mut self, pointer: Point, viewport_size: f32) -> bool {
        if !self.state.has_photo() {
            return false;
        }
        self.state.viewport_size = effective_viewport_size(viewport_size);
        self.drag.begin(pointer, self.state.offset);
        true
    }

    /// Moves the photo so it follows `pointer`, clamping each axis to
    /// `[-max_offset, max_offset]`.
    ///
    /// Ignored when no drag session is active, which lets event listeners
    /// fire unconditionally. Returns the committed offset.
    pub fn update_drag(&mut self, pointer: Point) -> Option<Offset> {
        let candidate = self.drag.candidate_offset(pointer)?;
        let clamped = candidate.clamped(self.state.max_offset());
        self.state.offset = clamped;
        Some(clamped)
    }

    /// Closes the drag session. Idempotent.
    pub fn end_drag(&mut self) {
        self.drag.end();
    }

    /// Sets the zoom factor, clamped to `[1.0, 3.0]`.
    ///
    /// With [`ZoomPolicy::PreserveOffset`] the current offset is left as is,
    /// even if the new bounds are tighter; the next drag brings it back
    /// within range.
    pub fn set_zoom(&mut self, value: f32) -> ZoomFactor {
        self.state.zoom = ZoomFactor::new(value);
        if self.zoom_policy == ZoomPolicy::ReclampOffset {
            self.state.offset = self.state.offset.clamped(self.state.max_offset());
        }
        self.state.zoom
    }

    /// Adjusts the zoom by `delta` (mouse wheel, keyboard).
    pub fn zoom_by(&mut self, delta: f32) -> ZoomFactor {
        let target = self.state.zoom.offset_by(delta);
        self.set_zoom(target.value())
    }

    /// Replaces the photo and resets the transform to the origin at 1×.
    pub fn load_image(&mut self, photo: PhotoSource) {
        self.state.photo = Some(photo);
        self.state.offset = Offset::ZERO;
        self.state.zoom = ZoomFactor::default();
        self.drag.end();
    }

    /// Removes the photo and resets the transform.
    pub fn clear(&mut self) {
        self.state.photo = None;
        self.state.offset = Offset::ZERO;
        self.state.zoom = ZoomFactor::default();
        self.drag.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, solid_photo};

    fn photo(name: &str) -> PhotoSource {
        solid_photo(name, 2, [255; 4])
    }

    fn loaded_controller() -> TransformController {
        let mut controller = TransformController::default();
        controller.load_image(photo("a.png"));
        controller
    }

    #[test]
    fn default_state_is_origin_at_unit_zoom() {
        let controller = TransformController::default();
        let state = controller.state();
        assert_eq!(state.offset, Offset::ZERO);
        assert_abs_diff_eq!(state.zoom.value(), 1.0);
        assert!(!state.has_photo());
        assert!(!controller.is_dragging());
    }

    #[test]
    fn max_offset_matches_formula() {
        assert_abs_diff_eq!(max_offset(200.0, ZoomFactor::new(2.0)), 100.0);
        assert_abs_diff_eq!(max_offset(240.0, ZoomFactor::new(1.5)), 60.0);
        assert_abs_diff_eq!(max_offset(200.0, ZoomFactor::new(1.0)), 0.0);
    }

    #[test]
    fn begin_drag_without_photo_is_noop() {
        let mut controller = TransformController::default();
        assert!(!controller.begin_drag(Point::new(10.0, 10.0), 300.0));
        assert!(!controller.is_dragging());
        assert_abs_diff_eq!(controller.state().viewport_size, FALLBACK_VIEWPORT_SIZE);
    }

    #[test]
    fn begin_drag_captures_viewport_size() {
        let mut controller = loaded_controller();
        assert!(controller.begin_drag(Point::new(0.0, 0.0), 240.0));
        assert_abs_diff_eq!(controller.state().viewport_size, 240.0);
    }

    #[test]
    fn begin_drag_with_unmeasured_container_uses_fallback() {
        let mut controller = loaded_controller();
        controller.begin_drag(Point::new(0.0, 0.0), 0.0);
        assert_abs_diff_eq!(controller.state().viewport_size, FALLBACK_VIEWPORT_SIZE);
    }

    #[test]
    fn drag_past_bound_is_clamped() {
        let mut controller = loaded_controller();
        controller.set_zoom(2.0);
        controller.begin_drag(Point::new(100.0, 100.0), 200.0);

        let committed = controller.update_drag(Point::new(250.0, 100.0));

        assert_eq!(committed, Some(Offset::new(100.0, 0.0)));
        assert_abs_diff_eq!(controller.state().offset.x, 100.0);
    }

    #[test]
    fn drag_at_unit_zoom_cannot_move_photo() {
        let mut controller = loaded_controller();
        controller.begin_drag(Point::new(50.0, 50.0), 200.0);
        controller.update_drag(Point::new(90.0, 10.0));
        assert_eq!(controller.state().offset, Offset::ZERO);
    }

    #[test]
    fn every_update_respects_bounds() {
        let mut controller = loaded_controller();
        let pointer_path = [
            (0.0, 0.0),
            (35.0, -80.0),
            (400.0, 400.0),
            (-900.0, 12.5),
            (3.0, -1000.0),
        ];

        for zoom in [1.0, 1.3, 2.0, 2.7, 3.0] {
            controller.set_zoom(zoom);
            controller.begin_drag(Point::new(0.0, 0.0), 240.0);
            for (x, y) in pointer_path {
                controller.update_drag(Point::new(x, y));
                let state = controller.state();
                let limit = (state.viewport_size * state.zoom.value() - state.viewport_size) / 2.0;
                assert!(state.offset.x.abs() <= limit + f32::EPSILON);
                assert!(state.offset.y.abs() <= limit + f32::EPSILON);
            }
            controller.end_drag();
        }
    }

    #[test]
    fn update_after_end_drag_changes_nothing() {
        let mut controller = loaded_controller();
        controller.set_zoom(3.0);
        controller.begin_drag(Point::new(0.0, 0.0), 200.0);
        controller.update_drag(Point::new(20.0, 20.0));
        controller.end_drag();

        let before = controller.state().offset;
        assert!(controller.update_drag(Point::new(150.0, -150.0)).is_none());
        assert_eq!(controller.state().offset, before);
    }

    #[test]
    fn end_drag_is_idempotent() {
        let mut controller = loaded_controller();
        controller.end_drag();
        controller.end_drag();
        assert!(!controller.is_dragging());
    }

    #[test]
    fn set_zoom_clamps_and_is_idempotent() {
        let mut controller = loaded_controller();
        assert_abs_diff_eq!(controller.set_zoom(5.0).value(), 3.0);
        assert_abs_diff_eq!(controller.set_zoom(0.2).value(), 1.0);
        controller.set_zoom(1.7);
        let once = controller.state().clone();
        controller.set_zoom(1.7);
        assert_eq!(controller.state().zoom, once.zoom);
        assert_eq!(controller.state().offset, once.offset);
    }

    #[test]
    fn zoom_out_preserves_offset_by_default() {
        let mut controller = loaded_controller();
        controller.set_zoom(3.0);
        controller.begin_drag(Point::new(0.0, 0.0), 200.0);
        controller.update_drag(Point::new(500.0, 500.0));
        controller.end_drag();
        assert_eq!(controller.state().offset, Offset::new(200.0, 200.0));

        controller.set_zoom(1.5);

        // Offset stays out of bounds until the next drag.
        assert_eq!(controller.state().offset, Offset::new(200.0, 200.0));
        assert!(!controller.state().is_within_bounds());

        controller.begin_drag(Point::new(0.0, 0.0), 200.0);
        controller.update_drag(Point::new(0.0, 0.0));
        assert!(controller.state().is_within_bounds());
    }

    #[test]
    fn zoom_out_reclamps_when_policy_requests_it() {
        let mut controller = TransformController::new(ZoomPolicy::ReclampOffset);
        controller.load_image(photo("a.png"));
        controller.set_zoom(3.0);
        controller.begin_drag(Point::new(0.0, 0.0), 200.0);
        controller.update_drag(Point::new(-500.0, 500.0));
        controller.end_drag();

        controller.set_zoom(1.5);

        assert_eq!(controller.state().offset, Offset::new(-50.0, 50.0));
        assert!(controller.state().is_within_bounds());
    }

    #[test]
    fn zoom_by_steps_within_range() {
        let mut controller = loaded_controller();
        controller.zoom_by(0.5);
        assert_abs_diff_eq!(controller.state().zoom.value(), 1.5);
        controller.zoom_by(10.0);
        assert_abs_diff_eq!(controller.state().zoom.value(), 3.0);
        controller.zoom_by(-10.0);
        assert_abs_diff_eq!(controller.state().zoom.value(), 1.0);
    }

    #[test]
    fn load_image_resets_transform_and_replaces_photo() {
        let mut controller = TransformController::default();
        let first = photo("a.png");
        controller.load_image(first.clone());
        controller.set_zoom(2.4);
        controller.begin_drag(Point::new(0.0, 0.0), 200.0);
        controller.update_drag(Point::new(-60.0, 33.0));

        let second = photo("b.png");
        controller.load_image(second.clone());

        let state = controller.state();
        assert_eq!(state.offset, Offset::ZERO);
        assert_abs_diff_eq!(state.zoom.value(), 1.0);
        let current = state.photo().expect("photo should be loaded");
        assert!(current.same_source(&second));
        assert!(!current.same_source(&first));
        assert!(!controller.is_dragging());
    }

    #[test]
    fn clear_drops_photo() {
        let mut controller = loaded_controller();
        controller.set_zoom(2.0);
        controller.clear();
        assert!(!controller.state().has_photo());
        assert_abs_diff_eq!(controller.state().zoom.value(), 1.0);
    }
}
