//! Direct-manipulation dragging of a caption bubble.
//!
//! ```text
//!            begin (enabled)
//!   ┌──────┐ ───────────────► ┌──────────┐
//!   │ Idle │                  │ Dragging │ ◄── update(dx, dy)
//!   └──────┘ ◄─────────────── └──────────┘
//!            end / cancel / fail
//! ```
//!
//! The controller never blocks and never errors. Instead of callbacks it
//! returns [`DragEvent`]s that the host forwards: `DragStateChanged(true)`
//! so an ancestor pager can stop treating the gesture as a swipe, and
//! `PositionChanged` with the normalized position on release.

use crate::geometry::{NormalizedPosition, PixelPosition, SafeInsets, SizePx, clamp_to_safe_zone};

/// Notifications produced by drag transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// A drag started (`true`) or finished (`false`).
    DragStateChanged(bool),
    /// The released position as a fraction of the container.
    PositionChanged(NormalizedPosition),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging { origin: PixelPosition },
}

/// Tracks one caption bubble's pixel position through drag gestures.
#[derive(Debug, Clone)]
pub struct DragController {
    enabled: bool,
    state: DragState,
    current: PixelPosition,
    container: SizePx,
    element: SizePx,
}

impl Default for DragController {
    fn default() -> Self {
        Self {
            enabled: false,
            state: DragState::Idle,
            current: PixelPosition::default(),
            container: SizePx::default(),
            element: SizePx::default(),
        }
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The bubble's current top-left corner in pixels.
    pub fn position(&self) -> PixelPosition {
        self.current
    }

    pub fn container(&self) -> SizePx {
        self.container
    }

    pub fn element(&self) -> SizePx {
        self.element
    }

    /// Records the measured container and bubble sizes.
    pub fn set_layout(&mut self, container: SizePx, element: SizePx) {
        self.container = container;
        self.element = element;
    }

    /// Positions the bubble from a stored normalized value.
    ///
    /// Ignored while a drag is in progress so layout passes cannot yank the
    /// bubble out from under the finger.
    pub fn place(&mut self, pos: NormalizedPosition, insets: SafeInsets) {
        if self.is_dragging() {
            return;
        }
        self.current = clamp_to_safe_zone(pos, self.container, self.element, insets);
    }

    /// Enables or disables dragging.
    ///
    /// Disabling in the middle of a drag finishes it as if the gesture had
    /// ended, and returns the resulting events.
    pub fn set_enabled(&mut self, enabled: bool) -> Vec<DragEvent> {
        if self.enabled == enabled {
            return Vec::new();
        }
        let events = if enabled { Vec::new() } else { self.end() };
        self.enabled = enabled;
        events
    }

    /// Starts a drag, snapshotting the current position as the origin.
    ///
    /// Returns `None` when disabled or already dragging.
    pub fn begin(&mut self) -> Option<DragEvent> {
        if !self.enabled || self.is_dragging() {
            return None;
        }
        self.state = DragState::Dragging {
            origin: self.current,
        };
        tracing::debug!(x = self.current.x, y = self.current.y, "drag started");
        Some(DragEvent::DragStateChanged(true))
    }

    /// Moves the bubble to `origin + translation`, clamped to the container.
    ///
    /// Returns the new pixel position, or `None` when not dragging.
    pub fn update(&mut self, dx: f32, dy: f32) -> Option<PixelPosition> {
        let DragState::Dragging { origin } = self.state else {
            return None;
        };
        let moved = origin.translated(dx, dy);
        self.current = if self.container.is_degenerate() {
            PixelPosition::new(moved.x.max(0.0), moved.y.max(0.0))
        } else {
            moved.clamp_within(self.container, self.element)
        };
        Some(self.current)
    }

    /// Finishes a drag and reports the normalized position.
    ///
    /// If the container has no size yet the position report is skipped and
    /// the previously stored normalized value stays in effect.
    pub fn end(&mut self) -> Vec<DragEvent> {
        if !self.is_dragging() {
            return Vec::new();
        }
        self.state = DragState::Idle;

        let mut events = vec![DragEvent::DragStateChanged(false)];
        match self.current.to_normalized(self.container) {
            Some(pos) => {
                tracing::debug!(x = pos.x, y = pos.y, "drag released");
                events.push(DragEvent::PositionChanged(pos));
            }
            None => {
                tracing::warn!("drag released before layout, position not reported");
            }
        }
        events
    }

    /// Gesture cancelled by the system. Same as [`end`](Self::end).
    pub fn cancel(&mut self) -> Vec<DragEvent> {
        self.end()
    }

    /// Gesture recognition failed. Same as [`end`](Self::end).
    pub fn fail(&mut self) -> Vec<DragEvent> {
        self.end()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_at(x: f32, y: f32) -> DragController {
        let mut drag = DragController::new();
        drag.set_layout(SizePx::new(300.0, 500.0), SizePx::new(40.0, 20.0));
        drag.place(NormalizedPosition::new(x / 300.0, y / 500.0), SafeInsets::default());
        drag.set_enabled(true);
        drag
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn drag_reports_clamped_pixels_and_normalized_release() {
        let mut drag = controller_at(10.0, 10.0);

        assert_eq!(drag.begin(), Some(DragEvent::DragStateChanged(true)));
        let px = drag.update(50.0, -5.0).unwrap();
        assert_close(px.x, 60.0);
        assert_close(px.y, 5.0);

        let events = drag.end();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], DragEvent::DragStateChanged(false));
        let DragEvent::PositionChanged(pos) = events[1] else {
            panic!("expected a position report, got {:?}", events[1]);
        };
        assert_close(pos.x, 0.2);
        assert_close(pos.y, 0.01);
    }

    #[test]
    fn moves_are_relative_to_origin_not_cumulative() {
        let mut drag = controller_at(10.0, 10.0);
        drag.begin();
        drag.update(5.0, 5.0);
        let px = drag.update(20.0, 30.0).unwrap();
        assert_close(px.x, 30.0);
        assert_close(px.y, 40.0);
    }

    #[test]
    fn update_clamps_to_container() {
        let mut drag = controller_at(10.0, 10.0);
        drag.begin();

        let px = drag.update(-100.0, -100.0).unwrap();
        assert_eq!(px, PixelPosition::new(0.0, 0.0));

        let px = drag.update(1000.0, 1000.0).unwrap();
        assert_close(px.x, 260.0);
        assert_close(px.y, 480.0);
    }

    #[test]
    fn disabled_controller_ignores_gestures() {
        let mut drag = controller_at(10.0, 10.0);
        drag.set_enabled(false);

        assert_eq!(drag.begin(), None);
        assert_eq!(drag.update(10.0, 10.0), None);
        assert!(drag.end().is_empty());
        assert_close(drag.position().x, 10.0);
    }

    #[test]
    fn second_begin_is_ignored() {
        let mut drag = controller_at(10.0, 10.0);
        assert!(drag.begin().is_some());
        assert!(drag.begin().is_none());
    }

    #[test]
    fn cancel_and_fail_behave_like_end() {
        let mut drag = controller_at(10.0, 10.0);
        drag.begin();
        drag.update(10.0, 0.0);
        assert_eq!(drag.cancel().len(), 2);

        drag.begin();
        assert_eq!(drag.fail().len(), 2);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn zero_container_skips_position_report() {
        let mut drag = DragController::new();
        drag.set_enabled(true);
        drag.begin();
        drag.update(15.0, 25.0);

        let events = drag.end();
        assert_eq!(events, vec![DragEvent::DragStateChanged(false)]);
    }

    #[test]
    fn disabling_mid_drag_finishes_it() {
        let mut drag = controller_at(10.0, 10.0);
        drag.begin();
        drag.update(30.0, 0.0);

        let events = drag.set_enabled(false);
        assert_eq!(events[0], DragEvent::DragStateChanged(false));
        assert!(matches!(events[1], DragEvent::PositionChanged(_)));
        assert!(!drag.is_dragging());
        assert!(!drag.is_enabled());
    }

    #[test]
    fn place_is_ignored_while_dragging() {
        let mut drag = controller_at(10.0, 10.0);
        drag.begin();
        drag.update(40.0, 0.0);
        drag.place(NormalizedPosition::new(0.9, 0.9), SafeInsets::default());
        assert_close(drag.position().x, 50.0);
    }
}
