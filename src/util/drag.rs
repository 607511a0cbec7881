// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Painting drag sessions.
//!
//! A drag is an explicit `Idle -> Dragging -> Idle` state machine. Pressing
//! the primary button on a painting records where inside the painting it
//! was grabbed, every move while dragging produces a new clamped top-left
//! position, and releasing the pointer (or losing it) ends the session. The
//! canvas only routes pointer events here while a session is active.
//!
//! Only one painting can be dragged at a time. A press on another painting
//! while a session is active is refused until the current one ends.

use crate::models::painting::PaintingId;
use crate::util::geometry::{clamp_position, Point, Size};

/// Which pointer button produced a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Current state of the drag controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        painting: PaintingId,
        /// Pointer offset from the painting's top-left corner at press time
        anchor: Point,
    },
}

/// Outcome of a press on a painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStart {
    Started,
    /// Only the primary button starts a drag
    IgnoredButton,
    /// Another painting is already being dragged
    Busy(PaintingId),
}

/// A position update produced while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMove {
    pub painting: PaintingId,
    pub position: Point,
}

/// Drag state machine shared by all paintings on the wall.
#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[cfg(test)]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The painting currently being dragged, if any.
    pub fn active(&self) -> Option<PaintingId> {
        match self.state {
            DragState::Dragging { painting, .. } => Some(painting),
            DragState::Idle => None,
        }
    }

    /// Handle a pointer press on `painting`.
    ///
    /// `pointer` and `painting_top_left` must be in the same coordinate
    /// space; their difference becomes the grip point kept for the drag.
    pub fn press(
        &mut self,
        painting: PaintingId,
        button: PointerButton,
        pointer: Point,
        painting_top_left: Point,
    ) -> DragStart {
        if button != PointerButton::Primary {
            return DragStart::IgnoredButton;
        }
        if let DragState::Dragging { painting: active, .. } = self.state {
            if active != painting {
                log::debug!("Ignoring grab on painting {} while {} is dragging", painting, active);
                return DragStart::Busy(active);
            }
        }

        self.state = DragState::Dragging {
            painting,
            anchor: pointer - painting_top_left,
        };
        log::debug!("Started dragging painting {}", painting);
        DragStart::Started
    }

    /// Handle a pointer move.
    ///
    /// Returns the new clamped top-left position of the dragged painting,
    /// relative to `parent_origin`, or `None` when no drag is active.
    pub fn move_to(
        &mut self,
        pointer: Point,
        parent_origin: Point,
        container: Size,
        painting_size: Size,
    ) -> Option<DragMove> {
        let DragState::Dragging { painting, anchor } = self.state else {
            return None;
        };

        let candidate = pointer - parent_origin - anchor;
        Some(DragMove {
            painting,
            position: clamp_position(candidate, container, painting_size),
        })
    }

    /// Handle a pointer release (any button) or the pointer leaving the surface.
    ///
    /// Returns the painting whose drag ended. The position is not touched:
    /// the last move wins.
    pub fn release(&mut self) -> Option<PaintingId> {
        let ended = self.active();
        self.state = DragState::Idle;
        if let Some(painting) = ended {
            log::debug!("Stopped dragging painting {}", painting);
        }
        ended
    }

    /// End the session if it belongs to `painting` (e.g. the painting was removed).
    pub fn forget(&mut self, painting: PaintingId) {
        if self.active() == Some(painting) {
            self.state = DragState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Size = Size::new(600.0, 480.0);
    const PAINTING: Size = Size::new(120.0, 180.0);

    #[test]
    fn test_moves_ignored_when_idle() {
        let mut drag = DragController::new();
        assert!(drag
            .move_to(Point::new(100.0, 100.0), Point::default(), CONTAINER, PAINTING)
            .is_none());
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_grip_point_is_preserved() {
        let mut drag = DragController::new();
        let origin = Point::new(200.0, 100.0);
        // Painting sits at (50, 50) inside the wall, grabbed 10px right and 20px down.
        let top_left = origin + Point::new(50.0, 50.0);
        let pointer = top_left + Point::new(10.0, 20.0);
        assert_eq!(drag.press(1, PointerButton::Primary, pointer, top_left), DragStart::Started);

        let moved = drag
            .move_to(pointer + Point::new(30.0, 15.0), origin, CONTAINER, PAINTING)
            .unwrap();
        assert_eq!(moved.painting, 1);
        assert_eq!(moved.position, Point::new(80.0, 65.0));
    }

    #[test]
    fn test_secondary_button_does_not_start() {
        let mut drag = DragController::new();
        let start = drag.press(1, PointerButton::Secondary, Point::default(), Point::default());
        assert_eq!(start, DragStart::IgnoredButton);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_second_grab_is_refused_until_release() {
        let mut drag = DragController::new();
        drag.press(1, PointerButton::Primary, Point::default(), Point::default());
        let start = drag.press(2, PointerButton::Primary, Point::default(), Point::default());
        assert_eq!(start, DragStart::Busy(1));
        assert_eq!(drag.active(), Some(1));

        assert_eq!(drag.release(), Some(1));
        assert_eq!(
            drag.press(2, PointerButton::Primary, Point::default(), Point::default()),
            DragStart::Started
        );
        assert_eq!(drag.active(), Some(2));
    }

    #[test]
    fn test_release_stops_updates() {
        let mut drag = DragController::new();
        drag.press(3, PointerButton::Primary, Point::default(), Point::default());
        assert_eq!(drag.release(), Some(3));
        assert_eq!(drag.release(), None);
        assert!(drag
            .move_to(Point::new(5.0, 5.0), Point::default(), CONTAINER, PAINTING)
            .is_none());
    }

    #[test]
    fn test_forget_only_matching_painting() {
        let mut drag = DragController::new();
        drag.press(3, PointerButton::Primary, Point::default(), Point::default());
        drag.forget(4);
        assert_eq!(drag.active(), Some(3));
        drag.forget(3);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_every_trajectory_stays_in_bounds() {
        // Small linear congruential generator, enough to produce wild trajectories.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((seed >> 33) as f64 / (1u64 << 31) as f64) * 4000.0 - 2000.0
        };

        let cases = [
            (CONTAINER, PAINTING),
            (Size::new(100.0, 100.0), Size::new(250.0, 40.0)),
            (Size::new(50.0, 50.0), Size::new(50.0, 50.0)),
        ];

        for (container, painting) in cases {
            let mut drag = DragController::new();
            let origin = Point::new(next().abs(), next().abs());
            drag.press(7, PointerButton::Primary, Point::new(next(), next()), origin);

            for _ in 0..500 {
                let moved = drag
                    .move_to(Point::new(next(), next()), origin, container, painting)
                    .unwrap();
                let max_x = (container.width - painting.width).max(0.0);
                let max_y = (container.height - painting.height).max(0.0);
                assert!(moved.position.x >= 0.0 && moved.position.x <= max_x);
                assert!(moved.position.y >= 0.0 && moved.position.y <= max_y);
            }
        }
    }
}
