//! Pointer events and the tracker that derives per-move deltas.

use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Absolute position in scene coordinates.
    pub position: Point,
    /// Movement since the previous event of the gesture (zero except for `Move`).
    pub delta: Vec2,
}

impl PointerEvent {
    pub fn down(position: Point) -> Self {
        Self {
            kind: PointerKind::Down,
            position,
            delta: Vec2::ZERO,
        }
    }

    pub fn moved(position: Point, delta: Vec2) -> Self {
        Self {
            kind: PointerKind::Move,
            position,
            delta,
        }
    }

    pub fn up(position: Point) -> Self {
        Self {
            kind: PointerKind::Up,
            position,
            delta: Vec2::ZERO,
        }
    }
}

/// Turns raw absolute pointer positions into a `Down → Move* → Up` sequence.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    /// Last position delivered, in scene coordinates.
    last_position: Option<Point>,
    /// Start position of the current gesture.
    drag_start: Option<Point>,
}

impl PointerTracker {
    /// Create a new tracker with no active gesture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Start position of the current gesture.
    pub fn drag_start(&self) -> Option<Point> {
        self.drag_start
    }

    /// Begin a gesture at `position`.
    pub fn press(&mut self, position: Point) -> PointerEvent {
        if self.drag_start.is_some() {
            log::trace!("pointer pressed again without release; restarting gesture");
        }
        self.drag_start = Some(position);
        self.last_position = Some(position);
        PointerEvent::down(position)
    }

    /// Report a new position. Returns `None` outside a gesture or when the
    /// pointer did not actually move.
    pub fn motion(&mut self, position: Point) -> Option<PointerEvent> {
        self.drag_start?;
        let last = self.last_position.unwrap_or(position);
        let delta = position - last;
        if delta == Vec2::ZERO {
            return None;
        }
        self.last_position = Some(position);
        Some(PointerEvent::moved(position, delta))
    }

    /// End the gesture at `position`. Returns `None` if no gesture was active.
    pub fn release(&mut self, position: Point) -> Option<PointerEvent> {
        self.drag_start.take()?;
        self.last_position = Some(position);
        Some(PointerEvent::up(position))
    }

    /// `press` with a screen-space position.
    pub fn press_screen(&mut self, viewport: &Viewport, screen: Point) -> PointerEvent {
        self.press(viewport.screen_to_world(screen))
    }

    /// `motion` with a screen-space position.
    pub fn motion_screen(&mut self, viewport: &Viewport, screen: Point) -> Option<PointerEvent> {
        self.motion(viewport.screen_to_world(screen))
    }

    /// `release` with a screen-space position.
    pub fn release_screen(&mut self, viewport: &Viewport, screen: Point) -> Option<PointerEvent> {
        self.release(viewport.screen_to_world(screen))
    }
}
