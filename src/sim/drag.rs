//! Drag-to-launch state machine
//!
//! Pressing the pointer anchors a new ball, moving it aims, releasing it
//! launches a ball from the current point back toward the anchor.

use glam::Vec2;

use super::state::Ball;
use crate::consts::BALL_SPEED_SCALE;

/// The in-progress drag, if any
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Where the press happened
        anchor: Vec2,
        /// Where the ball currently sits (unclamped)
        current: Vec2,
    },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    /// Idle -> Dragging. Returns false (and changes nothing) if a drag is
    /// already in progress.
    pub fn press(&mut self, at: Vec2) -> bool {
        match self {
            DragState::Idle => {
                *self = DragState::Dragging {
                    anchor: at,
                    current: at,
                };
                true
            }
            DragState::Dragging { .. } => false,
        }
    }

    /// Move the aimed ball. No-op while idle.
    pub fn move_to(&mut self, at: Vec2) {
        if let DragState::Dragging { current, .. } = self {
            *current = at;
        }
    }

    /// Dragging -> Idle, producing the launched ball.
    ///
    /// The ball starts at the current drag point with velocity
    /// `(anchor - current) * BALL_SPEED_SCALE`. Returns `None` while idle.
    pub fn release(&mut self) -> Option<Ball> {
        match *self {
            DragState::Idle => None,
            DragState::Dragging { anchor, current } => {
                *self = DragState::Idle;
                Some(Ball::new(current, (anchor - current) * BALL_SPEED_SCALE))
            }
        }
    }

    /// Anchor and current point of the drag line
    pub fn line(&self) -> Option<(Vec2, Vec2)> {
        match *self {
            DragState::Idle => None,
            DragState::Dragging { anchor, current } => Some((anchor, current)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_move_release() {
        let mut drag = DragState::Idle;
        assert!(drag.press(Vec2::new(1.0, 1.0)));
        drag.move_to(Vec2::new(2.0, 0.5));
        assert_eq!(
            drag.line(),
            Some((Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.5)))
        );

        let ball = drag.release().unwrap();
        assert_eq!(ball.pos, Vec2::new(2.0, 0.5));
        assert!((ball.vel - Vec2::new(-1.0, 0.5) * BALL_SPEED_SCALE).length() < 1e-7);
        assert!(drag.is_idle());
    }

    #[test]
    fn test_second_press_keeps_anchor() {
        let mut drag = DragState::Idle;
        drag.press(Vec2::ZERO);
        assert!(!drag.press(Vec2::ONE));
        assert_eq!(drag.line(), Some((Vec2::ZERO, Vec2::ZERO)));
    }

    #[test]
    fn test_idle_ignores_move_and_release() {
        let mut drag = DragState::Idle;
        drag.move_to(Vec2::ONE);
        assert!(drag.is_idle());
        assert!(drag.release().is_none());
    }

    #[test]
    fn test_release_in_place_is_stationary() {
        let mut drag = DragState::Idle;
        drag.press(Vec2::new(3.0, 2.0));
        let ball = drag.release().unwrap();
        assert_eq!(ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_drag_outside_arena_allowed() {
        let mut drag = DragState::Idle;
        drag.press(Vec2::new(-4.0, 9.0));
        drag.move_to(Vec2::new(-10.0, -10.0));
        assert_eq!(
            drag.line(),
            Some((Vec2::new(-4.0, 9.0), Vec2::new(-10.0, -10.0)))
        );
    }
}
