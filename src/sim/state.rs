//! Game state and core simulation types
//!
//! A single `GameState` owns every mutable piece of a session: paddles,
//! balls, the in-progress drag, the current phase and the view (framebuffer
//! size and projection bounds).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::drag::DragState;
use crate::colors::{self, Color};
use crate::consts::*;
use crate::geometry::{Framebuffer, Projection, window_to_world};

/// Which end of the arena a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Balls and paddles move
    Playing,
    /// Nothing moves
    Paused,
    /// A ball got past a paddle; paddles still move, balls are gone
    Lost,
}

impl GamePhase {
    /// Background clear colour shown while in this phase
    pub const fn clear_color(self) -> Color {
        match self {
            GamePhase::Playing => colors::BLACK,
            GamePhase::Paused => colors::ORANGE,
            GamePhase::Lost => colors::RED,
        }
    }

    pub const fn paddles_move(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Lost)
    }

    pub const fn balls_move(self) -> bool {
        matches!(self, GamePhase::Playing)
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Paused,
    Resumed,
    /// A ball fully left the arena past `side`'s edge
    BallLost { side: Side },
    /// A drag was released and became a ball
    BallLaunched { pos: Vec2, vel: Vec2 },
    /// Lost -> Playing after a launch
    Restarted,
}

/// A paddle; only its vertical position changes
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    side: Side,
    /// Bottom edge in world units
    pub y: f32,
}

impl Paddle {
    pub fn new(side: Side) -> Self {
        Self { side, y: 0.0 }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Left edge in world units
    pub fn x(&self) -> f32 {
        match self.side {
            Side::Left => 0.0,
            Side::Right => SCREEN_WIDTH - PADDLE_WIDTH,
        }
    }

    /// X of the edge that faces the arena
    pub fn edge_x(&self) -> f32 {
        match self.side {
            Side::Left => PADDLE_WIDTH,
            Side::Right => SCREEN_WIDTH - PADDLE_WIDTH,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + PADDLE_HEIGHT
    }

    /// Move by held input for `dt` milliseconds, clamped to the arena
    pub fn drive(&mut self, up: bool, down: bool, dt: f32) {
        if up {
            self.y += dt * PADDLE_SPEED;
        }
        if down {
            self.y -= dt * PADDLE_SPEED;
        }
        self.y = self.y.clamp(0.0, SCREEN_HEIGHT - PADDLE_HEIGHT);
    }
}

/// A ball in play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    /// World units per millisecond
    pub vel: Vec2,
}

impl Ball {
    pub const fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Centered ball with a random horizontal serve
    pub fn serve(rng: &mut impl Rng) -> Self {
        let mut vx = rng.random_range(SERVE_VX_MIN..SERVE_VX_MAX);
        if rng.random_bool(0.5) {
            vx = -vx;
        }
        let vy = rng.random_range(-SERVE_VY..SERVE_VY);
        Self::new(
            Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
            Vec2::new(vx, vy),
        )
    }
}

/// Framebuffer size plus the projection derived from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub framebuffer: Framebuffer,
    pub projection: Projection,
}

impl View {
    pub fn new(framebuffer: Framebuffer) -> Self {
        Self {
            framebuffer,
            projection: Projection::for_framebuffer(framebuffer),
        }
    }

    /// Pixel position (bottom-left origin) to world units
    pub fn to_world(&self, pixel: Vec2) -> Vec2 {
        window_to_world(self.framebuffer, &self.projection, pixel)
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(Framebuffer::new(WINDOW_WIDTH, WINDOW_HEIGHT))
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the opening serve was drawn from
    pub seed: u64,
    pub phase: GamePhase,
    pub left: Paddle,
    pub right: Paddle,
    pub balls: Vec<Ball>,
    pub drag: DragState,
    pub view: View,
}

impl GameState {
    /// New session: Playing, paddles at the bottom, one served ball
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        Self {
            seed,
            phase: GamePhase::Playing,
            left: Paddle::new(Side::Left),
            right: Paddle::new(Side::Right),
            balls: vec![Ball::serve(&mut rng)],
            drag: DragState::Idle,
            view: View::default(),
        }
    }

    /// Session with no balls in play, for scripted scenarios
    pub fn empty() -> Self {
        Self {
            balls: Vec::new(),
            ..Self::new(0)
        }
    }

    pub fn clear_color(&self) -> Color {
        self.phase.clear_color()
    }

    /// Recompute the view for a new framebuffer size.
    ///
    /// Zero-sized framebuffers (minimized windows) are ignored so pointer
    /// mapping never divides by zero.
    pub fn resize(&mut self, width: u32, height: u32) {
        let framebuffer = Framebuffer::new(width, height);
        if framebuffer.is_empty() {
            log::debug!("Ignoring empty framebuffer {}x{}", width, height);
            return;
        }
        self.view = View::new(framebuffer);
        log::debug!(
            "Resized to {}x{}, projection {:?}",
            width,
            height,
            self.view.projection
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_session() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.left.y, 0.0);
        assert_eq!(state.right.y, 0.0);
        assert!(state.drag.is_idle());

        let ball = state.balls[0];
        assert_eq!(ball.pos, Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0));
        assert!(ball.vel.x.abs() >= SERVE_VX_MIN && ball.vel.x.abs() < SERVE_VX_MAX);
        assert!(ball.vel.y >= -SERVE_VY && ball.vel.y < SERVE_VY);
    }

    #[test]
    fn test_serve_is_seeded() {
        assert_eq!(GameState::new(42).balls, GameState::new(42).balls);
    }

    #[test]
    fn test_serve_goes_both_ways() {
        let mut rng = Pcg32::seed_from_u64(1);
        let serves: Vec<Ball> = (0..64).map(|_| Ball::serve(&mut rng)).collect();
        assert!(serves.iter().any(|b| b.vel.x > 0.0));
        assert!(serves.iter().any(|b| b.vel.x < 0.0));
    }

    #[test]
    fn test_paddle_x_from_side() {
        assert_eq!(Paddle::new(Side::Left).x(), 0.0);
        assert_eq!(Paddle::new(Side::Right).x(), SCREEN_WIDTH - PADDLE_WIDTH);
        assert_eq!(Paddle::new(Side::Left).edge_x(), PADDLE_WIDTH);
    }

    #[test]
    fn test_paddle_opposing_input_cancels() {
        let mut paddle = Paddle::new(Side::Left);
        paddle.y = 1.0;
        paddle.drive(true, true, 16.0);
        assert!((paddle.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_phase_colors() {
        assert_eq!(GamePhase::Playing.clear_color(), colors::BLACK);
        assert_eq!(GamePhase::Paused.clear_color(), colors::ORANGE);
        assert_eq!(GamePhase::Lost.clear_color(), colors::RED);
    }

    #[test]
    fn test_resize_ignores_empty() {
        let mut state = GameState::empty();
        state.resize(800, 800);
        let before = state.view;
        state.resize(0, 0);
        assert_eq!(state.view, before);
    }

    proptest! {
        #[test]
        fn paddle_stays_in_arena(
            start in 0.0f32..(SCREEN_HEIGHT - PADDLE_HEIGHT),
            steps in proptest::collection::vec((any::<bool>(), any::<bool>(), 0.0f32..10_000.0), 1..32),
        ) {
            let mut paddle = Paddle::new(Side::Right);
            paddle.y = start;
            for (up, down, dt) in steps {
                paddle.drive(up, down, dt);
                prop_assert!(paddle.y >= 0.0);
                prop_assert!(paddle.y <= SCREEN_HEIGHT - PADDLE_HEIGHT);
            }
        }
    }
}
