//! Flick Pong - two-player Pong with drag-to-launch balls
//!
//! Core modules:
//! - `geometry`: Projection matrices and window/world coordinate mapping
//! - `sim`: Paddles, balls, collisions and the Playing/Paused/Lost machine
//! - `renderer`: Shared shape buffer, backend contract and wgpu backend
//! - `platform`: winit window and event-loop driver
//! - `settings`: Presentation settings

pub mod geometry;
#[cfg(not(target_arch = "wasm32"))]
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Flat RGB colours
pub mod colors {
    pub type Color = [f32; 3];

    pub const BLACK: Color = [0.0, 0.0, 0.0];
    pub const WHITE: Color = [1.0, 1.0, 1.0];
    pub const GREY: Color = [0.5, 0.5, 0.5];
    pub const ORANGE: Color = [1.0, 0.55, 0.0];
    pub const RED: Color = [1.0, 0.0, 0.0];

    pub const PADDLE: Color = WHITE;
    pub const BALL: Color = WHITE;
    pub const BORDER: Color = GREY;
    pub const DRAG_LINE: Color = WHITE;
}

/// Game configuration constants
pub mod consts {
    /// Initial window size in logical pixels
    pub const WINDOW_WIDTH: u32 = 1000;
    pub const WINDOW_HEIGHT: u32 = 600;
    pub const WINDOW_TITLE: &str = "Flick Pong";

    /// Arena dimensions in world units
    pub const SCREEN_WIDTH: f32 = 5.0;
    pub const SCREEN_HEIGHT: f32 = 3.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 0.1;
    pub const PADDLE_HEIGHT: f32 = 1.0;
    /// World units per millisecond
    pub const PADDLE_SPEED: f32 = 0.005;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.1;
    /// Drag distance to launch velocity (world units/ms per world unit)
    pub const BALL_SPEED_SCALE: f32 = 0.005;
    /// Vertices in the ball fan
    pub const BALL_SEGMENTS: u32 = 16;
    /// Allowed ball fan sizes; indices into a shape are `u16`
    pub const MIN_BALL_SEGMENTS: u32 = 3;
    pub const MAX_BALL_SEGMENTS: u32 = 1024;

    /// Opening serve: |vx| in [MIN, MAX), vy in [-VY, VY)
    pub const SERVE_VX_MIN: f32 = 0.002;
    pub const SERVE_VX_MAX: f32 = 0.004;
    pub const SERVE_VY: f32 = 0.001;
}
