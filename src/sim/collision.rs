//! Collision detection and response for the rectangular arena
//!
//! Balls bounce off the top and bottom walls, bounce off the facing edge of
//! a paddle (including its rounded corners), and leave play through the left
//! and right ends.

use glam::Vec2;

use super::state::{Ball, Paddle, Side};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// How a ball touched a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Within the paddle's vertical span, touching its facing edge
    Edge,
    /// Within one radius of the bottom end of the facing edge
    BottomCorner,
    /// Within one radius of the top end of the facing edge
    TopCorner,
}

/// The end a ball has fully left through, if any
pub fn exit_side(ball: &Ball, radius: f32) -> Option<Side> {
    if ball.pos.x + radius < 0.0 {
        Some(Side::Left)
    } else if ball.pos.x - radius > SCREEN_WIDTH {
        Some(Side::Right)
    } else {
        None
    }
}

/// Reflect off the top or bottom wall. At most one reflection per call.
///
/// Only a ball moving toward a wall is reflected, so a ball still overlapping
/// after a bounce is not flipped back.
pub fn reflect_off_walls(ball: &mut Ball, radius: f32) -> bool {
    let hit = (ball.vel.y > 0.0 && ball.pos.y + radius > SCREEN_HEIGHT)
        || (ball.vel.y < 0.0 && ball.pos.y - radius < 0.0);
    if hit {
        ball.vel.y = -ball.vel.y;
    }
    hit
}

/// Check a ball against a paddle's facing edge.
///
/// Balls moving away from the paddle never collide. Boundaries are
/// inclusive; corner tests compare squared distances.
pub fn paddle_contact(paddle: &Paddle, ball: &Ball, radius: f32) -> Option<Contact> {
    let moving_away = match paddle.side() {
        Side::Left => ball.vel.x > 0.0,
        Side::Right => ball.vel.x < 0.0,
    };
    if moving_away {
        return None;
    }

    let edge_x = paddle.edge_x();
    if ball.pos.y >= paddle.y && ball.pos.y <= paddle.top() {
        return ((ball.pos.x - edge_x).abs() <= radius).then_some(Contact::Edge);
    }

    let radius_sq = radius * radius;
    if ball.pos.distance_squared(Vec2::new(edge_x, paddle.y)) <= radius_sq {
        Some(Contact::BottomCorner)
    } else if ball.pos.distance_squared(Vec2::new(edge_x, paddle.top())) <= radius_sq {
        Some(Contact::TopCorner)
    } else {
        None
    }
}
