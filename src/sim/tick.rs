//! Per-frame simulation step
//!
//! Order within a frame: apply queued input events, move paddles (Playing or
//! Lost), move balls (Playing only). Rendering happens after `tick` returns.

use super::collision::{exit_side, paddle_contact, reflect_off_walls};
use super::input::{InputEvent, TickInput};
use super::state::{Ball, GameEvent, GamePhase, GameState, Side};
use crate::consts::BALL_RADIUS;

/// Advance the game by `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    for event in &input.events {
        apply_event(state, *event, &mut events);
    }

    if state.phase.paddles_move() {
        let held = input.held;
        state.left.drive(held.left.up, held.left.down, dt);
        state.right.drive(held.right.up, held.right.down, dt);
    }

    if state.phase.balls_move() {
        if let Some(side) = update_balls(state, dt) {
            lose(state, side, &mut events);
        }
    }

    events
}

fn apply_event(state: &mut GameState, event: InputEvent, events: &mut Vec<GameEvent>) {
    match event {
        InputEvent::PlayPauseToggle => events.extend(toggle_pause(state)),
        InputEvent::PointerPressed(pixel) => {
            let at = state.view.to_world(pixel);
            state.drag.press(at);
        }
        InputEvent::PointerMoved(pixel) => {
            let at = state.view.to_world(pixel);
            state.drag.move_to(at);
        }
        // The ball launches from the last drag point, not the release point
        InputEvent::PointerReleased(_) => {
            if let Some(ball) = state.drag.release() {
                launch(state, ball, events);
            }
        }
        InputEvent::Resized { width, height } => state.resize(width, height),
    }
}

/// Playing <-> Paused. Lost ignores the toggle.
pub fn toggle_pause(state: &mut GameState) -> Option<GameEvent> {
    let (phase, event) = match state.phase {
        GamePhase::Playing => (GamePhase::Paused, GameEvent::Paused),
        GamePhase::Paused => (GamePhase::Playing, GameEvent::Resumed),
        GamePhase::Lost => return None,
    };
    set_phase(state, phase);
    Some(event)
}

/// Put a launched ball into play; the game always resumes Playing
pub fn launch(state: &mut GameState, ball: Ball, events: &mut Vec<GameEvent>) {
    log::info!("Ball launched at {} with velocity {}", ball.pos, ball.vel);
    state.balls.push(ball);
    events.push(GameEvent::BallLaunched {
        pos: ball.pos,
        vel: ball.vel,
    });

    match state.phase {
        GamePhase::Lost => events.push(GameEvent::Restarted),
        GamePhase::Paused => events.push(GameEvent::Resumed),
        GamePhase::Playing => {}
    }
    set_phase(state, GamePhase::Playing);
}

/// Playing -> Lost: every ball leaves play
fn lose(state: &mut GameState, side: Side, events: &mut Vec<GameEvent>) {
    log::info!("Ball lost past the {:?} edge", side);
    state.balls.clear();
    set_phase(state, GamePhase::Lost);
    events.push(GameEvent::BallLost { side });
}

fn set_phase(state: &mut GameState, phase: GamePhase) {
    if state.phase != phase {
        log::info!("{:?} -> {:?}", state.phase, phase);
        state.phase = phase;
    }
}

/// Integrate, bounce and collide every ball.
///
/// Returns the side of the first ball to leave the arena; the balls after
/// it are left untouched this frame.
fn update_balls(state: &mut GameState, dt: f32) -> Option<Side> {
    let GameState {
        balls, left, right, ..
    } = state;

    for ball in balls.iter_mut() {
        ball.pos += ball.vel * dt;

        if let Some(side) = exit_side(ball, BALL_RADIUS) {
            return Some(side);
        }

        reflect_off_walls(ball, BALL_RADIUS);

        if paddle_contact(left, ball, BALL_RADIUS).is_some()
            || paddle_contact(right, ball, BALL_RADIUS).is_some()
        {
            ball.vel.x = -ball.vel.x;
        }
    }

    None
}
