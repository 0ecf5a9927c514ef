//! Driver-neutral input for a single frame
//!
//! The platform layer translates window-system events into these; the
//! simulation never sees key codes or window handles.

use glam::Vec2;

/// Held directional controls for one paddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleControls {
    pub up: bool,
    pub down: bool,
}

/// Held controls for both paddles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldControls {
    pub left: PaddleControls,
    pub right: PaddleControls,
}

/// Discrete events queued since the previous frame.
///
/// Pointer positions are framebuffer pixels with a bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PlayPauseToggle,
    PointerPressed(Vec2),
    PointerMoved(Vec2),
    PointerReleased(Vec2),
    Resized { width: u32, height: u32 },
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub held: HeldControls,
    /// Applied in order before anything moves
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn with_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            held: HeldControls::default(),
            events: events.into_iter().collect(),
        }
    }
}
