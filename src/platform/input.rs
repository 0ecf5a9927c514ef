//! Keyboard and pointer mapping
//!
//! Collects winit input between frames into a `TickInput`. Held keys are
//! tracked continuously; discrete actions fire on key release.

use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::sim::{HeldControls, InputEvent, PaddleControls, Side, TickInput};

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    PaddleUp(Side),
    PaddleDown(Side),
    PlayPause,
    Fullscreen,
    Quit,
}

/// Window-level requests the simulation does not handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    ToggleFullscreen,
    Quit,
}

pub fn key_action(code: KeyCode) -> Option<KeyAction> {
    let action = match code {
        KeyCode::KeyW => KeyAction::PaddleUp(Side::Left),
        KeyCode::KeyS => KeyAction::PaddleDown(Side::Left),
        KeyCode::ArrowUp => KeyAction::PaddleUp(Side::Right),
        KeyCode::ArrowDown => KeyAction::PaddleDown(Side::Right),
        KeyCode::Space => KeyAction::PlayPause,
        KeyCode::F5 => KeyAction::Fullscreen,
        KeyCode::Escape => KeyAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Input accumulated since the last frame
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    held: HeldControls,
    events: Vec<InputEvent>,
    /// Last pointer position, bottom-left origin
    cursor: Option<Vec2>,
    framebuffer_height: u32,
}

impl InputTracker {
    pub fn new(framebuffer_height: u32) -> Self {
        Self {
            framebuffer_height,
            ..Default::default()
        }
    }

    pub fn key(&mut self, code: KeyCode, pressed: bool) -> Option<WindowCommand> {
        let action = key_action(code)?;
        match action {
            KeyAction::PaddleUp(side) => self.controls(side).up = pressed,
            KeyAction::PaddleDown(side) => self.controls(side).down = pressed,
            KeyAction::PlayPause if !pressed => self.events.push(InputEvent::PlayPauseToggle),
            KeyAction::Fullscreen if !pressed => return Some(WindowCommand::ToggleFullscreen),
            KeyAction::Quit if !pressed => return Some(WindowCommand::Quit),
            _ => {}
        }
        None
    }

    fn controls(&mut self, side: Side) -> &mut PaddleControls {
        match side {
            Side::Left => &mut self.held.left,
            Side::Right => &mut self.held.right,
        }
    }

    /// Pointer moved to `(x, y)` framebuffer pixels, top-left origin
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        let at = Vec2::new(x, self.framebuffer_height as f32 - y);
        self.cursor = Some(at);
        self.events.push(InputEvent::PointerMoved(at));
    }

    /// Primary button edge at the last known pointer position
    pub fn primary_button(&mut self, pressed: bool) {
        let Some(at) = self.cursor else {
            return;
        };
        self.events.push(if pressed {
            InputEvent::PointerPressed(at)
        } else {
            InputEvent::PointerReleased(at)
        });
    }

    pub fn resized(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.framebuffer_height = height;
        self.events.push(InputEvent::Resized { width, height });
    }

    /// Input for the next tick; queued events are drained
    pub fn take(&mut self) -> TickInput {
        TickInput {
            held: self.held,
            events: std::mem::take(&mut self.events),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_persist_across_frames() {
        let mut input = InputTracker::new(600);
        input.key(KeyCode::KeyW, true);
        input.key(KeyCode::ArrowDown, true);

        let frame = input.take();
        assert!(frame.held.left.up);
        assert!(frame.held.right.down);
        assert!(input.take().held.left.up);

        input.key(KeyCode::KeyW, false);
        assert!(!input.take().held.left.up);
    }

    #[test]
    fn test_actions_fire_on_release() {
        let mut input = InputTracker::new(600);
        assert_eq!(input.key(KeyCode::Space, true), None);
        assert!(input.take().events.is_empty());
        assert_eq!(input.key(KeyCode::Space, false), None);
        assert_eq!(input.take().events, vec![InputEvent::PlayPauseToggle]);

        assert_eq!(input.key(KeyCode::F5, true), None);
        assert_eq!(
            input.key(KeyCode::F5, false),
            Some(WindowCommand::ToggleFullscreen)
        );
        assert_eq!(input.key(KeyCode::Escape, false), Some(WindowCommand::Quit));
        assert_eq!(input.key(KeyCode::KeyQ, false), None);
    }

    #[test]
    fn test_pointer_y_flipped() {
        let mut input = InputTracker::new(600);
        input.cursor_moved(100.0, 150.0);
        input.primary_button(true);
        input.primary_button(false);
        let at = Vec2::new(100.0, 450.0);
        assert_eq!(
            input.take().events,
            vec![
                InputEvent::PointerMoved(at),
                InputEvent::PointerPressed(at),
                InputEvent::PointerReleased(at),
            ]
        );
    }

    #[test]
    fn test_button_without_cursor_ignored() {
        let mut input = InputTracker::new(600);
        input.primary_button(true);
        assert!(input.take().events.is_empty());
    }

    #[test]
    fn test_resize_updates_flip() {
        let mut input = InputTracker::new(600);
        input.resized(0, 0);
        assert!(input.take().events.is_empty());

        input.resized(800, 800);
        input.cursor_moved(0.0, 0.0);
        assert_eq!(
            input.take().events,
            vec![
                InputEvent::Resized {
                    width: 800,
                    height: 800
                },
                InputEvent::PointerMoved(Vec2::new(0.0, 800.0)),
            ]
        );
    }
}
