//! Presentation settings
//!
//! Read once at startup from the `FLICK_PONG_SETTINGS` environment variable
//! (inline JSON). Gameplay rules are fixed and not part of this.

use serde::{Deserialize, Serialize};

use crate::consts::{BALL_SEGMENTS, MAX_BALL_SEGMENTS, MIN_BALL_SEGMENTS};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Open borderless fullscreen instead of windowed
    pub start_fullscreen: bool,
    /// Vertex count of the ball polygon
    pub ball_segments: u32,
    /// Wait for vertical blank when presenting
    pub vsync: bool,
    /// Fixed seed for the opening serve; random when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_fullscreen: false,
            ball_segments: BALL_SEGMENTS,
            vsync: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Environment variable holding the JSON settings
    pub const ENV_VAR: &'static str = "FLICK_PONG_SETTINGS";

    /// Load from the environment, falling back to defaults
    pub fn load() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(json) => Self::from_json(&json),
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Invalid input yields the defaults.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", Self::ENV_VAR);
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring invalid {}: {}", Self::ENV_VAR, e);
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        let clamped = self
            .ball_segments
            .clamp(MIN_BALL_SEGMENTS, MAX_BALL_SEGMENTS);
        if clamped != self.ball_segments {
            log::warn!(
                "ball_segments {} out of range, using {}",
                self.ball_segments,
                clamped
            );
            self.ball_segments = clamped;
        }
        self
    }

    /// Configured seed, or a fresh random one
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
