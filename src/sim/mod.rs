//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Time is passed in explicitly, in milliseconds
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod drag;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::{Contact, exit_side, paddle_contact, reflect_off_walls};
pub use drag::DragState;
pub use input::{HeldControls, InputEvent, PaddleControls, TickInput};
pub use state::{Ball, GameEvent, GamePhase, GameState, Paddle, Side, View};
pub use tick::{launch, tick, toggle_pause};
