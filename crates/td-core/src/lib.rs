//! td-core: Core game logic for trapdelve
//!
//! Trapdelve is a turn-based grid crawler: every floor is a hidden
//! minesweeper-style board with a concealed exit, and the player feels the
//! way across it one step at a time, helped by consumable items that reveal,
//! remove, or reshuffle traps. This crate contains all game logic with no
//! I/O dependencies; the terminal front end lives in `td-tui`.
//!
//! The aggregate entry point is [`Session`]: create one, call
//! [`Session::setup_floor`] to generate the current floor, then feed it one
//! input at a time through [`Session::handle_input`] and render the
//! snapshot it hands back.

pub mod config;
pub mod floor;
pub mod grid;
pub mod item;
pub mod session;
pub mod snapshot;

mod rng;

pub use config::{ConfigError, GameConfig};
pub use floor::GenerationStatus;
pub use item::{EffectOutcome, ItemId};
pub use rng::GameRng;
pub use session::{Direction, Phase, Player, Session};
pub use snapshot::{
    DisplaySnapshot, DisplayState, FloorRecord, GameResult, TurnResult, UiEffect,
};
