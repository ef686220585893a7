//! Read-only projections handed to the rendering layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Pos};
use crate::item::ItemId;
use crate::session::Phase;

/// One-shot visual effect for the renderer to play and clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiEffect {
    FlashRed,
}

/// Revelation rate recorded when a floor was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorRecord {
    pub floor: u32,
    pub rate: f64,
}

/// End-of-run summary, computed once when the run ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub floor_revelation_rates: Vec<FloorRecord>,
    pub final_floor_number: u32,
    /// Item id -> copies held at the end.
    pub final_items: HashMap<ItemId, u32>,
}

/// The raw renderable state. Everything is borrowed: the caller reads, the
/// session keeps ownership.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DisplayState<'a> {
    pub grid: &'a Grid,
    pub player: Pos,
    pub items: &'a [ItemId],
    pub exit: Pos,
    pub floor_number: u32,
    pub turn: u32,
    pub phase: Phase,
    pub current_item_choices: &'a [ItemId],
    pub exit_revealed_this_floor: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DisplaySnapshot<'a> {
    pub display: DisplayState<'a>,
    /// Composed input hint line ("Move (w/a/s/d) | Use Item (...) > ").
    pub prompt: String,
    /// Phase banner, empty while simply playing.
    pub message: &'static str,
    /// Feedback from the last action, until the caller clears it.
    pub last_action_message: Option<&'a str>,
    pub ui_effect: Option<UiEffect>,
    pub phase: Phase,
    pub new_item_acquired: Option<ItemId>,
    /// Present only once the run has ended.
    pub result: Option<&'a GameResult>,
}

/// What one call to `handle_input` asks of the caller.
#[derive(Debug)]
pub enum TurnResult<'a> {
    /// Render this and keep feeding input.
    Snapshot(DisplaySnapshot<'a>),
    /// A reward was (or wasn't) picked: wait a beat, then call
    /// `advance_floor`.
    NextFloorAfterDelay,
}
