//! A single board cell.

use serde::{Deserialize, Serialize};

use crate::item::ItemId;

/// One square of the floor.
///
/// `adjacent_traps` is only meaningful for non-trap cells, and a revealed
/// cell is never flagged; both invariants are maintained by the numbering
/// and reveal passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Stepping here unshielded ends the run.
    pub is_trap: bool,

    /// Visible to the player.
    pub is_revealed: bool,

    /// Player annotation on a hidden cell; blocks movement.
    pub is_flagged: bool,

    /// Trap count among the 8 neighbors (0..=8).
    pub adjacent_traps: u8,

    /// Pickup waiting on this cell, if any.
    pub item: Option<ItemId>,
}

impl Cell {
    pub fn has_item(&self) -> bool {
        self.item.is_some()
    }
}
