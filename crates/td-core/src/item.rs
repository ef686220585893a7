//! The item catalog and effect dispatch.
//!
//! Items are a closed enum; each variant carries its static metadata
//! (activation key, floor window, display text) and its effect, dispatched
//! through one `match` in [`apply`]. An effect mutates the session and
//! reports whether the item was spent; deferred items (jump, recon) only
//! switch the session's phase and are spent later, when the follow-up
//! direction is confirmed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::grid::numbering::renumber;
use crate::grid::reveal::{reveal_block, reveal_from, reveal_line};
use crate::grid::Pos;
use crate::session::{Phase, Session};

/// Every item in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemId {
    RevealOneTrap,
    TrapShield,
    ReduceTraps,
    RevealExit,
    LongJump,
    ReconDrone,
    AriadnesThread,
    DetailedMapOfExit,
    PhilosophersStone,
    ScrollOfChaos,
}

/// What an effect did with the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectOutcome {
    /// Remove one copy from the inventory and charge a turn.
    pub consumed: bool,
    /// Feedback for the action line, if any.
    pub message: Option<&'static str>,
}

impl EffectOutcome {
    fn consumed() -> Self {
        Self {
            consumed: true,
            message: None,
        }
    }

    /// Not spent: the item either refused (with a reason) or deferred its
    /// consumption to a follow-up phase.
    fn kept(message: Option<&'static str>) -> Self {
        Self {
            consumed: false,
            message,
        }
    }
}

impl ItemId {
    /// Activation key, or `None` for passive items.
    pub fn key(self) -> Option<char> {
        match self {
            ItemId::RevealOneTrap => Some('r'),
            ItemId::TrapShield => None,
            ItemId::ReduceTraps => Some('t'),
            ItemId::RevealExit => Some('e'),
            ItemId::LongJump => Some('j'),
            ItemId::ReconDrone => Some('c'),
            ItemId::AriadnesThread => Some('g'),
            ItemId::DetailedMapOfExit => Some('x'),
            ItemId::PhilosophersStone => Some('p'),
            ItemId::ScrollOfChaos => Some('k'),
        }
    }

    /// First floor this item can appear on.
    pub fn min_floor(self) -> u32 {
        match self {
            ItemId::RevealOneTrap
            | ItemId::TrapShield
            | ItemId::ReduceTraps
            | ItemId::RevealExit
            | ItemId::LongJump => 1,
            ItemId::ReconDrone | ItemId::AriadnesThread | ItemId::DetailedMapOfExit => 5,
            ItemId::PhilosophersStone | ItemId::ScrollOfChaos => 10,
        }
    }

    /// Last floor this item can appear on, if bounded.
    pub fn max_floor(self) -> Option<u32> {
        match self {
            ItemId::ReduceTraps => Some(10),
            ItemId::RevealExit => Some(8),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ItemId::RevealOneTrap => "Scroll of Clairvoyance",
            ItemId::TrapShield => "Iron Heart",
            ItemId::ReduceTraps => "Demolition Manual",
            ItemId::RevealExit => "Exit Map",
            ItemId::LongJump => "Leaping Boots",
            ItemId::ReconDrone => "Recon Drone",
            ItemId::AriadnesThread => "Ariadne's Thread",
            ItemId::DetailedMapOfExit => "Detailed Exit Map",
            ItemId::PhilosophersStone => "Philosopher's Stone",
            ItemId::ScrollOfChaos => "Scroll of Chaos",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ItemId::RevealOneTrap => "Exposes every trap in the 8 squares around you.",
            ItemId::TrapShield => "Takes the hit for you, once. (passive)",
            ItemId::ReduceTraps => "Dismantles a random trap next to you.",
            ItemId::RevealExit => "Marks this floor's exit on the map.",
            ItemId::LongJump => "Leap over one square in a chosen direction.",
            ItemId::ReconDrone => {
                "Flies in a straight line, opening the path until it meets a trap."
            }
            ItemId::AriadnesThread => "Traces the straight line from you to the exit.",
            ItemId::DetailedMapOfExit => "Marks the exit and opens the squares around it.",
            ItemId::PhilosophersStone => "Opens the whole 5x5 area around you.",
            ItemId::ScrollOfChaos => "Reshuffles every trap still hidden and unflagged.",
        }
    }

    /// Passive items have no activation key; the turn resolver consults
    /// them directly.
    pub fn is_passive(self) -> bool {
        self.key().is_none()
    }

    pub fn available_on(self, floor: u32) -> bool {
        floor >= self.min_floor() && self.max_floor().is_none_or(|max| floor <= max)
    }

    /// The item bound to `key`, if any.
    pub fn from_key(key: char) -> Option<ItemId> {
        ItemId::iter().find(|item| item.key() == Some(key))
    }

    /// Everything obtainable on `floor`, passives included.
    pub fn catalog_for_floor(floor: u32) -> Vec<ItemId> {
        ItemId::iter().filter(|item| item.available_on(floor)).collect()
    }

    /// Everything that can lie on a `floor` cell: passives never spawn on
    /// the ground.
    pub fn placeable_for_floor(floor: u32) -> Vec<ItemId> {
        ItemId::iter()
            .filter(|item| item.available_on(floor) && !item.is_passive())
            .collect()
    }
}

/// Run `item`'s effect against the session.
///
/// The caller owns inventory bookkeeping: on `consumed` it removes one copy
/// and charges the turn.
pub(crate) fn apply(session: &mut Session, item: ItemId) -> EffectOutcome {
    match item {
        ItemId::RevealOneTrap => reveal_one_trap(session),
        ItemId::ReduceTraps => reduce_traps(session),
        ItemId::RevealExit => reveal_exit(session),
        ItemId::LongJump => {
            session.phase = Phase::JumpingDirection;
            EffectOutcome::kept(None)
        }
        ItemId::ReconDrone => {
            session.phase = Phase::ReconDirection;
            EffectOutcome::kept(None)
        }
        ItemId::AriadnesThread => {
            let (player, exit) = (session.player.pos, session.exit);
            reveal_line(&mut session.grid, player, exit);
            EffectOutcome::consumed()
        }
        ItemId::DetailedMapOfExit => detailed_map_of_exit(session),
        ItemId::PhilosophersStone => {
            let player = session.player.pos;
            reveal_block(&mut session.grid, player, 2);
            EffectOutcome::consumed()
        }
        ItemId::ScrollOfChaos => scroll_of_chaos(session),
        // Passive: no activation path; the turn resolver spends it.
        ItemId::TrapShield => EffectOutcome::kept(None),
    }
}

/// Traps next to the player are revealed and flagged as evidence; safe
/// neighbors cascade open.
fn reveal_one_trap(session: &mut Session) -> EffectOutcome {
    for neighbor in session.grid.neighbors8(session.player.pos) {
        if session.grid.cell(neighbor).is_trap {
            let cell = session.grid.cell_mut(neighbor);
            cell.is_revealed = true;
            cell.is_flagged = true;
        } else {
            reveal_from(&mut session.grid, neighbor);
        }
    }
    EffectOutcome::consumed()
}

/// Clears one random adjacent trap. Spent even when there was nothing to
/// dismantle.
fn reduce_traps(session: &mut Session) -> EffectOutcome {
    let traps: Vec<Pos> = session
        .grid
        .neighbors8(session.player.pos)
        .into_iter()
        .filter(|&n| session.grid.cell(n).is_trap)
        .collect();

    if let Some(&target) = session.rng.choose(&traps) {
        let cell = session.grid.cell_mut(target);
        cell.is_trap = false;
        cell.is_flagged = false;
        renumber(&mut session.grid);
    }
    EffectOutcome::consumed()
}

fn reveal_exit(session: &mut Session) -> EffectOutcome {
    if session.exit_revealed_this_floor {
        EffectOutcome::kept(Some("The exit's location is already known."))
    } else {
        session.exit_revealed_this_floor = true;
        EffectOutcome::consumed()
    }
}

/// Opens the exit and its whole neighborhood; refuses when there is nothing
/// left to show.
fn detailed_map_of_exit(session: &mut Session) -> EffectOutcome {
    let mut targets = session.grid.neighbors8(session.exit);
    targets.push(session.exit);

    let any_hidden = targets
        .iter()
        .any(|&pos| !session.grid.cell(pos).is_revealed);
    if !any_hidden {
        return EffectOutcome::kept(Some("The exit and its surroundings are already revealed."));
    }

    session.exit_revealed_this_floor = true;
    for pos in targets {
        reveal_from(&mut session.grid, pos);
    }
    EffectOutcome::consumed()
}

/// Reshuffles the traps among cells that are still hidden and unflagged,
/// leaving the exit, every item cell, and their neighborhoods untouched.
/// The total trap count never changes.
fn scroll_of_chaos(session: &mut Session) -> EffectOutcome {
    let grid = &mut session.grid;

    let protected: Vec<Pos> = grid
        .positions()
        .filter(|&pos| pos == session.exit || grid.cell(pos).has_item())
        .collect();
    let mut forbidden: HashSet<Pos> = HashSet::new();
    for pos in protected {
        forbidden.insert(pos);
        forbidden.extend(grid.neighbors8(pos));
    }

    let mut zone: Vec<Pos> = grid
        .positions()
        .filter(|&pos| {
            let cell = grid.cell(pos);
            !cell.is_revealed && !cell.is_flagged && !forbidden.contains(&pos)
        })
        .collect();

    let mut trap_count = 0;
    for &pos in &zone {
        let cell = grid.cell_mut(pos);
        if cell.is_trap {
            trap_count += 1;
            cell.is_trap = false;
        }
    }

    session.rng.shuffle(&mut zone);
    for &pos in zone.iter().take(trap_count) {
        grid.cell_mut(pos).is_trap = true;
    }

    renumber(grid);
    EffectOutcome::consumed()
}
