//! The game session: one mutable aggregate owning the grid, the player, and
//! the turn state machine.
//!
//! The host drives it with three calls: [`Session::setup_floor`] once per
//! floor, then [`Session::handle_input`] per key and [`Session::snapshot`]
//! per frame. There is exactly one actor and no concurrency; every entry
//! point runs to completion.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::config::{ConfigError, GameConfig};
use crate::floor::{self, GenerationStatus};
use crate::grid::numbering::renumber;
use crate::grid::reveal::{reveal_from, reveal_ray, toggle_flag};
use crate::grid::{Grid, Pos};
use crate::item::{self, ItemId};
use crate::rng::GameRng;
use crate::snapshot::{
    DisplaySnapshot, DisplayState, FloorRecord, GameResult, TurnResult, UiEffect,
};

/// Turn machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Accepting moves and item activations.
    Playing,
    /// Leaping Boots pending a direction.
    JumpingDirection,
    /// Recon Drone pending a direction.
    ReconDirection,
    /// Standing on the exit, waiting for "yes".
    ConfirmNextFloor,
    /// Picking a floor-clear reward.
    ChoosingItem,
    /// Terminal; input is ignored.
    GameOver,
}

/// A movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(key: char) -> Option<Direction> {
        match key {
            'w' => Some(Direction::Up),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// The player: a position and a multiset of items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    pub pos: Pos,
    pub items: Vec<ItemId>,
}

impl Player {
    pub fn has_item(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    /// Remove one copy of `item`; true if one was held.
    pub fn remove_item(&mut self, item: ItemId) -> bool {
        if let Some(index) = self.items.iter().position(|&held| held == item) {
            self.items.remove(index);
            true
        } else {
            false
        }
    }
}

/// One run of the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub config: GameConfig,
    pub rng: GameRng,
    pub grid: Grid,
    pub player: Player,
    pub exit: Pos,
    pub floor_number: u32,
    pub turn: u32,
    pub phase: Phase,
    pub exit_revealed_this_floor: bool,
    pub current_item_choices: Vec<ItemId>,
    pub floor_revelation_rates: Vec<FloorRecord>,
    pub last_action_message: Option<String>,
    pub ui_effect: Option<UiEffect>,
    pub just_acquired_item: Option<ItemId>,
    /// How the current floor's layout was accepted.
    pub generation: GenerationStatus,
    /// Computed once, at the transition into `GameOver`.
    pub result: Option<GameResult>,
}

impl Session {
    /// A fresh run with the default configuration and the given seed.
    pub fn new(seed: u64) -> Self {
        Self::from_parts(GameConfig::default(), GameRng::new(seed))
    }

    /// A fresh run with a random seed.
    pub fn from_entropy() -> Self {
        Self::from_parts(GameConfig::default(), GameRng::from_entropy())
    }

    /// A fresh run with a custom configuration.
    pub fn with_config(config: GameConfig, rng: GameRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, rng))
    }

    fn from_parts(config: GameConfig, rng: GameRng) -> Self {
        Self {
            config,
            rng,
            grid: Grid::new(0, 0),
            player: Player::default(),
            exit: Pos::new(0, 0),
            floor_number: 1,
            turn: 0,
            phase: Phase::Playing,
            exit_revealed_this_floor: false,
            current_item_choices: Vec::new(),
            floor_revelation_rates: Vec::new(),
            last_action_message: None,
            ui_effect: None,
            just_acquired_item: None,
            generation: GenerationStatus::Strict,
            result: None,
        }
    }

    /// (Re)generate the current floor in place and run the opening reveal.
    pub fn setup_floor(&mut self) {
        self.turn = 0;
        self.phase = Phase::Playing;
        self.exit_revealed_this_floor = false;
        self.current_item_choices.clear();

        if self.floor_number == 1 {
            self.floor_revelation_rates.clear();
            self.result = None;
            self.grant_starting_item();
        }

        let layout = floor::generate(self.floor_number, &self.config, &mut self.rng);
        self.grid = layout.grid;
        self.player.pos = layout.player;
        self.exit = layout.exit;
        self.generation = layout.status;

        reveal_from(&mut self.grid, self.player.pos);
    }

    /// Floor 1 starting kit: one random floor-eligible item the player does
    /// not already own (passives included).
    fn grant_starting_item(&mut self) {
        let pool: Vec<ItemId> = ItemId::catalog_for_floor(self.floor_number)
            .into_iter()
            .filter(|&item| !self.player.has_item(item))
            .collect();
        if let Some(&item) = self.rng.choose(&pool) {
            self.player.items.push(item);
        }
    }

    /// Advance one turn on one input. Unknown keys are ignored; in the
    /// direction-pending phases they cancel at no cost.
    pub fn handle_input(&mut self, key: &str) -> TurnResult<'_> {
        let key = key.trim().to_lowercase();
        let single = single_char(&key);

        match self.phase {
            Phase::ConfirmNextFloor => {
                if key == "yes" {
                    self.confirm_floor_clear();
                } else {
                    // Anything else backs out; the key is not reinterpreted.
                    self.phase = Phase::Playing;
                }
            }
            Phase::ChoosingItem => {
                if let Ok(index) = key.parse::<usize>() {
                    if index >= 1 && index <= self.current_item_choices.len() {
                        let chosen = self.current_item_choices[index - 1];
                        self.player.items.push(chosen);
                    }
                }
                return TurnResult::NextFloorAfterDelay;
            }
            Phase::JumpingDirection => self.resolve_jump(single.and_then(Direction::from_key)),
            Phase::ReconDirection => self.resolve_recon(single.and_then(Direction::from_key)),
            Phase::GameOver => {}
            Phase::Playing => self.play_key(single),
        }

        TurnResult::Snapshot(self.snapshot())
    }

    /// A key while playing: an owned item's activation key, a movement key,
    /// or nothing.
    fn play_key(&mut self, key: Option<char>) {
        let Some(key) = key else { return };

        if let Some(item) = ItemId::from_key(key) {
            if self.player.has_item(item) {
                let outcome = item::apply(self, item);
                if let Some(message) = outcome.message {
                    self.last_action_message = Some(message.to_string());
                }
                if outcome.consumed {
                    self.player.remove_item(item);
                    self.turn += 1;
                    self.process_player_location();
                }
                return;
            }
            // Key of an item the player does not hold: ignored.
            return;
        }

        if let Some(direction) = Direction::from_key(key) {
            let (dr, dc) = direction.delta();
            let dest = self.player.pos.offset(dr, dc);
            if !self.grid.in_bounds(dest) {
                return;
            }
            if self.grid.cell(dest).is_flagged {
                self.last_action_message = Some("A flagged square blocks the way.".to_string());
                return;
            }
            self.player.pos = dest;
            self.turn += 1;
            self.process_player_location();
        }
    }

    /// Confirmed jump: two cells in the chosen direction, consuming the
    /// boots. Out of bounds or a non-direction key cancels at no cost.
    fn resolve_jump(&mut self, direction: Option<Direction>) {
        self.phase = Phase::Playing;
        let Some(direction) = direction else { return };

        let (dr, dc) = direction.delta();
        let dest = self.player.pos.offset(dr * 2, dc * 2);
        if !self.grid.in_bounds(dest) {
            return;
        }

        self.player.remove_item(ItemId::LongJump);
        self.player.pos = dest;
        self.turn += 1;
        self.process_player_location();
    }

    /// Confirmed recon: the drone flies from the player, consuming itself.
    /// A non-direction key cancels at no cost.
    fn resolve_recon(&mut self, direction: Option<Direction>) {
        self.phase = Phase::Playing;
        let Some(direction) = direction else {
            self.last_action_message = Some("Recon drone cancelled.".to_string());
            return;
        };

        self.player.remove_item(ItemId::ReconDrone);
        reveal_ray(&mut self.grid, self.player.pos, direction.delta());
        self.turn += 1;
        self.process_player_location();
    }

    /// Post-move resolution: exit, then trap, then pickup, then reveal.
    fn process_player_location(&mut self) {
        let pos = self.player.pos;

        if pos == self.exit {
            self.phase = Phase::ConfirmNextFloor;
            return;
        }

        if self.grid.cell(pos).is_trap {
            if self.player.has_item(ItemId::TrapShield) {
                self.player.remove_item(ItemId::TrapShield);
                self.grid.cell_mut(pos).is_trap = false;
                renumber(&mut self.grid);
                reveal_from(&mut self.grid, pos);
                self.ui_effect = Some(UiEffect::FlashRed);
                self.last_action_message =
                    Some("The iron heart shatters in your place!".to_string());
            } else {
                let cell = self.grid.cell_mut(pos);
                cell.is_revealed = true;
                cell.is_flagged = false;
                self.phase = Phase::GameOver;
                self.last_action_message = Some("You stepped on a trap!".to_string());
                self.finalize_result();
            }
        }

        if let Some(item) = self.grid.cell(pos).item {
            self.player.items.push(item);
            self.grid.cell_mut(pos).item = None;
            self.just_acquired_item = Some(item);
        }

        if self.phase != Phase::GameOver {
            reveal_from(&mut self.grid, pos);
        }
    }

    /// "yes" on the exit: record this floor's rate, then either hand out a
    /// reward choice or advance straight away.
    fn confirm_floor_clear(&mut self) {
        let rate = self.revelation_rate();
        self.floor_revelation_rates.push(FloorRecord {
            floor: self.floor_number,
            rate,
        });

        if rate < self.config.revelation_threshold {
            self.last_action_message = Some(format!(
                "Revelation rate {:.0}% is below the {:.0}% bonus threshold; no reward this floor.",
                rate * 100.0,
                self.config.revelation_threshold * 100.0
            ));
            self.floor_number += 1;
            self.setup_floor();
        } else {
            self.phase = Phase::ChoosingItem;
            self.roll_item_choices();
        }
    }

    /// Distinct random reward options from the floor-eligible catalog.
    fn roll_item_choices(&mut self) {
        let pool = ItemId::catalog_for_floor(self.floor_number);
        let target = self.config.reward_choices.min(pool.len());

        let mut choices = Vec::with_capacity(target);
        while choices.len() < target {
            if let Some(&candidate) = self.rng.choose(&pool) {
                if !choices.contains(&candidate) {
                    choices.push(candidate);
                }
            }
        }
        self.current_item_choices = choices;
    }

    fn finalize_result(&mut self) {
        let mut final_items = std::collections::HashMap::new();
        for &item in &self.player.items {
            *final_items.entry(item).or_insert(0) += 1;
        }
        self.result = Some(GameResult {
            floor_revelation_rates: self.floor_revelation_rates.clone(),
            final_floor_number: self.floor_number,
            final_items,
        });
    }

    /// Next floor, after the caller's reward-screen delay.
    pub fn advance_floor(&mut self) {
        self.floor_number += 1;
        self.setup_floor();
    }

    /// UI annotation; never required to clear a floor.
    pub fn toggle_flag(&mut self, r: i32, c: i32) {
        toggle_flag(&mut self.grid, Pos::new(r, c));
    }

    /// Fraction of cells revealed, in `[0, 1]`.
    pub fn revelation_rate(&self) -> f64 {
        if self.grid.cell_count() == 0 {
            return 0.0;
        }
        self.grid.count_revealed() as f64 / self.grid.cell_count() as f64
    }

    /// The read-only projection of the current state.
    pub fn display_state(&self) -> DisplayState<'_> {
        DisplayState {
            grid: &self.grid,
            player: self.player.pos,
            items: &self.player.items,
            exit: self.exit,
            floor_number: self.floor_number,
            turn: self.turn,
            phase: self.phase,
            current_item_choices: &self.current_item_choices,
            exit_revealed_this_floor: self.exit_revealed_this_floor,
        }
    }

    /// The full renderable frame. Mutates nothing; the message/effect
    /// fields persist until the caller clears them.
    pub fn snapshot(&self) -> DisplaySnapshot<'_> {
        let message = match self.phase {
            Phase::Playing => "",
            Phase::JumpingDirection => "Jump direction (w/a/s/d):",
            Phase::ReconDirection => "Recon direction (w/a/s/d):",
            Phase::ConfirmNextFloor => "Advance to the next floor? (yes/no)",
            Phase::ChoosingItem => "Floor cleared! Choose your reward:",
            Phase::GameOver => "!!! GAME OVER !!!",
        };

        DisplaySnapshot {
            display: self.display_state(),
            prompt: self.prompt_line(),
            message,
            last_action_message: self.last_action_message.as_deref(),
            ui_effect: self.ui_effect,
            phase: self.phase,
            new_item_acquired: self.just_acquired_item,
            result: self.result.as_ref(),
        }
    }

    fn prompt_line(&self) -> String {
        let mut prompt = String::from("Move (w/a/s/d)");
        let actions: Vec<String> = self
            .player
            .items
            .iter()
            .filter_map(|item| item.key().map(|key| format!("{}: {}", key, item.name())))
            .collect();
        if !actions.is_empty() {
            prompt.push_str(&format!(" | Use Item ({})", actions.join(", ")));
        }
        prompt.push_str(" > ");
        prompt
    }

    pub fn clear_last_action_message(&mut self) {
        self.last_action_message = None;
    }

    pub fn clear_ui_effect(&mut self) {
        self.ui_effect = None;
    }

    pub fn clear_just_acquired_item(&mut self) {
        self.just_acquired_item = None;
    }
}

/// The single character of a one-character input, if that is what it is.
fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(first), None) => Some(first),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_defaults() {
        let session = Session::new(1);
        assert_eq!(session.floor_number, 1);
        assert_eq!(session.turn, 0);
        assert_eq!(session.phase, Phase::Playing);
        assert_eq!(session.grid.cell_count(), 0);
        assert!(session.player.items.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            base_grid_size: 2,
            ..GameConfig::default()
        };
        assert!(Session::with_config(config, GameRng::new(1)).is_err());
    }

    #[test]
    fn test_setup_floor_grants_starting_item_and_reveals() {
        let mut session = Session::new(42);
        session.setup_floor();
        assert_eq!(session.player.items.len(), 1);
        assert!(session.grid.cell(session.player.pos).is_revealed);
        assert_eq!(session.generation, GenerationStatus::Strict);
    }

    #[test]
    fn test_remove_item_takes_one_copy() {
        let mut player = Player::default();
        player.items = vec![ItemId::TrapShield, ItemId::TrapShield];
        assert!(player.remove_item(ItemId::TrapShield));
        assert_eq!(player.items.len(), 1);
        assert!(player.remove_item(ItemId::TrapShield));
        assert!(!player.remove_item(ItemId::TrapShield));
    }

    #[test]
    fn test_direction_keys() {
        assert_eq!(Direction::from_key('w'), Some(Direction::Up));
        assert_eq!(Direction::from_key('z'), None);
        assert_eq!(Direction::Left.delta(), (0, -1));
    }
}
