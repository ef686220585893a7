//! Game configuration.
//!
//! All difficulty tunables in one place. The defaults are the shipped
//! balance; `validate` guards the handful of values that would break floor
//! generation outright.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid configuration values, reported at session construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("base grid size {0} is too small; a floor needs room for the start area and an exit")]
    GridTooSmall(usize),

    #[error("grid growth interval must be at least 1")]
    ZeroGrowthInterval,

    #[error("trap density {0} must be within [0, 1)")]
    TrapDensityOutOfRange(f64),

    #[error("revelation threshold {0} must be within [0, 1]")]
    ThresholdOutOfRange(f64),

    #[error("reward choice count must be at least 1")]
    NoRewardChoices,
}

/// Difficulty and pacing tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Grid edge length on floor 0..growth_interval.
    pub base_grid_size: usize,

    /// Floors per +1 grid edge length.
    pub grid_growth_interval: u32,

    /// Trap count floor, before per-floor scaling.
    pub base_trap_count: usize,

    /// Additional traps per floor number.
    pub traps_per_floor: usize,

    /// Minimum fraction of cells that are traps as grids grow.
    pub trap_density: f64,

    /// Revelation rate required for a floor-clear reward.
    pub revelation_threshold: f64,

    /// Items seeded onto each floor.
    pub items_per_floor: usize,

    /// Reward options offered after a qualifying clear.
    pub reward_choices: usize,

    /// Generation retries before force-accepting a layout.
    pub max_generation_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_grid_size: 8,
            grid_growth_interval: 3,
            base_trap_count: 8,
            traps_per_floor: 2,
            trap_density: 0.15,
            revelation_threshold: 0.5,
            items_per_floor: 2,
            reward_choices: 3,
            max_generation_attempts: 100,
        }
    }
}

impl GameConfig {
    /// Check the values that would make floor generation impossible.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Trap placement keeps the player's 3x3 start area clear, so the
        // grid must at least hold that area plus an exit candidate.
        if self.base_grid_size < 4 {
            return Err(ConfigError::GridTooSmall(self.base_grid_size));
        }
        if self.grid_growth_interval == 0 {
            return Err(ConfigError::ZeroGrowthInterval);
        }
        if !(0.0..1.0).contains(&self.trap_density) {
            return Err(ConfigError::TrapDensityOutOfRange(self.trap_density));
        }
        if !(0.0..=1.0).contains(&self.revelation_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.revelation_threshold));
        }
        if self.reward_choices == 0 {
            return Err(ConfigError::NoRewardChoices);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let config = GameConfig {
            base_grid_size: 3,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GridTooSmall(3)));
    }

    #[test]
    fn test_rejects_bad_density() {
        let config = GameConfig {
            trap_density: 1.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TrapDensityOutOfRange(_))
        ));
    }

    #[test]
    fn test_rejects_zero_growth_interval() {
        let config = GameConfig {
            grid_growth_interval: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroGrowthInterval));
    }
}
