//! Trap seeding.
//!
//! Traps are placed by rejection sampling: draw a random cell, skip it if it
//! already holds a trap or touches the player's start, repeat until the
//! requested count is down. Callers keep `count` safely below
//! `rows * cols - 9` (the board minus the protected start area), so the
//! loop always terminates.

use crate::config::GameConfig;
use crate::rng::GameRng;

use super::{Grid, Pos};

/// Traps for a floor: a per-floor ramp with a density floor so large grids
/// never thin out.
pub fn trap_count_for(floor: u32, rows: usize, cols: usize, config: &GameConfig) -> usize {
    let scaled = config.base_trap_count + config.traps_per_floor * floor as usize;
    let density = ((rows * cols) as f64 * config.trap_density).floor() as usize;
    scaled.max(density)
}

/// Place exactly `count` traps, never on the player's start cell or any of
/// its 8 neighbors. The exit does not exist yet at this point; its safety
/// comes from the floor generator drawing it from zero-adjacency cells.
pub fn place_traps(grid: &mut Grid, count: usize, player: Pos, rng: &mut GameRng) {
    debug_assert!(count < grid.cell_count().saturating_sub(9));

    let mut placed = 0;
    while placed < count {
        let (r, c) = rng.coord(grid.rows(), grid.cols());
        let pos = Pos::new(r as i32, c as i32);
        if pos.chebyshev(player) <= 1 || grid.cell(pos).is_trap {
            continue;
        }
        grid.cell_mut(pos).is_trap = true;
        placed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_places_exact_count() {
        let mut rng = GameRng::new(42);
        let mut grid = Grid::new(8, 8);
        place_traps(&mut grid, 10, Pos::new(4, 4), &mut rng);
        assert_eq!(grid.count_traps(), 10);
    }

    #[test]
    fn test_start_area_stays_clear() {
        let player = Pos::new(3, 3);
        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let mut grid = Grid::new(8, 8);
            place_traps(&mut grid, 30, player, &mut rng);
            for dr in -1..=1 {
                for dc in -1..=1 {
                    assert!(!grid.cell(player.offset(dr, dc)).is_trap);
                }
            }
        }
    }

    #[test]
    fn test_trap_count_formula() {
        let config = GameConfig::default();
        // Small floors: the per-floor ramp dominates the density floor.
        assert_eq!(trap_count_for(1, 8, 8, &config), 10);
        assert_eq!(trap_count_for(5, 9, 9, &config), 18);
        // 12x12 on floor 12: max(8 + 24, floor(144 * 0.15)) = max(32, 21).
        assert_eq!(trap_count_for(12, 12, 12, &config), 32);
    }
}
