//! Adjacency numbering.

use super::Grid;

/// Recompute `adjacent_traps` for every cell: the 8-neighbor trap count for
/// non-trap cells, 0 for traps (a trap's own number is never meaningful).
///
/// Must be re-run after anything adds or removes a trap.
pub fn renumber(grid: &mut Grid) {
    for pos in grid.positions().collect::<Vec<_>>() {
        let count = if grid.cell(pos).is_trap {
            0
        } else {
            grid.neighbors8(pos)
                .into_iter()
                .filter(|&n| grid.cell(n).is_trap)
                .count() as u8
        };
        grid.cell_mut(pos).adjacent_traps = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pos;

    fn grid_with_traps(rows: usize, cols: usize, traps: &[(i32, i32)]) -> Grid {
        let mut grid = Grid::new(rows, cols);
        for &(r, c) in traps {
            grid.cell_mut(Pos::new(r, c)).is_trap = true;
        }
        renumber(&mut grid);
        grid
    }

    #[test]
    fn test_counts_eight_neighbors() {
        let grid = grid_with_traps(3, 3, &[(0, 1), (2, 2)]);
        assert_eq!(grid.cell(Pos::new(1, 1)).adjacent_traps, 2);
        assert_eq!(grid.cell(Pos::new(0, 0)).adjacent_traps, 1);
        assert_eq!(grid.cell(Pos::new(2, 0)).adjacent_traps, 0);
    }

    #[test]
    fn test_trap_cells_carry_zero() {
        let grid = grid_with_traps(3, 3, &[(1, 1), (1, 2)]);
        assert_eq!(grid.cell(Pos::new(1, 1)).adjacent_traps, 0);
    }

    #[test]
    fn test_renumber_after_removal() {
        let mut grid = grid_with_traps(3, 3, &[(0, 1)]);
        assert_eq!(grid.cell(Pos::new(1, 1)).adjacent_traps, 1);
        grid.cell_mut(Pos::new(0, 1)).is_trap = false;
        renumber(&mut grid);
        assert_eq!(grid.cell(Pos::new(1, 1)).adjacent_traps, 0);
    }
}
