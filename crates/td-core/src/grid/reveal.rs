//! Reveal primitives: the cascade flood fill, flag toggling, and the
//! line / block / ray reveals that items build on.

use super::{Grid, Pos};

/// Reveal `start` and flood-fill outward through zero-adjacency cells.
///
/// No-op out of bounds or on an already revealed cell. Revealing clears the
/// cell's flag. Cells with a nonzero number are revealed but stop the
/// cascade; trap cells never cascade. Iterative on purpose: floors grow
/// without bound and a recursive fill would risk the stack.
pub fn reveal_from(grid: &mut Grid, start: Pos) {
    if !grid.in_bounds(start) || grid.cell(start).is_revealed {
        return;
    }

    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        let cell = grid.cell_mut(pos);
        if cell.is_revealed {
            continue;
        }
        cell.is_revealed = true;
        cell.is_flagged = false;

        if !cell.is_trap && cell.adjacent_traps == 0 {
            for neighbor in grid.neighbors8(pos) {
                if !grid.cell(neighbor).is_revealed {
                    stack.push(neighbor);
                }
            }
        }
    }
}

/// Flip the flag on an unrevealed cell; revealed cells are never flagged.
pub fn toggle_flag(grid: &mut Grid, pos: Pos) {
    if !grid.in_bounds(pos) {
        return;
    }
    let cell = grid.cell_mut(pos);
    if !cell.is_revealed {
        cell.is_flagged = !cell.is_flagged;
    }
}

/// The Bresenham line from `a` to `b`, inclusive of both endpoints.
pub fn line_cells(a: Pos, b: Pos) -> Vec<Pos> {
    let mut cells = Vec::new();
    let (mut r, mut c) = (a.r, a.c);
    let dc = (b.c - a.c).abs();
    let dr = -(b.r - a.r).abs();
    let sc = if a.c < b.c { 1 } else { -1 };
    let sr = if a.r < b.r { 1 } else { -1 };
    let mut err = dc + dr;

    loop {
        cells.push(Pos::new(r, c));
        if r == b.r && c == b.c {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dr {
            err += dr;
            c += sc;
        }
        if e2 <= dc {
            err += dc;
            r += sr;
        }
    }
    cells
}

/// Reveal every cell on the line from `a` to `b` directly (no cascade).
/// Traps on the line end up flagged as evidence; safe cells lose any flag.
pub fn reveal_line(grid: &mut Grid, a: Pos, b: Pos) {
    for pos in line_cells(a, b) {
        if !grid.in_bounds(pos) {
            continue;
        }
        let cell = grid.cell_mut(pos);
        cell.is_revealed = true;
        cell.is_flagged = cell.is_trap;
    }
}

/// Cascade-reveal every cell within Chebyshev `radius` of `center`.
pub fn reveal_block(grid: &mut Grid, center: Pos, radius: i32) {
    for dr in -radius..=radius {
        for dc in -radius..=radius {
            reveal_from(grid, center.offset(dr, dc));
        }
    }
}

/// Advance one cell at a time from `from` along `(dr, dc)`, cascade-revealing
/// the trail. The first trap on the path is revealed, flagged, and stops the
/// ray; the grid edge stops it silently. `from` itself is not touched.
pub fn reveal_ray(grid: &mut Grid, from: Pos, (dr, dc): (i32, i32)) {
    let mut pos = from;
    loop {
        pos = pos.offset(dr, dc);
        if !grid.in_bounds(pos) {
            return;
        }
        if grid.cell(pos).is_trap {
            let cell = grid.cell_mut(pos);
            cell.is_revealed = true;
            cell.is_flagged = true;
            return;
        }
        reveal_from(grid, pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::numbering::renumber;

    fn grid_with_traps(rows: usize, cols: usize, traps: &[(i32, i32)]) -> Grid {
        let mut grid = Grid::new(rows, cols);
        for &(r, c) in traps {
            grid.cell_mut(Pos::new(r, c)).is_trap = true;
        }
        renumber(&mut grid);
        grid
    }

    fn revealed_set(grid: &Grid) -> Vec<Pos> {
        grid.positions()
            .filter(|&p| grid.cell(p).is_revealed)
            .collect()
    }

    #[test]
    fn test_flood_fill_opens_trap_free_grid() {
        let mut grid = grid_with_traps(4, 4, &[]);
        reveal_from(&mut grid, Pos::new(0, 0));
        assert_eq!(grid.count_revealed(), 16);
    }

    #[test]
    fn test_numbered_cells_stop_the_cascade() {
        // Trap in the far corner of a 5x5: its numbered ring is revealed,
        // the trap itself stays hidden.
        let mut grid = grid_with_traps(5, 5, &[(4, 4)]);
        reveal_from(&mut grid, Pos::new(0, 0));
        assert!(!grid.cell(Pos::new(4, 4)).is_revealed);
        assert!(grid.cell(Pos::new(3, 4)).is_revealed);
        assert!(grid.cell(Pos::new(4, 3)).is_revealed);
        assert_eq!(grid.count_revealed(), 24);
    }

    #[test]
    fn test_flood_fill_idempotent() {
        let mut grid = grid_with_traps(6, 6, &[(3, 3)]);
        reveal_from(&mut grid, Pos::new(0, 0));
        let first = revealed_set(&grid);
        reveal_from(&mut grid, Pos::new(0, 0));
        assert_eq!(first, revealed_set(&grid));
    }

    #[test]
    fn test_reveal_clears_flag() {
        let mut grid = grid_with_traps(3, 3, &[]);
        toggle_flag(&mut grid, Pos::new(2, 2));
        assert!(grid.cell(Pos::new(2, 2)).is_flagged);
        reveal_from(&mut grid, Pos::new(0, 0));
        assert!(!grid.cell(Pos::new(2, 2)).is_flagged);
    }

    #[test]
    fn test_toggle_flag_ignores_revealed_cells() {
        let mut grid = grid_with_traps(3, 3, &[(2, 2)]);
        reveal_from(&mut grid, Pos::new(0, 0));
        toggle_flag(&mut grid, Pos::new(0, 0));
        assert!(!grid.cell(Pos::new(0, 0)).is_flagged);
        // Out of bounds is a no-op, not a panic.
        toggle_flag(&mut grid, Pos::new(-1, 7));
    }

    #[test]
    fn test_line_cells_straight_and_diagonal() {
        assert_eq!(
            line_cells(Pos::new(1, 1), Pos::new(1, 4)),
            vec![Pos::new(1, 1), Pos::new(1, 2), Pos::new(1, 3), Pos::new(1, 4)]
        );
        assert_eq!(
            line_cells(Pos::new(1, 1), Pos::new(4, 1)),
            vec![Pos::new(1, 1), Pos::new(2, 1), Pos::new(3, 1), Pos::new(4, 1)]
        );
        assert_eq!(
            line_cells(Pos::new(0, 0), Pos::new(3, 3)),
            vec![Pos::new(0, 0), Pos::new(1, 1), Pos::new(2, 2), Pos::new(3, 3)]
        );
    }

    #[test]
    fn test_reveal_line_flags_traps_only() {
        let mut grid = grid_with_traps(1, 4, &[(0, 2)]);
        toggle_flag(&mut grid, Pos::new(0, 1));
        reveal_line(&mut grid, Pos::new(0, 0), Pos::new(0, 3));
        for c in 0..4 {
            assert!(grid.cell(Pos::new(0, c)).is_revealed);
        }
        assert!(grid.cell(Pos::new(0, 2)).is_flagged);
        assert!(!grid.cell(Pos::new(0, 1)).is_flagged);
    }

    #[test]
    fn test_ray_stops_at_first_trap_and_flags_it() {
        let mut grid = grid_with_traps(1, 6, &[(0, 3), (0, 5)]);
        reveal_ray(&mut grid, Pos::new(0, 0), (0, 1));
        assert!(grid.cell(Pos::new(0, 1)).is_revealed);
        assert!(grid.cell(Pos::new(0, 2)).is_revealed);
        assert!(grid.cell(Pos::new(0, 3)).is_revealed);
        assert!(grid.cell(Pos::new(0, 3)).is_flagged);
        assert!(!grid.cell(Pos::new(0, 4)).is_revealed);
        assert!(!grid.cell(Pos::new(0, 5)).is_revealed);
    }

    #[test]
    fn test_ray_stops_silently_at_edge() {
        // A trap row below numbers the whole flight path, so the ray opens
        // exactly the cells it crosses and dies at the edge.
        let mut grid = grid_with_traps(2, 4, &[(1, 0), (1, 1), (1, 2), (1, 3)]);
        reveal_ray(&mut grid, Pos::new(0, 1), (0, 1));
        assert!(grid.cell(Pos::new(0, 2)).is_revealed);
        assert!(grid.cell(Pos::new(0, 3)).is_revealed);
        assert!(!grid.cell(Pos::new(0, 0)).is_revealed);
        assert!(!grid.cell(Pos::new(0, 1)).is_revealed);
    }

    #[test]
    fn test_block_reveal_radius() {
        // Traps on the 3x3 corners number every cell in the block, so the
        // block reveal opens exactly the 3x3 and nothing cascades out.
        let mut grid = grid_with_traps(7, 7, &[(0, 0), (0, 2), (2, 0), (2, 2)]);
        reveal_block(&mut grid, Pos::new(1, 1), 1);
        assert_eq!(grid.count_revealed(), 9);
        for dr in -1..=1 {
            for dc in -1..=1 {
                assert!(grid.cell(Pos::new(1, 1).offset(dr, dc)).is_revealed);
            }
        }
    }
}
