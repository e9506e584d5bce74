//! Grid representation and generation advance for life-like automata

use super::RuleSet;
use crate::error::{LifeError, Result};
use rayon::prelude::*;
use std::fmt;

/// Relative positions of the 8 Moore neighbors
const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A fixed-size rectangle of cells. Everything outside it counts as dead.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    /// Shadow buffer the next generation is written into before swapping.
    next: Vec<bool>,
}

impl Grid {
    /// Create a grid with every cell dead
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = match width.checked_mul(height) {
            Some(len) if len > 0 => len,
            _ => return Err(LifeError::InvalidDimension { width, height }),
        };

        Ok(Self {
            width,
            height,
            cells: vec![false; len],
            next: vec![false; len],
        })
    }

    /// Create a grid from a 2D boolean array
    pub fn from_cells(cells: Vec<Vec<bool>>) -> Result<Self> {
        let height = cells.len();
        let width = cells.first().map_or(0, Vec::len);

        let mut grid = Self::new(width, height)?;

        for (row, line) in cells.iter().enumerate() {
            if line.len() != width {
                return Err(LifeError::RaggedRow {
                    row,
                    len: line.len(),
                    expected: width,
                });
            }
        }

        grid.cells = cells.into_iter().flatten().collect();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major view of every cell
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Iterate over the rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width)
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row < self.height && col < self.width {
            Ok(())
        } else {
            Err(LifeError::OutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// Get cell value at coordinates
    pub fn get(&self, row: usize, col: usize) -> Result<bool> {
        self.check_bounds(row, col)?;
        Ok(self.cells[self.index(row, col)])
    }

    /// Set cell value at coordinates
    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<()> {
        self.check_bounds(row, col)?;
        let idx = self.index(row, col);
        self.cells[idx] = alive;
        Ok(())
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Count living cells among the 8 Moore neighbors. Positions outside the grid are dead.
    pub fn count_neighbors(&self, row: usize, col: usize) -> Result<u8> {
        self.check_bounds(row, col)?;
        Ok(self.live_neighbors(row, col))
    }

    /// Neighbor count for a cell already known to be in bounds
    fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        MOORE_OFFSETS
            .iter()
            .filter(|&&(dr, dc)| self.is_alive_at(row as isize + dr, col as isize + dc))
            .count() as u8
    }

    fn is_alive_at(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        row < self.height && col < self.width && self.cells[self.index(row, col)]
    }

    /// Replace the grid's state with the next generation under `rules`.
    ///
    /// Every cell of the next generation is computed from the current buffer only,
    /// so no cell ever observes a neighbor that has already advanced.
    pub fn advance(&mut self, rules: &RuleSet) {
        let mut next = std::mem::take(&mut self.next);
        next.resize(self.cells.len(), false);

        let current = &*self;
        next.par_chunks_mut(current.width)
            .enumerate()
            .for_each(|(row, out)| {
                for (col, cell) in out.iter_mut().enumerate() {
                    let alive = current.cells[current.index(row, col)];
                    *cell = rules.next_state(alive, current.live_neighbors(row, col));
                }
            });

        self.next = next;
        std::mem::swap(&mut self.cells, &mut self.next);
    }

    /// Advance several generations in a row
    pub fn advance_generations(&mut self, rules: &RuleSet, generations: usize) {
        for _ in 0..generations {
            self.advance(rules);
        }
    }

    /// Copy `pattern` into this grid with its top-left corner at (row, col).
    ///
    /// Dead cells of the pattern overwrite live ones. Fails without touching the
    /// grid if the pattern does not fit.
    pub fn place(&mut self, pattern: &Grid, row: usize, col: usize) -> Result<()> {
        let last_row = row.saturating_add(pattern.height - 1);
        let last_col = col.saturating_add(pattern.width - 1);
        self.check_bounds(last_row, last_col)?;

        for (dr, line) in pattern.rows().enumerate() {
            let start = self.index(row + dr, col);
            self.cells[start..start + pattern.width].copy_from_slice(line);
        }
        Ok(())
    }

    /// Place `pattern` in the middle of this grid
    pub fn place_centered(&mut self, pattern: &Grid) -> Result<()> {
        let row = self.height.saturating_sub(pattern.height) / 2;
        let col = self.width.saturating_sub(pattern.width) / 2;
        self.place(pattern, row, col)
    }

    /// Get all living cell coordinates
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(|(i, _)| (i / self.width, i % self.width))
            .collect()
    }

    /// Count total living cells
    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Check if the grid is empty (no living cells)
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| !cell)
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &cell in row {
                write!(f, "{}", if cell { "⬛" } else { "⬜" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glider() -> Grid {
        Grid::from_cells(vec![
            vec![false, true, false],
            vec![false, false, true],
            vec![true, true, true],
        ])
        .unwrap()
    }

    fn block_grid() -> Grid {
        Grid::from_cells(vec![
            vec![false, false, false, false],
            vec![false, true, true, false],
            vec![false, true, true, false],
            vec![false, false, false, false],
        ])
        .unwrap()
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cells().len(), 12);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            Grid::new(0, 5),
            Err(LifeError::InvalidDimension { width: 0, height: 5 })
        );
        assert!(Grid::new(5, 0).is_err());
        assert!(Grid::from_cells(vec![]).is_err());
        assert!(Grid::from_cells(vec![vec![]]).is_err());
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        assert_eq!(
            Grid::new(1 << 33, 1 << 31),
            Err(LifeError::InvalidDimension { width: 1 << 33, height: 1 << 31 })
        );
        assert_eq!(
            Grid::new(usize::MAX, 2),
            Err(LifeError::InvalidDimension { width: usize::MAX, height: 2 })
        );
    }

    #[test]
    fn test_grid_from_cells() {
        let cells = vec![
            vec![true, false, true],
            vec![false, true, false],
        ];
        let grid = Grid::from_cells(cells).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.living_count(), 3);
        assert_eq!(grid.living_cells(), vec![(0, 0), (0, 2), (1, 1)]);

        let ragged = Grid::from_cells(vec![vec![true, false], vec![true]]);
        assert_eq!(
            ragged,
            Err(LifeError::RaggedRow { row: 1, len: 1, expected: 2 })
        );
    }

    #[test]
    fn test_get_and_set() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(1, 2, true).unwrap();
        assert_eq!(grid.get(1, 2), Ok(true));
        assert_eq!(grid.get(0, 0), Ok(false));
        grid.set(1, 2, false).unwrap();
        assert_eq!(grid.get(1, 2), Ok(false));
    }

    #[test]
    fn test_out_of_bounds_leaves_grid_untouched() {
        let mut grid = block_grid();
        let before = grid.clone();

        let err = LifeError::OutOfBounds { row: 4, col: 0, height: 4, width: 4 };
        assert_eq!(grid.get(4, 0), Err(err.clone()));
        assert_eq!(grid.set(4, 0, true), Err(err));
        assert!(grid.set(0, 4, true).is_err());
        assert!(grid.get(usize::MAX, usize::MAX).is_err());

        assert_eq!(grid, before);
    }

    #[test]
    fn test_clear() {
        let mut grid = block_grid();
        grid.clear();
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                assert_eq!(grid.get(row, col), Ok(false));
            }
        }
    }

    #[test]
    fn test_neighbor_counting() {
        let cells = vec![
            vec![true, true, true],
            vec![true, false, true],
            vec![true, true, true],
        ];
        let grid = Grid::from_cells(cells).unwrap();

        assert_eq!(grid.count_neighbors(1, 1), Ok(8));
        // Only 2 because center is dead
        assert_eq!(grid.count_neighbors(0, 0), Ok(2));
    }

    #[test]
    fn test_corner_has_no_wraparound() {
        for size in 2..6 {
            let grid = Grid::from_cells(vec![vec![true; size]; size]).unwrap();
            assert_eq!(grid.count_neighbors(0, 0), Ok(3));
            assert_eq!(grid.count_neighbors(size - 1, size - 1), Ok(3));
            if size >= 3 {
                assert_eq!(grid.count_neighbors(0, 1), Ok(5));
            }
        }

        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(2, 2, true).unwrap();
        assert_eq!(grid.count_neighbors(0, 0), Ok(0));
    }

    #[test]
    fn test_neighbor_count_outside_grid_fails() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(2, 1, true).unwrap();

        assert_eq!(
            grid.count_neighbors(3, 1),
            Err(LifeError::OutOfBounds { row: 3, col: 1, height: 3, width: 3 })
        );
        assert!(grid.count_neighbors(1, 3).is_err());
        assert!(grid.count_neighbors(usize::MAX, 0).is_err());
        assert_eq!(grid.count_neighbors(2, 2), Ok(1));
    }

    #[test]
    fn test_dead_grid_stays_dead() {
        let rulesets = [
            RuleSet::conway(),
            RuleSet::highlife(),
            RuleSet::seeds(),
            RuleSet::day_and_night(),
            RuleSet::parse("/").unwrap(),
            RuleSet::parse("B12345678/S012345678").unwrap(),
        ];
        for rules in &rulesets {
            let mut grid = Grid::new(7, 5).unwrap();
            grid.advance_generations(rules, 10);
            assert!(grid.is_empty(), "rule {} created life from nothing", rules);
        }
    }

    #[test]
    fn test_birth_from_nothing() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.advance(&RuleSet::parse("B0/S").unwrap());
        assert_eq!(grid.living_count(), 9);
    }

    #[test]
    fn test_empty_rule_kills_everything() {
        let rules = RuleSet::parse("/").unwrap();
        let mut grid = Grid::from_cells(vec![vec![true; 5]; 4]).unwrap();
        grid.advance(&rules);
        assert!(grid.is_empty());

        let mut grid = block_grid();
        grid.advance(&rules);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_still_life_block() {
        let mut grid = block_grid();
        let original = grid.clone();
        let rules = RuleSet::parse("3/23").unwrap();

        grid.advance(&rules);
        assert_eq!(grid, original);

        grid.advance_generations(&rules, 5);
        assert_eq!(grid, original);
    }

    #[test]
    fn test_oscillator_blinker() {
        let mut grid = Grid::from_cells(vec![
            vec![false, false, false],
            vec![true, true, true],
            vec![false, false, false],
        ])
        .unwrap();
        let original = grid.clone();

        grid.advance(&RuleSet::conway());
        let expected = Grid::from_cells(vec![
            vec![false, true, false],
            vec![false, true, false],
            vec![false, true, false],
        ])
        .unwrap();
        assert_eq!(grid, expected);

        grid.advance(&RuleSet::conway());
        assert_eq!(grid, original);
    }

    #[test]
    fn test_glider_translation() {
        let rules = RuleSet::parse("3/23").unwrap();
        let mut grid = Grid::new(10, 10).unwrap();
        grid.place(&glider(), 1, 1).unwrap();

        let mut expected = Grid::new(10, 10).unwrap();
        expected.place(&glider(), 2, 2).unwrap();

        grid.advance_generations(&rules, 4);
        assert_eq!(grid, expected);
        assert_eq!(grid.living_count(), 5);
    }

    #[test]
    fn test_advance_reads_only_previous_generation() {
        // A row-by-row in-place update would let the top of the line die before
        // the cells below it are counted.
        let mut grid = Grid::from_cells(vec![
            vec![false, true, false],
            vec![false, true, false],
            vec![false, true, false],
        ])
        .unwrap();
        grid.advance(&RuleSet::conway());
        assert_eq!(grid.living_cells(), vec![(1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_glider_dies_at_dead_boundary() {
        let rules = RuleSet::conway();
        let mut grid = Grid::new(6, 6).unwrap();
        grid.place(&glider(), 0, 0).unwrap();

        grid.advance_generations(&rules, 40);
        // The glider collides with the edge and settles into a block
        assert_eq!(grid.living_cells(), vec![(4, 4), (4, 5), (5, 4), (5, 5)]);
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 6);
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut grid = Grid::new(4, 4).unwrap();
        assert!(grid.place(&glider(), 2, 0).is_err());
        assert!(grid.place(&glider(), 0, usize::MAX).is_err());
        assert!(grid.is_empty());

        grid.place(&glider(), 1, 1).unwrap();
        assert_eq!(grid.living_count(), 5);
    }

    #[test]
    fn test_place_centered() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.place_centered(&glider()).unwrap();
        assert_eq!(grid.get(1, 2), Ok(true));
        assert_eq!(grid.get(3, 1), Ok(true));
        assert_eq!(grid.living_count(), 5);
    }
}
