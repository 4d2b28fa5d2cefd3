//! Warm water flood over the cell grid
//!
//! Breadth-first spread from every water cell through excavated cells. The
//! traversal is deterministic: seeds in row-major order, FIFO queue, neighbors
//! visited up, down, left, right.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Contents of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellKind {
    Air = 0,
    Dirt = 1,
    Rock = 2,
    Pot = 3,
    WaterSource = 4,
    FlowingWater = 5,
    Ingredient = 6,
}

impl CellKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellKind::Air),
            1 => Some(CellKind::Dirt),
            2 => Some(CellKind::Rock),
            3 => Some(CellKind::Pot),
            4 => Some(CellKind::WaterSource),
            5 => Some(CellKind::FlowingWater),
            6 => Some(CellKind::Ingredient),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Cells that seed the flood
    #[inline]
    pub fn is_water(self) -> bool {
        matches!(self, CellKind::WaterSource | CellKind::FlowingWater)
    }

    /// Cells water can move into; an ingredient there is washed away
    #[inline]
    pub fn is_floodable(self) -> bool {
        matches!(self, CellKind::Air | CellKind::Ingredient)
    }
}

/// Row-major grid of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterGrid {
    rows: usize,
    cols: usize,
    cells: Vec<CellKind>,
}

/// Cardinal neighbor offsets in traversal order: up, down, left, right
const NEIGHBORS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl WaterGrid {
    /// Grid of `rows x cols` filled with one kind
    pub fn filled(rows: usize, cols: usize, kind: CellKind) -> Result<Self, LevelError> {
        if rows == 0 || cols == 0 {
            return Err(LevelError::EmptyGrid);
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![kind; rows * cols],
        })
    }

    /// Build from numeric cell codes, one slice per row
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, LevelError> {
        let first = rows.first().ok_or(LevelError::EmptyGrid)?;
        let cols = first.as_ref().len();
        if cols == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(LevelError::RaggedGrid {
                    row: r,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (c, &code) in row.iter().enumerate() {
                let kind =
                    CellKind::from_code(code).ok_or(LevelError::UnknownCell { row: r, col: c, code })?;
                cells.push(kind);
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at (row, col); `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<CellKind> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrite a cell; out-of-range coordinates are ignored
    pub fn set(&mut self, row: usize, col: usize, kind: CellKind) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = kind;
        }
    }

    /// Numeric codes per row (for display and debugging)
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }

    /// Number of cells of a kind
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Positions of every cell of a kind, row-major
    pub fn positions(&self, kind: CellKind) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| **c == kind)
            .map(move |(i, _)| (i / cols, i % cols))
    }

    fn neighbor(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<(usize, usize)> {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < self.rows && c < self.cols).then_some((r, c))
    }
}

/// Flood the grid from every water cell
///
/// Returns the flooded copy and whether water reached a pot. Traversal stops
/// at the first pot found, so in that case the copy may be only partially
/// flooded.
pub fn propagate(grid: &WaterGrid) -> (WaterGrid, bool) {
    let mut flooded = grid.clone();
    let mut visited = vec![false; grid.cells.len()];
    let mut queue = VecDeque::new();

    for (i, cell) in grid.cells.iter().enumerate() {
        if cell.is_water() {
            visited[i] = true;
            queue.push_back((i / grid.cols, i % grid.cols));
        }
    }

    while let Some((row, col)) = queue.pop_front() {
        for (dr, dc) in NEIGHBORS {
            let Some((nr, nc)) = flooded.neighbor(row, col, dr, dc) else {
                continue;
            };
            let ni = nr * flooded.cols + nc;
            if visited[ni] {
                continue;
            }
            match flooded.cells[ni] {
                CellKind::Pot => return (flooded, true),
                kind if kind.is_floodable() => {
                    flooded.cells[ni] = CellKind::FlowingWater;
                    visited[ni] = true;
                    queue.push_back((nr, nc));
                }
                _ => {}
            }
        }
    }

    (flooded, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const A: u8 = 0;
    const D: u8 = 1;
    const R: u8 = 2;
    const P: u8 = 3;
    const W: u8 = 4;
    const I: u8 = 6;

    #[test]
    fn test_rock_blocks_water() {
        let grid = WaterGrid::from_codes(&[
            [W, A, R, A, A],
            [A, A, R, A, P],
            [A, A, R, A, A],
        ])
        .unwrap();
        let (flooded, reached) = propagate(&grid);
        assert!(!reached);
        assert_eq!(flooded.count(CellKind::Rock), 3);
        assert_eq!(flooded.count(CellKind::FlowingWater), 5);
        // Right side of the wall untouched
        assert_eq!(flooded.get(0, 3), Some(CellKind::Air));
    }

    #[test]
    fn test_dirt_is_not_flooded() {
        let grid = WaterGrid::from_codes(&[[W, D, A], [D, D, P]]).unwrap();
        let (flooded, reached) = propagate(&grid);
        assert!(!reached);
        assert_eq!(flooded, grid);
    }

    #[test]
    fn test_cleared_path_reaches_pot() {
        // Corridor: source, air, pot, then air beyond the pot
        let grid = WaterGrid::from_codes(&[
            [R, W, R],
            [R, A, R],
            [R, P, R],
            [R, A, R],
            [R, A, R],
        ])
        .unwrap();
        let (flooded, reached) = propagate(&grid);
        assert!(reached);
        assert_eq!(flooded.get(1, 1), Some(CellKind::FlowingWater));
        assert_eq!(flooded.get(2, 1), Some(CellKind::Pot));
        // Nothing beyond the pot was flooded
        assert_eq!(flooded.get(3, 1), Some(CellKind::Air));
        assert_eq!(flooded.get(4, 1), Some(CellKind::Air));
    }

    #[test]
    fn test_ten_by_ten_source_two_cells_above_pot() {
        let mut grid = WaterGrid::filled(10, 10, CellKind::Dirt).unwrap();
        grid.set(0, 4, CellKind::WaterSource);
        grid.set(1, 4, CellKind::Air);
        grid.set(2, 4, CellKind::Air);
        grid.set(3, 4, CellKind::Pot);

        let (flooded, reached) = propagate(&grid);
        assert!(reached);
        assert_eq!(flooded.count(CellKind::FlowingWater), 2);
    }

    #[test]
    fn test_ingredient_washed_away() {
        let grid = WaterGrid::from_codes(&[[W, I, A]]).unwrap();
        let (flooded, reached) = propagate(&grid);
        assert!(!reached);
        assert_eq!(flooded.count(CellKind::Ingredient), 0);
        assert_eq!(flooded.count(CellKind::FlowingWater), 2);
    }

    #[test]
    fn test_input_grid_untouched() {
        let grid = WaterGrid::from_codes(&[[W, A, A]]).unwrap();
        let before = grid.clone();
        let _ = propagate(&grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_reached_pot_stays_reached() {
        let grid = WaterGrid::from_codes(&[[W, A, A, P], [A, A, A, A]]).unwrap();
        let (first, reached) = propagate(&grid);
        assert!(reached);
        let (_, again) = propagate(&first);
        assert!(again);
    }

    #[test]
    fn test_from_codes_errors() {
        assert_eq!(
            WaterGrid::from_codes::<[u8; 0]>(&[]).unwrap_err(),
            LevelError::EmptyGrid
        );
        let ragged: [&[u8]; 2] = [&[0, 1, 2], &[0, 1]];
        assert_eq!(
            WaterGrid::from_codes(&ragged).unwrap_err(),
            LevelError::RaggedGrid {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            WaterGrid::from_codes(&[[0u8, 9]]).unwrap_err(),
            LevelError::UnknownCell {
                row: 0,
                col: 1,
                code: 9
            }
        );
    }

    #[test]
    fn test_codes_round_trip_layout() {
        let codes = vec![vec![W, A], vec![R, P]];
        let grid = WaterGrid::from_codes(&codes).unwrap();
        assert_eq!(grid.to_codes(), codes);
        assert_eq!(grid.positions(CellKind::Pot).collect::<Vec<_>>(), vec![(1, 1)]);
    }

    fn arb_cell() -> impl Strategy<Value = u8> {
        prop_oneof![
            4 => Just(A),
            3 => Just(D),
            2 => Just(R),
            1 => Just(W),
            1 => Just(I),
        ]
    }

    /// Random cells, optionally followed by a pot sealed in rock on every side
    fn arb_grid() -> impl Strategy<Value = WaterGrid> {
        (1usize..8, 1usize..8, any::<bool>()).prop_flat_map(|(rows, cols, sealed_pot)| {
            proptest::collection::vec(proptest::collection::vec(arb_cell(), cols), rows).prop_map(
                move |mut codes| {
                    if sealed_pot {
                        let mut pot_row = vec![R; cols];
                        pot_row[0] = P;
                        codes.push(vec![R; cols]);
                        codes.push(pot_row);
                        codes.push(vec![R; cols]);
                    }
                    WaterGrid::from_codes(&codes).unwrap()
                },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_flood_is_idempotent(grid in arb_grid()) {
            let (once, reached) = propagate(&grid);
            prop_assert!(!reached);
            let (twice, reached_again) = propagate(&once);
            prop_assert!(!reached_again);
            prop_assert_eq!(&once, &twice);
            // A sealed pot stays dry
            let pots_before = grid.positions(CellKind::Pot).count();
            prop_assert_eq!(once.positions(CellKind::Pot).count(), pots_before);
        }

        #[test]
        fn prop_solid_cells_never_flood(grid in arb_grid()) {
            let (flooded, _) = propagate(&grid);
            for r in 0..grid.rows() {
                for c in 0..grid.cols() {
                    let before = grid.get(r, c).unwrap();
                    let after = flooded.get(r, c).unwrap();
                    if matches!(before, CellKind::Rock | CellKind::Dirt) {
                        prop_assert_eq!(before, after);
                    }
                    // Flowing water never retracts
                    if before.is_water() {
                        prop_assert_eq!(before, after);
                    }
                }
            }
        }
    }
}
