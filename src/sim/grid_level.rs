//! Cell-based level variant
//!
//! The player digs one dirt cell at a time. After every dig the warm water is
//! re-flooded from scratch; water reaching the pot loses the level, an
//! ingredient resting directly above the pot wins it.

use serde::{Deserialize, Serialize};

use super::flood::{CellKind, WaterGrid, propagate};
use super::state::{LevelPhase, LossReason};
use crate::error::LevelError;

/// Classic 10x10 layout: rock border, dirt body, warm water at (3,3),
/// pot at (7,5), frozen meat at (8,2)
const CLASSIC_LAYOUT: [[u8; 10]; 10] = [
    [2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
    [2, 1, 1, 1, 1, 1, 1, 1, 1, 2],
    [2, 1, 1, 1, 1, 1, 1, 1, 1, 2],
    [2, 1, 1, 4, 1, 1, 1, 1, 1, 2],
    [2, 1, 1, 1, 1, 1, 1, 1, 1, 2],
    [2, 1, 1, 1, 1, 1, 1, 1, 1, 2],
    [2, 1, 1, 1, 1, 1, 1, 1, 1, 2],
    [2, 1, 1, 1, 1, 3, 1, 1, 1, 2],
    [2, 1, 6, 1, 1, 1, 1, 1, 1, 2],
    [2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
];

/// Result of a dig request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigResult {
    /// Cell excavated; carries the phase after re-flooding
    Dug(LevelPhase),
    /// Cell is not dirt (or outside the grid)
    NotDiggable,
    /// Level already finished
    Finished,
}

/// A playable grid level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridLevel {
    initial: WaterGrid,
    grid: WaterGrid,
    phase: LevelPhase,
    digs: u32,
}

impl GridLevel {
    pub fn new(grid: WaterGrid) -> Self {
        Self {
            initial: grid.clone(),
            grid,
            phase: LevelPhase::Playing,
            digs: 0,
        }
    }

    /// The classic 10x10 layout
    pub fn classic() -> Result<Self, LevelError> {
        Ok(Self::new(WaterGrid::from_codes(&CLASSIC_LAYOUT)?))
    }

    pub fn grid(&self) -> &WaterGrid {
        &self.grid
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn digs(&self) -> u32 {
        self.digs
    }

    /// Excavate a dirt cell and re-flood
    pub fn dig(&mut self, row: usize, col: usize) -> DigResult {
        if self.phase.is_terminal() {
            return DigResult::Finished;
        }
        if self.grid.get(row, col) != Some(CellKind::Dirt) {
            return DigResult::NotDiggable;
        }

        self.grid.set(row, col, CellKind::Air);
        self.digs += 1;

        let (flooded, reached_pot) = propagate(&self.grid);
        self.grid = flooded;

        // Failure first
        if reached_pot {
            self.phase = LevelPhase::Lost {
                reason: LossReason::WaterInPot,
            };
            log::info!("Grid level lost after {} digs: water reached the pot", self.digs);
        } else if self.ingredient_above_pot() {
            self.phase = LevelPhase::Won;
            log::info!("Grid level won after {} digs", self.digs);
        }

        DigResult::Dug(self.phase)
    }

    /// Restore the starting layout
    pub fn reset(&mut self) {
        self.grid = self.initial.clone();
        self.phase = LevelPhase::Playing;
        self.digs = 0;
    }

    fn ingredient_above_pot(&self) -> bool {
        self.grid
            .positions(CellKind::Ingredient)
            .any(|(r, c)| self.grid.get(r + 1, c) == Some(CellKind::Pot))
    }
}
