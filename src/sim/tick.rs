//! Fixed timestep simulation tick
//!
//! One call advances the level by exactly one frame: tool strokes first, then
//! every ingredient in id order, then the outcome check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{LevelPhase, LevelState, Tool};
use crate::settings::Tuning;

/// A pointer drag converted into world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub tool: Tool,
    pub from: Vec2,
    pub to: Vec2,
}

impl Stroke {
    /// A single tap at one point
    pub fn tap(tool: Tool, at: Vec2) -> Self {
        Self {
            tool,
            from: at,
            to: at,
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Strokes gathered since the previous frame, applied in order
    pub strokes: Vec<Stroke>,
}

/// Advance the level by one fixed step
///
/// Returns the phase after the step. A finished level is left untouched.
pub fn tick(state: &mut LevelState, input: &TickInput, tuning: &Tuning) -> LevelPhase {
    if state.phase.is_terminal() {
        return state.phase;
    }

    // Terrain edits land before any ingredient moves this frame
    for stroke in &input.strokes {
        state.apply_stroke(stroke.tool, stroke.from, stroke.to, tuning);
    }

    state.time_ticks += 1;

    state.normalize_order();
    for ingredient in &mut state.ingredients {
        let report = ingredient.step(
            &state.terrain,
            &state.obstacles,
            &state.water_zones,
            &tuning.physics,
        );
        if report.entered_pot {
            log::debug!(
                "Tick {}: ingredient {} ({:?}) in pot",
                state.time_ticks,
                ingredient.id,
                ingredient.kind()
            );
        }
    }

    state.evaluate_outcome()
}
