//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step only, no dt
//! - Seeded RNG only (level generation)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod flood;
pub mod grid_level;
pub mod level;
pub mod state;
pub mod terrain;
pub mod tick;

pub use body::{Ingredient, MaterialKind, StepReport, ThermalState};
pub use collision::{ObstacleHit, clamp_to_field, obstacle_bounce, resolve_obstacles};
pub use flood::{CellKind, WaterGrid, propagate};
pub use grid_level::{DigResult, GridLevel};
pub use level::{generate_level, min_field_size};
pub use state::{
    Hud, LevelPhase, LevelState, LossReason, Obstacle, ObstacleKind, Tool, WaterZone,
};
pub use terrain::{Soil, TerrainField};
pub use tick::{Stroke, TickInput, tick};
