//! Level state and core simulation types
//!
//! Everything a renderer needs to draw a frame lives here: terrain raster,
//! ingredients, static obstacles and water zones, outcome and HUD counters.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Ingredient, MaterialKind, ThermalState};
use super::terrain::TerrainField;
use crate::settings::Tuning;
use crate::stroke_points;

/// Why a level was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// A frozen ingredient entered the pot before thawing
    FrozenInPot,
    /// Warm water flooded into the pot (grid variant)
    WaterInPot,
}

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Simulation running
    Playing,
    /// Every ingredient is in the pot and none was frozen
    Won,
    /// Terminal failure
    Lost { reason: LossReason },
}

impl LevelPhase {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LevelPhase::Playing)
    }
}

/// Obstacle categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Chili,
    Pepper,
}

/// A static circular obstacle that bounces ingredients away
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: ObstacleKind,
}

/// Axis-aligned warm water rectangle that thaws frozen ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterZone {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl WaterZone {
    /// Open-interval containment; points on the edge are outside
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.w && p.y > self.y && p.y < self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Player tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    /// Excavates dirt
    Shovel,
    /// Lays plank bridges, consuming bridge material
    Brush,
}

/// HUD counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    /// Ingredients in the pot and not frozen
    pub collected: usize,
    /// Ingredients that reached the pot still frozen
    pub failed: usize,
    pub total: usize,
    pub bridge_material: f32,
    pub bridge_capacity: f32,
}

/// Complete level state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    /// Seed the level was generated from
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) phase: LevelPhase,
    pub(crate) terrain: TerrainField,
    /// Ingredients (sorted by id for determinism)
    pub(crate) ingredients: Vec<Ingredient>,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) water_zones: Vec<WaterZone>,
    pub(crate) bridge_material: f32,
    pub(crate) bridge_capacity: f32,
    next_id: u32,
}

impl LevelState {
    /// Empty level over an existing terrain
    pub fn new(seed: u64, terrain: TerrainField, tuning: &Tuning) -> Self {
        Self {
            seed,
            time_ticks: 0,
            phase: LevelPhase::Playing,
            terrain,
            ingredients: Vec::new(),
            obstacles: Vec::new(),
            water_zones: Vec::new(),
            bridge_material: tuning.tools.bridge_capacity,
            bridge_capacity: tuning.tools.bridge_capacity,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an ingredient at rest (apart from `vx`) and return its id
    pub fn spawn_ingredient(
        &mut self,
        pos: Vec2,
        kind: MaterialKind,
        vx: f32,
        tuning: &Tuning,
    ) -> u32 {
        let id = self.next_entity_id();
        let mut ingredient = Ingredient::new(id, pos, kind, tuning.physics.ingredient_radius);
        ingredient.vel.x = vx;
        self.ingredients.push(ingredient);
        id
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn add_water_zone(&mut self, zone: WaterZone) {
        self.water_zones.push(zone);
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn ingredient_mut(&mut self, id: u32) -> Option<&mut Ingredient> {
        self.ingredients.iter_mut().find(|i| i.id == id)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn water_zones(&self) -> &[WaterZone] {
        &self.water_zones
    }

    pub fn bridge_material(&self) -> f32 {
        self.bridge_material
    }

    /// Apply a tool once at a point
    ///
    /// Returns whether the terrain changed. Ignored once the level is over, and
    /// the brush does nothing while bridge material is exhausted.
    pub fn apply_tool(&mut self, tool: Tool, at: Vec2, tuning: &Tuning) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        match tool {
            Tool::Shovel => {
                self.terrain.clear_circle(at.x, at.y, tuning.tools.shovel_radius);
                true
            }
            Tool::Brush => {
                if self.bridge_material <= 0.0 {
                    return false;
                }
                self.terrain.fill_circle(at.x, at.y, tuning.tools.brush_radius);
                self.bridge_material = (self.bridge_material - tuning.tools.bridge_cost).max(0.0);
                true
            }
        }
    }

    /// Apply a tool along a drag, one application per interpolated point
    ///
    /// Returns the number of applications that changed the terrain.
    pub fn apply_stroke(&mut self, tool: Tool, from: Vec2, to: Vec2, tuning: &Tuning) -> usize {
        let mut applied = 0;
        for point in stroke_points(from, to, tuning.tools.stroke_step) {
            if self.apply_tool(tool, point, tuning) {
                applied += 1;
            }
        }
        applied
    }

    /// Count of ingredients safely in the pot
    pub fn collected(&self) -> usize {
        self.ingredients
            .iter()
            .filter(|i| i.in_pot && i.thermal() != ThermalState::Frozen)
            .count()
    }

    /// Count of ingredients that reached the pot while frozen
    pub fn failed(&self) -> usize {
        self.ingredients
            .iter()
            .filter(|i| i.in_pot && i.thermal() == ThermalState::Frozen)
            .count()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            collected: self.collected(),
            failed: self.failed(),
            total: self.ingredients.len(),
            bridge_material: self.bridge_material,
            bridge_capacity: self.bridge_capacity,
        }
    }

    /// Decide the outcome from the current ingredients
    ///
    /// Failure is checked first so it wins over a simultaneous success. A
    /// terminal outcome is never revised and stops every ingredient.
    pub fn evaluate_outcome(&mut self) -> LevelPhase {
        if self.phase.is_terminal() {
            return self.phase;
        }
        if self.failed() > 0 {
            self.finish(LevelPhase::Lost {
                reason: LossReason::FrozenInPot,
            });
        } else if !self.ingredients.is_empty() && self.collected() == self.ingredients.len() {
            self.finish(LevelPhase::Won);
        }
        self.phase
    }

    fn finish(&mut self, phase: LevelPhase) {
        log::info!(
            "Level {} finished at tick {}: {:?} ({}/{} collected)",
            self.seed,
            self.time_ticks,
            phase,
            self.collected(),
            self.ingredients.len()
        );
        self.phase = phase;
        for ingredient in &mut self.ingredients {
            ingredient.active = false;
        }
    }

    /// Ensure ingredients are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.ingredients.sort_by_key(|i| i.id);
    }
}
