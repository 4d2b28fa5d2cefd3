//! Simulation tuning
//!
//! Every physics, tool and layout constant the simulation reads lives here so a
//! level can be rebalanced from a JSON file. Missing fields fall back to the
//! defaults in `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::LevelError;

/// How simultaneous obstacle overlaps in one step are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleResolution {
    /// Obstacles are processed in order; the last overlapping one sets the velocity
    #[default]
    LastWins,
    /// Bounce directions of every overlapping obstacle are summed
    Averaged,
}

impl ObstacleResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleResolution::LastWins => "last_wins",
            ObstacleResolution::Averaged => "averaged",
        }
    }
}

/// Per-step ingredient physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub ingredient_radius: f32,
    pub ground_rebound: f32,
    pub ground_friction: f32,
    pub air_damping: f32,
    pub roll_threshold: f32,
    pub roll_impulse: f32,
    pub roll_probe_dx: f32,
    pub roll_probe_dy: f32,
    pub wall_rebound: f32,
    pub obstacle_impulse: f32,
    pub obstacle_resolution: ObstacleResolution,
    pub water_drag: f32,
    pub pot_entry_margin: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            terminal_velocity: TERMINAL_VELOCITY,
            ingredient_radius: INGREDIENT_RADIUS,
            ground_rebound: GROUND_REBOUND,
            ground_friction: GROUND_FRICTION,
            air_damping: AIR_DAMPING,
            roll_threshold: ROLL_THRESHOLD,
            roll_impulse: ROLL_IMPULSE,
            roll_probe_dx: ROLL_PROBE_DX,
            roll_probe_dy: ROLL_PROBE_DY,
            wall_rebound: WALL_REBOUND,
            obstacle_impulse: OBSTACLE_IMPULSE,
            obstacle_resolution: ObstacleResolution::default(),
            water_drag: WATER_DRAG,
            pot_entry_margin: POT_ENTRY_MARGIN,
        }
    }
}

/// Shovel and brush
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolTuning {
    pub shovel_radius: f32,
    pub brush_radius: f32,
    /// Bridge material available at level start
    pub bridge_capacity: f32,
    /// Material drained per brush application
    pub bridge_cost: f32,
    pub stroke_step: f32,
}

impl Default for ToolTuning {
    fn default() -> Self {
        Self {
            shovel_radius: SHOVEL_RADIUS,
            brush_radius: BRUSH_RADIUS,
            bridge_capacity: BRIDGE_CAPACITY,
            bridge_cost: BRIDGE_COST,
            stroke_step: STROKE_STEP,
        }
    }
}

/// Level generation layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    pub start_zone_y: f32,
    pub start_zone_radius: f32,
    pub pot_depth: f32,
    pub water_zone_height: f32,
    pub water_basin_radius: f32,
    pub min_obstacles: u32,
    pub max_extra_obstacles: u32,
    pub obstacle_min_radius: f32,
    pub obstacle_radius_spread: f32,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            start_zone_y: START_ZONE_Y,
            start_zone_radius: START_ZONE_RADIUS,
            pot_depth: POT_DEPTH,
            water_zone_height: WATER_ZONE_HEIGHT,
            water_basin_radius: WATER_BASIN_RADIUS,
            min_obstacles: MIN_OBSTACLES,
            max_extra_obstacles: MAX_EXTRA_OBSTACLES,
            obstacle_min_radius: OBSTACLE_MIN_RADIUS,
            obstacle_radius_spread: OBSTACLE_RADIUS_SPREAD,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub tools: ToolTuning,
    pub layout: LayoutTuning,
}

/// Failure to read or accept a tuning file
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(LevelError),
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning: {}", e),
            TuningError::Parse(e) => write!(f, "failed to parse tuning: {}", e),
            TuningError::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl From<LevelError> for TuningError {
    fn from(e: LevelError) -> Self {
        TuningError::Invalid(e)
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!(
            "Loaded tuning from {} (obstacles: {})",
            path.display(),
            tuning.physics.obstacle_resolution.as_str()
        );
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter tuning file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), LevelError> {
        let p = &self.physics;
        let t = &self.tools;
        let l = &self.layout;

        let positive = [
            ("physics.terminal_velocity", p.terminal_velocity),
            ("physics.ingredient_radius", p.ingredient_radius),
            ("tools.shovel_radius", t.shovel_radius),
            ("tools.brush_radius", t.brush_radius),
            ("tools.stroke_step", t.stroke_step),
            ("layout.pot_depth", l.pot_depth),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LevelError::InvalidTuning(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("tools.bridge_capacity", t.bridge_capacity),
            ("tools.bridge_cost", t.bridge_cost),
            ("physics.obstacle_impulse", p.obstacle_impulse),
            ("physics.pot_entry_margin", p.pot_entry_margin),
            ("layout.obstacle_min_radius", l.obstacle_min_radius),
            ("layout.obstacle_radius_spread", l.obstacle_radius_spread),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LevelError::InvalidTuning(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        // Bodies stop at `height - radius`, so a shallower margin is never crossed
        if p.pot_entry_margin <= p.ingredient_radius {
            return Err(LevelError::InvalidTuning(format!(
                "physics.pot_entry_margin must exceed physics.ingredient_radius ({} <= {})",
                p.pot_entry_margin, p.ingredient_radius
            )));
        }

        match l.min_obstacles.checked_add(l.max_extra_obstacles) {
            Some(total) if total <= MAX_OBSTACLES => {}
            _ => {
                return Err(LevelError::InvalidTuning(format!(
                    "layout.min_obstacles + layout.max_extra_obstacles must be at most {}, got {} + {}",
                    MAX_OBSTACLES, l.min_obstacles, l.max_extra_obstacles
                )));
            }
        }

        if !p.gravity.is_finite() {
            return Err(LevelError::InvalidTuning(format!(
                "physics.gravity must be finite, got {}",
                p.gravity
            )));
        }

        Ok(())
    }
}
