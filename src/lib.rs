//! Hotpot Dig - a dig-and-drop hot pot puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain raster, ingredient physics, water flood, outcomes)
//! - `session`: Frame driver with clean stop and fresh-level reset
//! - `settings`: Data-driven tuning loaded from JSON
//! - `assets`: Sprite resolution with primitive fallbacks for renderers
//! - `error`: Setup errors surfaced to the host

pub mod assets;
pub mod error;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::LevelError;
pub use session::Session;
pub use settings::{ObstacleResolution, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Downward acceleration per step (pixels/step²)
    pub const GRAVITY: f32 = 0.3;
    /// Maximum downward speed (pixels/step)
    pub const TERMINAL_VELOCITY: f32 = 8.0;

    /// Ingredient collision radius
    pub const INGREDIENT_RADIUS: f32 = 12.0;

    /// Ground contact response
    pub const GROUND_REBOUND: f32 = -0.2;
    pub const GROUND_FRICTION: f32 = 0.8;
    pub const AIR_DAMPING: f32 = 0.99;
    /// Below this horizontal speed a grounded ingredient tries to roll off
    pub const ROLL_THRESHOLD: f32 = 0.1;
    pub const ROLL_IMPULSE: f32 = 0.5;
    pub const ROLL_PROBE_DX: f32 = 5.0;
    pub const ROLL_PROBE_DY: f32 = 2.0;

    /// Side walls and screen edges reverse and halve vx
    pub const WALL_REBOUND: f32 = -0.5;

    /// Fixed speed of an obstacle bounce
    pub const OBSTACLE_IMPULSE: f32 = 5.0;
    /// Velocity multiplier per water zone a frozen ingredient touches
    pub const WATER_DRAG: f32 = 0.5;

    /// Pot entry happens below `height - POT_ENTRY_MARGIN`
    pub const POT_ENTRY_MARGIN: f32 = 20.0;

    /// Tools
    pub const SHOVEL_RADIUS: f32 = 20.0;
    pub const BRUSH_RADIUS: f32 = 8.0;
    pub const BRIDGE_CAPACITY: f32 = 100.0;
    pub const BRIDGE_COST: f32 = 0.5;
    /// Spacing of interpolated points along a drag
    pub const STROKE_STEP: f32 = 5.0;
    /// Segments a single drag is split into at most
    pub const MAX_STROKE_SEGMENTS: u32 = 1024;

    /// Level layout
    pub const START_ZONE_Y: f32 = 80.0;
    pub const START_ZONE_RADIUS: f32 = 60.0;
    pub const POT_DEPTH: f32 = 80.0;
    pub const WATER_ZONE_HEIGHT: f32 = 100.0;
    pub const WATER_BASIN_RADIUS: f32 = 60.0;
    pub const MIN_OBSTACLES: u32 = 2;
    pub const MAX_EXTRA_OBSTACLES: u32 = 3;
    /// Upper bound on `min_obstacles + max_extra_obstacles`
    pub const MAX_OBSTACLES: u32 = 64;
    pub const OBSTACLE_MIN_RADIUS: f32 = 15.0;
    pub const OBSTACLE_RADIUS_SPREAD: f32 = 10.0;
}

/// Points along a drag from `from` to `to`, spaced at most `step` apart
///
/// Includes both endpoints. A zero-length drag yields the single point `from`.
/// Very long drags are split into `MAX_STROKE_SEGMENTS` evenly spaced segments.
pub fn stroke_points(from: Vec2, to: Vec2, step: f32) -> impl Iterator<Item = Vec2> {
    let dist = from.distance(to);
    let steps = if step > 0.0 && dist.is_finite() {
        ((dist / step).ceil() as u32).min(consts::MAX_STROKE_SEGMENTS)
    } else {
        0
    };
    (0..=steps).map(move |i| {
        let t = if steps == 0 { 0.0 } else { i as f32 / steps as f32 };
        from.lerp(to, t)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_points_spacing() {
        let points: Vec<Vec2> =
            stroke_points(Vec2::new(0.0, 0.0), Vec2::new(23.0, 0.0), 5.0).collect();
        // ceil(23 / 5) = 5 segments, 6 points
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], Vec2::ZERO);
        assert_eq!(points[5], Vec2::new(23.0, 0.0));
        for pair in points.windows(2) {
            assert!(pair[0].distance(pair[1]) <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_stroke_points_tap() {
        let p = Vec2::new(40.0, 12.0);
        let points: Vec<Vec2> = stroke_points(p, p, consts::STROKE_STEP).collect();
        assert_eq!(points, vec![p]);
    }

    #[test]
    fn test_stroke_points_long_drag_is_bounded() {
        let from = Vec2::ZERO;
        let to = Vec2::new(1.0e12, 0.0);
        let points: Vec<Vec2> = stroke_points(from, to, consts::STROKE_STEP).collect();
        assert_eq!(points.len(), consts::MAX_STROKE_SEGMENTS as usize + 1);
        assert_eq!(points[0], from);
        assert_eq!(*points.last().unwrap(), to);
    }
}
