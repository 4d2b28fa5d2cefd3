//! Seeded level generation
//!
//! Same seed and tuning always give the same level: dirt field with a cleared
//! start zone and pot strip, one warm water basin on a random side, a roster of
//! two random ingredients plus one frozen meat, and a handful of obstacles.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::MaterialKind;
use super::state::{LevelState, Obstacle, ObstacleKind, WaterZone};
use super::terrain::TerrainField;
use crate::error::LevelError;
use crate::settings::Tuning;

/// Horizontal offset of the two random ingredients from the center line
const ROSTER_SPREAD: f32 = 20.0;
/// Height the frozen meat drops from
const FROZEN_SPAWN_Y: f32 = 50.0;

/// Smallest field the layout fits in
pub fn min_field_size(tuning: &Tuning) -> (u32, u32) {
    let layout = &tuning.layout;
    let min_width = (tuning.physics.ingredient_radius * 2.0).ceil() as u32 + 1;
    let min_height =
        (layout.pot_depth + layout.start_zone_y + layout.start_zone_radius).ceil() as u32 + 1;
    (min_width, min_height)
}

/// Build a playable level
pub fn generate_level(
    width: u32,
    height: u32,
    seed: u64,
    tuning: &Tuning,
) -> Result<LevelState, LevelError> {
    let mut terrain = TerrainField::new(width, height)?;
    let (min_width, min_height) = min_field_size(tuning);
    if width < min_width || height < min_height {
        return Err(LevelError::FieldTooSmall {
            width,
            height,
            min_width,
            min_height,
        });
    }

    let mut rng = Pcg32::seed_from_u64(seed);
    let layout = &tuning.layout;
    let w = width as f32;
    let h = height as f32;

    // Start zone and pot strip
    terrain.clear_circle(w / 2.0, layout.start_zone_y, layout.start_zone_radius);
    terrain.clear_rect(0.0, h - layout.pot_depth, w, layout.pot_depth);

    // Warm water basin on a random side
    let zone_x = if rng.random_bool(0.5) { w * 0.15 } else { w * 0.65 };
    let zone_y = h * (0.35 + rng.random::<f32>() * 0.2);
    let zone = WaterZone {
        x: zone_x,
        y: zone_y,
        w: w * 0.2,
        h: layout.water_zone_height,
    };
    terrain.clear_circle(
        zone_x + w * 0.1,
        zone_y + layout.water_zone_height / 2.0,
        layout.water_basin_radius,
    );

    let mut level = LevelState::new(seed, terrain, tuning);
    level.add_water_zone(zone);

    // Roster: two random kinds either side of center, frozen meat above them
    for dx in [-ROSTER_SPREAD, ROSTER_SPREAD] {
        let roster = MaterialKind::RANDOM_ROSTER;
        let kind = roster[rng.random_range(0..roster.len())];
        let vx = rng.random_range(-1.0..1.0);
        level.spawn_ingredient(Vec2::new(w / 2.0 + dx, layout.start_zone_y), kind, vx, tuning);
    }
    let vx = rng.random_range(-1.0..1.0);
    level.spawn_ingredient(
        Vec2::new(w / 2.0, FROZEN_SPAWN_Y),
        MaterialKind::FrozenMeat,
        vx,
        tuning,
    );

    let extra = (rng.random::<f32>() * layout.max_extra_obstacles as f32).floor() as u32;
    let count = layout.min_obstacles.saturating_add(extra);
    for _ in 0..count {
        let x = w * 0.2 + rng.random::<f32>() * w * 0.6;
        let y = h * 0.3 + rng.random::<f32>() * h * 0.4;
        let radius =
            layout.obstacle_min_radius + rng.random::<f32>() * layout.obstacle_radius_spread;
        let kind = if rng.random_bool(0.5) {
            ObstacleKind::Chili
        } else {
            ObstacleKind::Pepper
        };
        level.add_obstacle(Obstacle {
            pos: Vec2::new(x, y),
            radius,
            kind,
        });
    }

    log::info!(
        "Generated level {} ({}x{}): water at x={:.0} y={:.0}, {} obstacles, {} ingredients",
        seed,
        width,
        height,
        zone_x,
        zone_y,
        count,
        level.ingredients().len()
    );

    Ok(level)
}
