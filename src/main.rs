//! Hotpot Dig - headless driver
//!
//! Generates a level, digs a route from the start zone through the warm water
//! to the pot, runs frames until the level ends, then plays the classic grid
//! level. Usage: `hotpot-dig [seed] [tuning.json]`

use std::env;

use anyhow::{Context, Result};
use glam::Vec2;

use hotpot_dig::Tuning;
use hotpot_dig::assets::{AssetCatalog, DEFAULT_MANIFEST, Sprite, sprite_for_ingredient};
use hotpot_dig::session::Session;
use hotpot_dig::sim::{DigResult, GridLevel, LevelState, Stroke, TickInput, Tool};

const FIELD_WIDTH: u32 = 400;
const FIELD_HEIGHT: u32 = 600;
const MAX_FRAMES: u32 = 3600;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("seed must be an unsigned integer, got '{}'", arg))?,
        None => 1,
    };
    let tuning = match args.next() {
        Some(path) => {
            Tuning::load(&path).with_context(|| format!("failed to load tuning from {}", path))?
        }
        None => Tuning::default(),
    };

    log::info!("Hotpot Dig (headless) starting with seed {}", seed);

    let mut session = Session::new(tuning, FIELD_WIDTH, FIELD_HEIGHT, seed)
        .context("failed to start session")?;

    let route = session
        .level()
        .map(dig_route)
        .context("session has no level")?;
    let mut input = TickInput { strokes: route };

    let mut frames = 0;
    while frames < MAX_FRAMES && session.frame(&input) {
        // Route is dug once, on the first frame
        input.strokes.clear();
        frames += 1;
    }

    if let Some(level) = session.level() {
        let hud = level.hud();
        log::info!(
            "After {} frames: {:?}, {}/{} collected, {} failed, bridge {:.1}/{:.1}",
            frames,
            level.phase(),
            hud.collected,
            hud.total,
            hud.failed,
            hud.bridge_material,
            hud.bridge_capacity
        );
        log_sprites(level).context("failed to read asset manifest")?;
    }
    session.stop();

    play_classic_grid().context("failed to build classic grid level")?;

    Ok(())
}

/// Start zone down to the water basin, then straight down into the pot
fn dig_route(level: &LevelState) -> Vec<Stroke> {
    let width = level.terrain().width() as f32;
    let height = level.terrain().height() as f32;
    let start = Vec2::new(width / 2.0, 80.0);
    let basin = level
        .water_zones()
        .first()
        .map(|zone| zone.center())
        .unwrap_or(start);
    let pot = Vec2::new(basin.x, height - 40.0);

    vec![
        Stroke {
            tool: Tool::Shovel,
            from: start,
            to: basin,
        },
        Stroke {
            tool: Tool::Shovel,
            from: basin,
            to: pot,
        },
    ]
}

/// What a renderer would draw before any image has loaded
fn log_sprites(level: &LevelState) -> Result<()> {
    let catalog = AssetCatalog::from_manifest_json(DEFAULT_MANIFEST)?;
    for ingredient in level.ingredients() {
        match sprite_for_ingredient(&catalog, ingredient) {
            Sprite::Image { key, size } => {
                log::info!("Ingredient {}: image {:?} at {:.1}px", ingredient.id, key, size)
            }
            Sprite::Fallback { shape, size, .. } => {
                log::info!("Ingredient {}: {:?} at {:.1}px", ingredient.id, shape, size)
            }
        }
    }
    Ok(())
}

/// Dig next to the water until it floods into the pot
fn play_classic_grid() -> Result<()> {
    let mut grid = GridLevel::classic()?;
    let path = [(1, 1), (4, 3), (5, 3), (6, 3), (7, 3), (7, 4), (2, 2)];
    for (row, col) in path {
        match grid.dig(row, col) {
            DigResult::Dug(phase) => log::info!("Dug ({}, {}): {:?}", row, col, phase),
            DigResult::NotDiggable => log::warn!("Cell ({}, {}) cannot be dug", row, col),
            DigResult::Finished => {
                log::info!("Grid level already over, ignoring ({}, {})", row, col);
                break;
            }
        }
    }
    for row in grid.grid().to_codes() {
        log::info!("{:?}", row);
    }
    Ok(())
}
