//! Sprite resolution for renderers
//!
//! The simulation never touches assets. A renderer asks a resolver which
//! images are ready and draws a primitive shape for anything that is not.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::sim::{Ingredient, MaterialKind, Obstacle, ObstacleKind};

/// Image drawn this much larger than an ingredient's radius
pub const INGREDIENT_SPRITE_SCALE: f32 = 2.2;
/// Image drawn this much larger than an obstacle's radius
pub const OBSTACLE_SPRITE_SCALE: f32 = 2.5;

/// Manifest bundled with the game
pub const DEFAULT_MANIFEST: &str = r#"{
    "meatball": "assets/meatball.png",
    "vegetable": "assets/vegetable.png",
    "mushroom": "assets/mushroom.png",
    "frozen_meat": "assets/frozen_meat.png",
    "meat": "assets/meat.png",
    "chili": "assets/chili.png",
    "pepper": "assets/pepper.png"
}"#;

/// Every drawable entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKey {
    Meatball,
    Vegetable,
    Mushroom,
    FrozenMeat,
    Meat,
    Chili,
    Pepper,
}

impl AssetKey {
    pub const ALL: [AssetKey; 7] = [
        AssetKey::Meatball,
        AssetKey::Vegetable,
        AssetKey::Mushroom,
        AssetKey::FrozenMeat,
        AssetKey::Meat,
        AssetKey::Chili,
        AssetKey::Pepper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKey::Meatball => "meatball",
            AssetKey::Vegetable => "vegetable",
            AssetKey::Mushroom => "mushroom",
            AssetKey::FrozenMeat => "frozen_meat",
            AssetKey::Meat => "meat",
            AssetKey::Chili => "chili",
            AssetKey::Pepper => "pepper",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl From<MaterialKind> for AssetKey {
    fn from(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Meatball => AssetKey::Meatball,
            MaterialKind::Vegetable => AssetKey::Vegetable,
            MaterialKind::Mushroom => AssetKey::Mushroom,
            MaterialKind::FrozenMeat => AssetKey::FrozenMeat,
            MaterialKind::Meat => AssetKey::Meat,
        }
    }
}

impl From<ObstacleKind> for AssetKey {
    fn from(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::Chili => AssetKey::Chili,
            ObstacleKind::Pepper => AssetKey::Pepper,
        }
    }
}

/// Primitive used when no image is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Circle,
    Square,
}

/// What to draw for an entity, centered on its position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sprite {
    /// Loaded image, drawn `size` pixels wide and tall
    Image { key: AssetKey, size: f32 },
    /// Flat shape spanning the entity's diameter
    Fallback {
        shape: Shape,
        color: [f32; 4],
        size: f32,
    },
}

/// 0xRRGGBB as opaque RGBA in 0..=1
const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Fallback shape and color per key
pub fn fallback_style(key: AssetKey) -> (Shape, [f32; 4]) {
    match key {
        AssetKey::Meatball => (Shape::Circle, rgb(0xd97706)),
        AssetKey::Vegetable => (Shape::Circle, rgb(0x22c55e)),
        AssetKey::Mushroom => (Shape::Circle, rgb(0xd6d3d1)),
        AssetKey::FrozenMeat => (Shape::Square, rgb(0x93c5fd)),
        AssetKey::Meat => (Shape::Square, rgb(0xef4444)),
        AssetKey::Chili | AssetKey::Pepper => (Shape::Circle, rgb(0xdc2626)),
    }
}

/// Answers whether an image for a key is ready to draw
pub trait AssetResolver {
    fn is_ready(&self, key: AssetKey) -> bool;
}

fn sprite_for(resolver: &impl AssetResolver, key: AssetKey, radius: f32, scale: f32) -> Sprite {
    if resolver.is_ready(key) {
        Sprite::Image {
            key,
            size: radius * scale,
        }
    } else {
        let (shape, color) = fallback_style(key);
        Sprite::Fallback {
            shape,
            color,
            size: radius * 2.0,
        }
    }
}

pub fn sprite_for_ingredient(resolver: &impl AssetResolver, ingredient: &Ingredient) -> Sprite {
    sprite_for(
        resolver,
        ingredient.kind().into(),
        ingredient.radius(),
        INGREDIENT_SPRITE_SCALE,
    )
}

pub fn sprite_for_obstacle(resolver: &impl AssetResolver, obstacle: &Obstacle) -> Sprite {
    sprite_for(
        resolver,
        obstacle.kind.into(),
        obstacle.radius,
        OBSTACLE_SPRITE_SCALE,
    )
}

/// Load state of one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
struct AssetEntry {
    source: String,
    status: AssetStatus,
}

/// Image sources and their load state, filled in by the host as fetches finish
#[derive(Debug, Default)]
pub struct AssetCatalog {
    entries: HashMap<AssetKey, AssetEntry>,
    /// Keys already reported as missing, one bit per key
    warned: Cell<u8>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `{ "key": "source" }` manifest; unknown keys are skipped
    pub fn from_manifest_json(json: &str) -> Result<Self, serde_json::Error> {
        let manifest: BTreeMap<String, String> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for (name, source) in manifest {
            match AssetKey::from_name(&name) {
                Some(key) => catalog.insert(key, source),
                None => log::warn!("Ignoring unknown asset key '{}'", name),
            }
        }
        log::info!("Asset manifest lists {} images", catalog.entries.len());
        Ok(catalog)
    }

    pub fn insert(&mut self, key: AssetKey, source: impl Into<String>) {
        self.entries.insert(
            key,
            AssetEntry {
                source: source.into(),
                status: AssetStatus::Pending,
            },
        );
    }

    /// Source to fetch for a key
    pub fn source(&self, key: AssetKey) -> Option<&str> {
        self.entries.get(&key).map(|e| e.source.as_str())
    }

    pub fn status(&self, key: AssetKey) -> Option<AssetStatus> {
        self.entries.get(&key).map(|e| e.status)
    }

    /// Keys still waiting on the host
    pub fn pending(&self) -> impl Iterator<Item = AssetKey> + '_ {
        AssetKey::ALL
            .into_iter()
            .filter(|k| self.status(*k) == Some(AssetStatus::Pending))
    }

    pub fn mark_loaded(&mut self, key: AssetKey) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.status = AssetStatus::Loaded;
        }
    }

    /// Record a failed fetch; drawing falls back to a shape
    pub fn mark_failed(&mut self, key: AssetKey) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.status = AssetStatus::Failed;
        }
        self.warn_missing(key);
    }

    fn warn_missing(&self, key: AssetKey) {
        let warned = self.warned.get();
        if warned & key.bit() == 0 {
            self.warned.set(warned | key.bit());
            log::warn!("Asset '{}' unavailable, drawing fallback shape", key.as_str());
        }
    }
}

impl AssetResolver for AssetCatalog {
    fn is_ready(&self, key: AssetKey) -> bool {
        match self.status(key) {
            Some(AssetStatus::Loaded) => true,
            // Still loading; not an error yet
            Some(AssetStatus::Pending) => false,
            Some(AssetStatus::Failed) | None => {
                self.warn_missing(key);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_default_manifest_covers_every_key() {
        let catalog = AssetCatalog::from_manifest_json(DEFAULT_MANIFEST).unwrap();
        for key in AssetKey::ALL {
            assert_eq!(catalog.status(key), Some(AssetStatus::Pending));
            assert!(catalog.source(key).unwrap().ends_with(".png"));
        }
        assert_eq!(catalog.pending().count(), 7);
    }

    #[test]
    fn test_unknown_keys_skipped() {
        let catalog =
            AssetCatalog::from_manifest_json(r#"{"meat": "m.png", "tofu": "t.png"}"#).unwrap();
        assert_eq!(catalog.source(AssetKey::Meat), Some("m.png"));
        assert_eq!(catalog.pending().count(), 1);
        assert!(AssetCatalog::from_manifest_json("[1, 2]").is_err());
    }

    #[test]
    fn test_loaded_image_sprite() {
        let mut catalog = AssetCatalog::from_manifest_json(DEFAULT_MANIFEST).unwrap();
        catalog.mark_loaded(AssetKey::Meatball);
        let ing = Ingredient::new(1, Vec2::ZERO, MaterialKind::Meatball, 12.0);
        match sprite_for_ingredient(&catalog, &ing) {
            Sprite::Image { key, size } => {
                assert_eq!(key, AssetKey::Meatball);
                assert!((size - 26.4).abs() < 1e-4);
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_fallback_shapes() {
        let mut catalog = AssetCatalog::new();
        catalog.insert(AssetKey::FrozenMeat, "f.png");
        catalog.mark_failed(AssetKey::FrozenMeat);

        let frozen = Ingredient::new(1, Vec2::ZERO, MaterialKind::FrozenMeat, 12.0);
        assert_eq!(
            sprite_for_ingredient(&catalog, &frozen),
            Sprite::Fallback {
                shape: Shape::Square,
                color: rgb(0x93c5fd),
                size: 24.0,
            }
        );

        let chili = Obstacle {
            pos: Vec2::ZERO,
            radius: 20.0,
            kind: ObstacleKind::Chili,
        };
        assert_eq!(
            sprite_for_obstacle(&catalog, &chili),
            Sprite::Fallback {
                shape: Shape::Circle,
                color: rgb(0xdc2626),
                size: 40.0,
            }
        );
    }

    #[test]
    fn test_missing_asset_warned_once() {
        let catalog = AssetCatalog::new();
        assert!(!catalog.is_ready(AssetKey::Pepper));
        assert_eq!(catalog.warned.get(), AssetKey::Pepper.bit());
        assert!(!catalog.is_ready(AssetKey::Pepper));
        assert_eq!(catalog.warned.get(), AssetKey::Pepper.bit());
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(AssetKey::from(MaterialKind::Meat), AssetKey::Meat);
        assert_eq!(AssetKey::from(ObstacleKind::Pepper), AssetKey::Pepper);
        assert_eq!(AssetKey::from_name("frozen_meat"), Some(AssetKey::FrozenMeat));
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
    }
}
