//! Falling ingredient physics
//!
//! An ingredient advances by exactly one fixed step per call. There is no dt:
//! velocities are in pixels per step and every constant is tuned for that.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{clamp_to_field, resolve_obstacles, water_zone_contacts};
use super::state::{Obstacle, WaterZone};
use super::terrain::TerrainField;
use crate::settings::PhysicsTuning;

/// What an ingredient is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    Meatball,
    Vegetable,
    Mushroom,
    FrozenMeat,
    Meat,
}

impl MaterialKind {
    /// Kinds that can be picked for the random part of a roster
    pub const RANDOM_ROSTER: [MaterialKind; 3] = [
        MaterialKind::Meatball,
        MaterialKind::Vegetable,
        MaterialKind::Mushroom,
    ];

    /// Kind after soaking in warm water, `None` if water has no effect
    pub fn thawed(self) -> Option<MaterialKind> {
        match self {
            MaterialKind::FrozenMeat => Some(MaterialKind::Meat),
            _ => None,
        }
    }

    pub fn is_frozen(self) -> bool {
        self == MaterialKind::FrozenMeat
    }
}

/// Whether an ingredient may legally enter the pot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThermalState {
    Frozen,
    Normal,
    Cooked,
}

/// What happened to an ingredient during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub grounded: bool,
    pub bounced: bool,
    pub thawed: bool,
    pub entered_pot: bool,
}

/// A falling ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    radius: f32,
    kind: MaterialKind,
    /// Set on entering the pot unfrozen; a frozen kind is never cooked
    cooked: bool,
    pub in_pot: bool,
    pub active: bool,
}

impl Ingredient {
    pub fn new(id: u32, pos: Vec2, kind: MaterialKind, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            kind,
            cooked: false,
            in_pot: false,
            active: true,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    /// Thermal state follows from the kind: only frozen meat is frozen
    pub fn thermal(&self) -> ThermalState {
        if self.kind.is_frozen() {
            ThermalState::Frozen
        } else if self.cooked {
            ThermalState::Cooked
        } else {
            ThermalState::Normal
        }
    }

    /// Apply the water transition; returns whether the kind changed
    fn thaw(&mut self) -> bool {
        match self.kind.thawed() {
            Some(kind) => {
                self.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Advance by one step against terrain, obstacles and water zones
    pub fn step(
        &mut self,
        terrain: &TerrainField,
        obstacles: &[Obstacle],
        zones: &[WaterZone],
        tuning: &PhysicsTuning,
    ) -> StepReport {
        let mut report = StepReport::default();
        if !self.active || self.in_pot {
            return report;
        }

        let r = self.radius;

        // Gravity, capped at terminal velocity
        self.vel.y = (self.vel.y + tuning.gravity).min(tuning.terminal_velocity);

        let mut next = self.pos + self.vel;

        // Ground
        if terrain.is_occupied(next.x, next.y + r) {
            report.grounded = true;
            self.vel.y *= tuning.ground_rebound;
            self.vel.x *= tuning.ground_friction;
            next.y = self.pos.y;

            // Stuck on a flat spot: roll toward an open side, left first
            if self.vel.x.abs() < tuning.roll_threshold {
                let probe_y = self.pos.y + r + tuning.roll_probe_dy;
                if !terrain.is_occupied(self.pos.x - tuning.roll_probe_dx, probe_y) {
                    self.vel.x -= tuning.roll_impulse;
                } else if !terrain.is_occupied(self.pos.x + tuning.roll_probe_dx, probe_y) {
                    self.vel.x += tuning.roll_impulse;
                }
            }
        } else {
            self.vel.x *= tuning.air_damping;
        }

        // Side walls
        if terrain.is_occupied(next.x + r, self.pos.y) || terrain.is_occupied(next.x - r, self.pos.y)
        {
            self.vel.x *= tuning.wall_rebound;
            next.x = self.pos.x;
        }

        if let Some((hit, bounced_next)) = resolve_obstacles(
            self.pos,
            next,
            r,
            obstacles,
            tuning.obstacle_impulse,
            tuning.obstacle_resolution,
        ) {
            report.bounced = true;
            self.vel = hit.velocity;
            next = bounced_next;
            log::debug!(
                "Ingredient {} bounced off {} obstacle(s)",
                self.id,
                hit.contacts
            );
        }

        // Warm water: drag applies once per containing zone
        if self.thermal() == ThermalState::Frozen {
            let soaks = water_zone_contacts(next, zones);
            if soaks > 0 {
                report.thawed = self.thaw();
                self.vel *= tuning.water_drag.powi(soaks as i32);
                log::debug!("Ingredient {} thawed in {} zone(s)", self.id, soaks);
            }
        }

        self.pos = next;

        let (x, clamped) = clamp_to_field(self.pos.x, r, terrain.width() as f32);
        if clamped {
            self.pos.x = x;
            self.vel.x *= tuning.wall_rebound;
        }

        if self.pos.y > terrain.height() as f32 - tuning.pot_entry_margin {
            self.in_pot = true;
            report.entered_pot = true;
            if self.thermal() != ThermalState::Frozen {
                self.cooked = true;
            }
            log::debug!(
                "Ingredient {} ({:?}) entered the pot {:?}",
                self.id,
                self.kind,
                self.thermal()
            );
        }

        report
    }
}
