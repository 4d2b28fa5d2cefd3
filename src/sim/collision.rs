//! Collision helpers for ingredients against static level geometry
//!
//! Obstacles are circles that kick an ingredient away at a fixed speed; water
//! zones are open rectangles; the field's side edges clamp the ingredient back
//! inside.

use glam::Vec2;

use super::state::{Obstacle, WaterZone};
use crate::settings::ObstacleResolution;

/// Result of testing an ingredient against a set of obstacles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleHit {
    /// Velocity replacing the ingredient's velocity
    pub velocity: Vec2,
    /// Number of obstacles that overlapped
    pub contacts: u32,
}

/// Bounce velocity off a single obstacle, `None` when not overlapping
///
/// Points from the obstacle center toward `pos`. Coincident centers push
/// along +x.
pub fn obstacle_bounce(pos: Vec2, radius: f32, obstacle: &Obstacle, strength: f32) -> Option<Vec2> {
    let delta = pos - obstacle.pos;
    if delta.length() < radius + obstacle.radius {
        let dir = delta.try_normalize().unwrap_or(Vec2::X);
        Some(dir * strength)
    } else {
        None
    }
}

/// Resolve all obstacle contacts for one step
///
/// `origin` is the ingredient's committed position and `next` its tentative
/// one. Returns the replacement velocity and the tentative position that goes
/// with it (`origin + velocity`), or `None` when nothing was touched.
pub fn resolve_obstacles(
    origin: Vec2,
    next: Vec2,
    radius: f32,
    obstacles: &[Obstacle],
    strength: f32,
    resolution: ObstacleResolution,
) -> Option<(ObstacleHit, Vec2)> {
    match resolution {
        ObstacleResolution::LastWins => {
            // Later obstacles test the position produced by earlier bounces
            let mut next = next;
            let mut hit: Option<ObstacleHit> = None;
            for obstacle in obstacles {
                if let Some(velocity) = obstacle_bounce(next, radius, obstacle, strength) {
                    next = origin + velocity;
                    let contacts = hit.map_or(0, |h| h.contacts) + 1;
                    hit = Some(ObstacleHit { velocity, contacts });
                }
            }
            hit.map(|h| (h, next))
        }
        ObstacleResolution::Averaged => {
            let mut sum = Vec2::ZERO;
            let mut last = Vec2::ZERO;
            let mut contacts = 0u32;
            for obstacle in obstacles {
                if let Some(velocity) = obstacle_bounce(next, radius, obstacle, strength) {
                    sum += velocity;
                    last = velocity;
                    contacts += 1;
                }
            }
            if contacts == 0 {
                return None;
            }
            // Opposing obstacles cancel out; fall back to the last bounce
            let velocity = sum.try_normalize().map_or(last, |dir| dir * strength);
            Some((ObstacleHit { velocity, contacts }, origin + velocity))
        }
    }
}

/// Number of water zones containing a point
pub fn water_zone_contacts(pos: Vec2, zones: &[WaterZone]) -> usize {
    zones.iter().filter(|z| z.contains(pos)).count()
}

/// Clamp x into `[radius, width - radius]`
///
/// Returns the clamped x and whether clamping happened.
pub fn clamp_to_field(x: f32, radius: f32, width: f32) -> (f32, bool) {
    if x < radius {
        (radius, true)
    } else if x > width - radius {
        (width - radius, true)
    } else {
        (x, false)
    }
}
