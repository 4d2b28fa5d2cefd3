//! Frame driver for a running level
//!
//! The host calls `frame` once per display refresh. Stopping drops the level
//! for good; `reset` builds a fresh one from the next seed.

use crate::error::LevelError;
use crate::settings::Tuning;
use crate::sim::{LevelPhase, LevelState, TickInput, generate_level, tick};

/// A playable session
#[derive(Debug)]
pub struct Session {
    tuning: Tuning,
    width: u32,
    height: u32,
    seed: u64,
    /// Levels started in this session, including the current one
    attempts: u32,
    level: Option<LevelState>,
    last_phase: LevelPhase,
    stopped: bool,
}

impl Session {
    /// Validate tuning and generate the first level
    pub fn new(tuning: Tuning, width: u32, height: u32, seed: u64) -> Result<Self, LevelError> {
        tuning.validate()?;
        let level = generate_level(width, height, seed, &tuning)?;
        log::info!("Session started with seed {}", seed);
        Ok(Self {
            tuning,
            width,
            height,
            seed,
            attempts: 1,
            level: Some(level),
            last_phase: LevelPhase::Playing,
            stopped: false,
        })
    }

    /// Run exactly one tick; returns whether a step happened
    pub fn frame(&mut self, input: &TickInput) -> bool {
        let Some(level) = self.level.as_mut() else {
            return false;
        };
        if level.phase().is_terminal() {
            return false;
        }

        let phase = tick(level, input, &self.tuning);
        if phase != self.last_phase {
            let hud = level.hud();
            log::info!(
                "Attempt {} ended {:?} after {} ticks ({}/{} collected, {} failed)",
                self.attempts,
                phase,
                level.time_ticks,
                hud.collected,
                hud.total,
                hud.failed
            );
            self.last_phase = phase;
        }
        true
    }

    /// Stop the session; no further frames run and it cannot be resumed
    pub fn stop(&mut self) {
        self.stopped = true;
        if self.level.take().is_some() {
            log::info!("Session stopped after {} attempt(s)", self.attempts);
        }
    }

    /// Replace the level with a freshly generated one from the next seed
    pub fn reset(&mut self) -> Result<(), LevelError> {
        let seed = self.seed.wrapping_add(1);
        self.reset_with_seed(seed)
    }

    /// Replace the level with one generated from `seed`
    pub fn reset_with_seed(&mut self, seed: u64) -> Result<(), LevelError> {
        if self.stopped {
            return Err(LevelError::SessionStopped);
        }
        let level = generate_level(self.width, self.height, seed, &self.tuning)?;
        self.seed = seed;
        self.attempts += 1;
        self.level = Some(level);
        self.last_phase = LevelPhase::Playing;
        log::info!("Level reset (attempt {}, seed {})", self.attempts, seed);
        Ok(())
    }

    pub fn level(&self) -> Option<&LevelState> {
        self.level.as_ref()
    }

    /// Whether frames still advance the simulation
    pub fn is_running(&self) -> bool {
        self.level
            .as_ref()
            .is_some_and(|level| !level.phase().is_terminal())
    }

    pub fn phase(&self) -> Option<LevelPhase> {
        self.level.as_ref().map(|level| level.phase())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn session() -> Session {
        Session::new(Tuning::default(), 400, 600, 77).unwrap()
    }

    #[test]
    fn test_frame_steps_once() {
        let mut s = session();
        assert!(s.is_running());
        assert!(s.frame(&TickInput::default()));
        assert!(s.frame(&TickInput::default()));
        assert_eq!(s.level().unwrap().time_ticks, 2);
    }

    #[test]
    fn test_stop_is_final() {
        let mut s = session();
        s.frame(&TickInput::default());
        s.stop();
        assert!(!s.is_running());
        assert!(s.level().is_none());
        assert!(!s.frame(&TickInput::default()));
        // Stopping twice is harmless
        s.stop();
        assert!(s.phase().is_none());
    }

    #[test]
    fn test_reset_builds_fresh_level() {
        let mut s = session();
        for _ in 0..10 {
            s.frame(&TickInput::default());
        }
        let old_ingredients: Vec<Vec2> =
            s.level().unwrap().ingredients().iter().map(|i| i.pos).collect();

        s.reset().unwrap();
        assert_eq!(s.seed(), 78);
        assert_eq!(s.attempts(), 2);
        let level = s.level().unwrap();
        assert_eq!(level.time_ticks, 0);
        assert_eq!(level.phase(), LevelPhase::Playing);
        assert_eq!(level.bridge_material(), s.tuning().tools.bridge_capacity);
        let fresh: Vec<Vec2> = level.ingredients().iter().map(|i| i.pos).collect();
        assert_ne!(old_ingredients, fresh);
    }

    #[test]
    fn test_stopped_session_cannot_reset() {
        let mut s = session();
        s.stop();
        assert_eq!(s.reset(), Err(LevelError::SessionStopped));
        assert!(!s.is_running());
        assert!(!s.frame(&TickInput::default()));
    }

    #[test]
    fn test_reset_with_explicit_seed() {
        let mut s = session();
        s.reset_with_seed(5).unwrap();
        assert_eq!(s.seed(), 5);
        assert!(s.is_running());
        assert!(s.frame(&TickInput::default()));
    }

    #[test]
    fn test_invalid_setup_is_rejected() {
        let mut tuning = Tuning::default();
        tuning.physics.ingredient_radius = -1.0;
        assert!(matches!(
            Session::new(tuning, 400, 600, 1),
            Err(LevelError::InvalidTuning(_))
        ));
        let mut tuning = Tuning::default();
        tuning.layout.min_obstacles = u32::MAX;
        tuning.layout.max_extra_obstacles = u32::MAX;
        assert!(matches!(
            Session::new(tuning, 400, 600, 1),
            Err(LevelError::InvalidTuning(_))
        ));
        assert!(matches!(
            Session::new(Tuning::default(), 0, 600, 1),
            Err(LevelError::EmptyField { .. })
        ));
    }
}
