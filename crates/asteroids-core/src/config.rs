//! Game configuration and tuning constants.
//!
//! [`GameConfig`] carries the knobs a host may want to change per session
//! (ruleset, seed, tick cadence, limits). Everything else is a fixed tuning
//! constant of the arcade rules.
//!
//! Distances are world units, speeds are world units per tick and delays are
//! simulated milliseconds.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Side length of the square, toroidal playfield.
pub const WORLD_SIZE: f32 = 750.0;

/// Distance of the four asteroid spawn slots from the world edges.
pub const EDGE_OFFSET: f32 = 100.0;

/// Default simulated milliseconds per tick.
pub const FRAME_INTERVAL_MS: u64 = 33;

/// Delay before a scheduled transition (respawn, level advance) resolves.
pub const END_DELAY_MS: u64 = 2500;

/// Lives at the start of a game.
pub const STARTING_LIVES: u32 = 3;

/// Player bullets allowed in flight at once.
pub const BULLET_LIMIT: usize = 8;

/// Homing missiles allowed in flight at once.
pub const MISSILE_LIMIT: u32 = 2;

/// Points between extra lives in the enhanced ruleset.
pub const EXTRA_LIFE_STEP: u64 = 5000;

// Ship
/// Speed added per tick while thrusting.
pub const SHIP_ACCELERATION: f32 = 0.4;
/// Per-tick speed multiplier applied before the ship moves.
pub const SHIP_FRICTION: f32 = 0.995;
/// Upper bound on ship speed.
pub const SHIP_MAX_SPEED: f32 = 15.0;
/// Heading change per tick while a turn control is held.
pub const SHIP_TURN: f32 = PI / 16.0;
/// Invincibility window after a ship is placed.
pub const SHIP_INVINCIBLE_MS: u64 = 1000;
/// Lifetime of one thrust-flame frame.
pub const FLAME_FLICKER_MS: u64 = 10;

// Projectiles
/// Speed of player, alien and boss bullets.
pub const BULLET_SPEED: f32 = 15.0;
/// Lifetime of player and alien bullets.
pub const BULLET_DURATION_MS: u64 = 1000;
/// Extra lifetime given to boss bullets.
pub const BOSS_BULLET_EXTRA_MS: u64 = 500;
/// Lifetime of a homing missile.
pub const MISSILE_LIFETIME_MS: u64 = 10_000;
/// Delay before a missile's first burn.
pub const MISSILE_FIRST_BURN_MS: u64 = 75;
/// Interval between missile burns.
pub const MISSILE_BURN_MS: u64 = 50;

// Asteroids
/// Outline scale by asteroid size (small, medium, large).
pub const ASTEROID_SCALE: [f32; 3] = [0.5, 1.0, 2.0];
/// Points by asteroid size (small, medium, large).
pub const ASTEROID_SCORE: [u64; 3] = [100, 50, 20];
/// Speed of the asteroids placed at the start of a level.
pub const ASTEROID_BASE_SPEED: f32 = 3.0;

// Aliens
/// Dormant period before an alien or boss enters the playfield.
pub const ALIEN_DELAY_MS: u64 = 5000;
/// Interval of the alien move/fire cadence.
pub const ALIEN_CADENCE_MS: u64 = 750;
/// Base alien speed; small aliens fly half again as fast.
pub const ALIEN_SPEED: f32 = 5.0;
/// Points for a small alien.
pub const SMALL_ALIEN_SCORE: u64 = 1000;
/// Points for a medium alien.
pub const MEDIUM_ALIEN_SCORE: u64 = 200;

// Boss
/// Points for destroying the boss.
pub const BOSS_SCORE: u64 = 5000;
/// Boss drift speed after it spawns.
pub const BOSS_SPEED: f32 = 5.0;
/// Delay between boss spawn and the boss stopping.
pub const BOSS_STOP_AFTER_MS: u64 = 1000;
/// Delay between boss spawn and its first volley.
pub const BOSS_FIRST_FIRE_AFTER_MS: u64 = 1500;
/// Gap between the boss firing and resting.
pub const BOSS_VOLLEY_MS: u64 = 250;
/// Boss resting time between volleys.
pub const BOSS_REST_MS: u64 = 1500;
/// Every this-many levels the enhanced ruleset fields a boss.
pub const BOSS_LEVEL_INTERVAL: u32 = 5;

// Debris
/// Upper bound (exclusive) on debris and dust lifetime.
pub const DEBRIS_MAX_LIFETIME_MS: u64 = 2000;

// Ambient rhythm
/// First beat interval of a level.
pub const INITIAL_BEAT_MS: u64 = 900;
/// Shortest beat interval.
pub const FASTEST_BEAT_MS: u64 = 300;
/// Amount each beat shortens the next one.
pub const BEAT_DELTA_MS: u64 = 15;

/// Which rule set the session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ruleset {
    /// The arcade rules.
    #[default]
    Classic,
    /// Adds best score, extra lives, shields, teleport and boss levels.
    Enhanced,
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rule set to play.
    pub ruleset: Ruleset,
    /// Seed for the session's random number generator.
    pub seed: u64,
    /// Simulated milliseconds per tick.
    pub frame_interval_ms: u64,
    /// Lives at the start of a game.
    pub starting_lives: u32,
    /// Player bullets allowed in flight at once.
    pub bullet_limit: usize,
    /// Homing missiles allowed in flight at once.
    pub missile_limit: u32,
    /// Points between extra lives (enhanced only).
    pub extra_life_step: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::Classic,
            seed: 0,
            frame_interval_ms: FRAME_INTERVAL_MS,
            starting_lives: STARTING_LIVES,
            bullet_limit: BULLET_LIMIT,
            missile_limit: MISSILE_LIMIT,
            extra_life_step: EXTRA_LIFE_STEP,
        }
    }
}

impl GameConfig {
    /// Creates a default enhanced-ruleset config with the given seed.
    #[must_use]
    pub fn enhanced(seed: u64) -> Self {
        Self {
            ruleset: Ruleset::Enhanced,
            seed,
            ..Self::default()
        }
    }

    /// Returns true when the enhanced ruleset is active.
    #[must_use]
    pub fn is_enhanced(&self) -> bool {
        self.ruleset == Ruleset::Enhanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let config = GameConfig::default();
        assert_eq!(config.ruleset, Ruleset::Classic);
        assert_eq!(config.frame_interval_ms, FRAME_INTERVAL_MS);
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.bullet_limit, BULLET_LIMIT);
        assert!(!config.is_enhanced());
    }

    #[test]
    fn enhanced_constructor() {
        let config = GameConfig::enhanced(7);
        assert!(config.is_enhanced());
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn config_is_serializable() {
        let config = GameConfig::enhanced(99);
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"ruleset":"enhanced"}"#).unwrap();
        assert!(config.is_enhanced());
        assert_eq!(config.bullet_limit, BULLET_LIMIT);
        assert_eq!(config.seed, 0);
    }
}
