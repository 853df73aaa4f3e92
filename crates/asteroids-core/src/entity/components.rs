//! Component structs for entity kinds.
//!
//! [`Motion`] is shared by every entity. The remaining structs hold the
//! per-kind state that behaviors read and mutate.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{
    ALIEN_SPEED, ASTEROID_SCALE, ASTEROID_SCORE, INITIAL_BEAT_MS, MEDIUM_ALIEN_SCORE,
    SMALL_ALIEN_SCORE,
};
use crate::error::CoreError;
use crate::geometry::{from_polar, wrap};

/// Position, velocity and heading of an entity.
///
/// The heading (`rotation`) is independent of the direction of travel and
/// only changes through explicit turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// World position, always inside `[0, WORLD_SIZE)` on both axes.
    pub position: Vec2,
    /// Velocity in world units per tick.
    pub velocity: Vec2,
    /// Visual heading in radians.
    pub rotation: f32,
    /// Per-tick speed multiplier applied before moving, if any.
    pub friction: Option<f32>,
}

impl Motion {
    /// Creates a motion state at a position, wrapped onto the torus.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position: wrap(position),
            ..Self::default()
        }
    }

    /// Sets velocity from a speed and direction.
    pub fn set_polar(&mut self, speed: f32, direction: f32) {
        self.velocity = from_polar(speed, direction);
    }

    /// Current speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Current direction of travel; zero when stationary.
    #[must_use]
    pub fn direction(&self) -> f32 {
        if self.velocity == Vec2::ZERO {
            0.0
        } else {
            self.velocity.y.atan2(self.velocity.x)
        }
    }

    /// Integrates one step: friction, then `position += velocity * dt`,
    /// then toroidal wrap.
    pub fn advance(&mut self, dt: f32) {
        if let Some(friction) = self.friction {
            self.velocity *= friction.powf(dt);
        }
        self.position = wrap(self.position + self.velocity * dt);
    }
}

/// Asteroid size tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    /// Terminal size; splits into nothing.
    Small = 0,
    /// Splits into two small asteroids.
    Medium = 1,
    /// Splits into two medium asteroids.
    Large = 2,
}

impl AsteroidSize {
    /// Index into the per-size tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The size of the children this asteroid splits into.
    #[must_use]
    pub const fn smaller(self) -> Option<Self> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }

    /// Outline scale factor.
    #[must_use]
    pub const fn scale(self) -> f32 {
        ASTEROID_SCALE[self.index()]
    }

    /// Points for destroying an asteroid of this size.
    #[must_use]
    pub const fn score(self) -> u64 {
        ASTEROID_SCORE[self.index()]
    }
}

impl TryFrom<i32> for AsteroidSize {
    type Error = CoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Small),
            1 => Ok(Self::Medium),
            2 => Ok(Self::Large),
            _ => Err(CoreError::invalid("asteroid size", value)),
        }
    }
}

/// One of the four asteroid outline shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variety(u8);

impl Variety {
    /// Number of distinct shapes.
    pub const COUNT: u8 = 4;

    /// Picks a shape uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..Self::COUNT))
    }

    /// The shape index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for Variety {
    type Error = CoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(v) if v < Self::COUNT => Ok(Self(v)),
            _ => Err(CoreError::invalid("asteroid variety", value)),
        }
    }
}

/// Alien saucer size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlienSize {
    /// Fast, aims at the player, worth more.
    Small = 1,
    /// Slower, fires at random.
    Medium = 2,
}

impl AlienSize {
    /// Cruise speed of this size.
    #[must_use]
    pub fn speed(self) -> f32 {
        match self {
            Self::Small => ALIEN_SPEED * 1.5,
            Self::Medium => ALIEN_SPEED,
        }
    }

    /// Points awarded to the player.
    #[must_use]
    pub const fn score(self) -> u64 {
        match self {
            Self::Small => SMALL_ALIEN_SCORE,
            Self::Medium => MEDIUM_ALIEN_SCORE,
        }
    }
}

impl TryFrom<i32> for AlienSize {
    type Error = CoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Small),
            2 => Ok(Self::Medium),
            _ => Err(CoreError::invalid("alien size", value)),
        }
    }
}

/// Player ship state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipState {
    /// A raised shield absorbs one hit.
    pub shield: bool,
    /// Ignores ship destroyers until the invincibility timer fires.
    pub invincible: bool,
    /// Whether the thrust flame is currently drawn.
    pub flame: bool,
    /// Thrust was held on the last applied controls.
    pub thrusting: bool,
}

impl Default for ShipState {
    fn default() -> Self {
        Self {
            shield: false,
            invincible: true,
            flame: false,
            thrusting: false,
        }
    }
}

/// Asteroid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsteroidState {
    /// Size tier.
    pub size: AsteroidSize,
    /// Outline shape.
    pub variety: Variety,
}

/// Alien saucer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlienState {
    /// Size of the saucer.
    pub size: AlienSize,
    /// Travels right-to-left when set.
    pub heading_left: bool,
    /// Next `Move` timer changes course.
    pub time_to_move: bool,
    /// Next `Fire` timer shoots.
    pub time_to_fire: bool,
}

/// Boss state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossState {
    /// Remaining hits.
    pub health: u32,
    /// Next `Fire` timer shoots.
    pub time_to_fire: bool,
}

/// Homing missile state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissileState {
    /// Speed divisor; counts down to 1 as the motor burns.
    pub brake: f32,
    /// Whether the exhaust is drawn.
    pub flame: bool,
}

/// Ambient rhythm driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatboxState {
    /// Delay until the next beat.
    pub interval_ms: u64,
    /// Alternates between the two beat sounds.
    pub first_beat: bool,
}

impl Default for BeatboxState {
    fn default() -> Self {
        Self {
            interval_ms: INITIAL_BEAT_MS,
            first_beat: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WORLD_SIZE;

    #[test]
    fn asteroid_size_validation() {
        assert_eq!(AsteroidSize::try_from(2), Ok(AsteroidSize::Large));
        assert!(matches!(
            AsteroidSize::try_from(3),
            Err(CoreError::InvalidSpawnParameters { value: 3, .. })
        ));
        assert!(AsteroidSize::try_from(-1).is_err());
    }

    #[test]
    fn variety_validation() {
        assert_eq!(Variety::try_from(3).map(Variety::index), Ok(3));
        assert!(Variety::try_from(4).is_err());
        assert!(Variety::try_from(-2).is_err());
    }

    #[test]
    fn alien_size_validation() {
        assert_eq!(AlienSize::try_from(1), Ok(AlienSize::Small));
        assert!(AlienSize::try_from(0).is_err());
    }

    #[test]
    fn asteroid_sizes_chain_down() {
        assert_eq!(AsteroidSize::Large.smaller(), Some(AsteroidSize::Medium));
        assert_eq!(AsteroidSize::Medium.smaller(), Some(AsteroidSize::Small));
        assert_eq!(AsteroidSize::Small.smaller(), None);
        assert_eq!(AsteroidSize::Large.score(), 20);
        assert_eq!(AsteroidSize::Small.score(), 100);
    }

    #[test]
    fn motion_friction_decays_speed() {
        let mut motion = Motion::at(Vec2::new(100.0, 100.0));
        motion.velocity = Vec2::new(10.0, 0.0);
        motion.friction = Some(0.5);
        motion.advance(1.0);
        assert!((motion.speed() - 5.0).abs() < 1e-4);
        assert!((motion.position.x - 105.0).abs() < 1e-4);
    }

    #[test]
    fn motion_wraps_at_edge() {
        let mut motion = Motion::at(Vec2::new(WORLD_SIZE - 1.0, 10.0));
        motion.velocity = Vec2::new(3.0, 0.0);
        motion.advance(1.0);
        assert!((motion.position.x - 2.0).abs() < 1e-3);
    }

    #[test]
    fn direction_of_stationary_motion_is_zero() {
        let motion = Motion::default();
        assert!(motion.direction().abs() < f32::EPSILON);
    }
}
