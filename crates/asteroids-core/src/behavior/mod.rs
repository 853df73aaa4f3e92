//! Per-kind entity behaviors.
//!
//! Every [`EntityKind`] maps to one [`Behavior`] implementation. The world
//! calls [`Behavior::collide`] for each side of an overlapping pair and
//! [`Behavior::on_timer`] for each due timer whose owner is still alive.
//!
//! # Rules for behaviors
//!
//! A behavior may mutate the entity it was handed (expire it, change its
//! velocity, swap its outline, decrement its health). Anything else goes
//! through the [`Ctx`] as an [`Output`]:
//! - new entities ([`Ctx::spawn`])
//! - timers on itself or its children ([`Ctx::schedule`])
//! - score, notices and sounds for the game
//!
//! Collision relevance is decided from the other party's [`Destroys`] set,
//! never from its concrete kind, with the few exceptions the arcade rules
//! spell out (bullets stop on specific kinds, the shield pickup looks for the
//! ship).
//!
//! [`Destroys`]: crate::entity::Destroys
//!
//! # Example
//!
//! ```
//! use asteroids_core::behavior::{self, Ctx, Sightings};
//! use asteroids_core::entity::EntityKind;
//! use asteroids_core::timer::TimerTag;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut beatbox = behavior::beatbox();
//! let mut rng = ChaCha8Rng::seed_from_u64(0);
//! let mut outputs = Vec::new();
//! let sightings = Sightings::default();
//! let mut ctx = Ctx::new(&mut rng, &sightings, &mut outputs);
//!
//! behavior::for_kind(EntityKind::Beatbox).on_timer(&mut beatbox, TimerTag::Beat, &mut ctx);
//! assert_eq!(outputs.len(), 2); // a beat sound and the next beat timer
//! ```

pub mod alien;
pub mod asteroid;
pub mod boss;
pub mod debris;
pub mod projectile;
pub mod ship;

use glam::Vec2;
use rand_chacha::ChaCha8Rng;

use crate::entity::{Contact, Entity, EntityId, EntityKind};
use crate::output::{Notice, Output, SoundKind};
use crate::timer::TimerTag;

pub use debris::{beatbox, shield};

// =============================================================================
// Sightings
// =============================================================================

/// What behaviors may know about the rest of the world.
///
/// Taken by the game before each pass. Aliens and the boss aim at the
/// player; missiles home on the alien.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sightings {
    /// Position of the live player ship.
    pub player: Option<Vec2>,
    /// Position of the live alien saucer.
    pub alien: Option<Vec2>,
}

// =============================================================================
// Context
// =============================================================================

/// Handle through which a behavior reaches the outside world.
pub struct Ctx<'a> {
    rng: &'a mut ChaCha8Rng,
    sightings: &'a Sightings,
    outputs: &'a mut Vec<Output>,
}

impl<'a> Ctx<'a> {
    /// Creates a context writing to `outputs`.
    pub fn new(
        rng: &'a mut ChaCha8Rng,
        sightings: &'a Sightings,
        outputs: &'a mut Vec<Output>,
    ) -> Self {
        Self {
            rng,
            sightings,
            outputs,
        }
    }

    /// The session random number generator.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut *self.rng
    }

    /// Positions of the player and the alien.
    #[must_use]
    pub fn sightings(&self) -> &Sightings {
        self.sightings
    }

    /// Queues a new entity.
    pub fn spawn(&mut self, entity: Entity) {
        self.outputs.push(Output::Spawn(Box::new(entity)));
    }

    /// Arms a timer.
    pub fn schedule(&mut self, owner: EntityId, tag: TimerTag, delay_ms: u64) {
        self.outputs.push(Output::Schedule {
            owner,
            tag,
            delay_ms,
        });
    }

    /// Credits points to the player.
    pub fn score(&mut self, points: u64) {
        self.outputs.push(Output::AddScore(points));
    }

    /// Reports a game-level happening.
    pub fn notify(&mut self, notice: Notice) {
        self.outputs.push(Output::Notice(notice));
    }

    /// Requests a sound.
    pub fn play(&mut self, sound: SoundKind) {
        self.outputs.push(Output::Sound(sound));
    }
}

// =============================================================================
// Behavior
// =============================================================================

/// Reactions of one entity kind.
///
/// Both methods default to doing nothing, which is the right reaction for
/// anything indifferent to a collision or timer.
pub trait Behavior: Send + Sync {
    /// Called once for this entity for each overlapping partner.
    fn collide(&self, _entity: &mut Entity, _other: &Contact, _ctx: &mut Ctx<'_>) {}

    /// Called when a timer owned by this entity comes due.
    fn on_timer(&self, _entity: &mut Entity, _tag: TimerTag, _ctx: &mut Ctx<'_>) {}
}

/// Returns the behavior for a kind.
#[must_use]
pub fn for_kind(kind: EntityKind) -> &'static dyn Behavior {
    match kind {
        EntityKind::Ship => &ship::ShipBehavior,
        EntityKind::Asteroid => &asteroid::AsteroidBehavior,
        EntityKind::Alien => &alien::AlienBehavior,
        EntityKind::Boss => &boss::BossBehavior,
        EntityKind::PlayerBullet => &projectile::PlayerBulletBehavior,
        EntityKind::AlienBullet => &projectile::AlienBulletBehavior,
        EntityKind::BossBullet => &projectile::BossBulletBehavior,
        EntityKind::Missile => &projectile::MissileBehavior,
        EntityKind::Debris | EntityKind::AlienDebris | EntityKind::Dust => {
            &debris::DebrisBehavior
        }
        EntityKind::Shield => &debris::ShieldBehavior,
        EntityKind::Beatbox => &debris::BeatboxBehavior,
    }
}

/// Direction from `from` to `to`, in radians.
pub(crate) fn aim(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
