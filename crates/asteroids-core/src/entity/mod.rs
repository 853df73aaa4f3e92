//! Entity module: identifiers, kinds, destroyer capabilities and the entity
//! container.
//!
//! - [`EntityId`]: generational handle into the [`World`](crate::World)
//! - [`EntityKind`]: what an entity is, for styling and reaction checks
//! - [`Destroys`]: which classes of entity this one destroys on contact
//! - [`EntityInner`]: per-kind component storage
//! - [`Entity`]: the complete entity
//!
//! # Capability dispatch
//!
//! A collision reaction never asks "what concrete type hit me". It asks
//! whether the other party's [`Destroys`] set contains the class the reacting
//! entity belongs to. An asteroid expires when `other.destroys` contains
//! [`Destroys::ASTEROIDS`], whatever the other entity is.
//!
//! # Example
//!
//! ```
//! use asteroids_core::entity::{Destroys, EntityKind};
//!
//! assert!(EntityKind::PlayerBullet.destroys().contains(Destroys::BOSS));
//! assert!(!EntityKind::AlienBullet.destroys().contains(Destroys::ALIENS));
//! ```

pub mod components;

use std::fmt;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Outline;
use crate::timer::TimerTag;

pub use components::{
    AlienSize, AlienState, AsteroidSize, AsteroidState, BeatboxState, BossState, MissileState,
    Motion, ShipState, Variety,
};

/// Generational handle to an entity slot.
///
/// A handle stays valid only while the slot holds the same generation.
/// Once the entity is reaped the slot's generation advances, so stale
/// handles (for example a timer owner) resolve to nothing even after the slot
/// is reused.
///
/// ```
/// use asteroids_core::entity::EntityId;
///
/// let a = EntityId::new(3, 0);
/// let b = EntityId::new(3, 1);
/// assert_ne!(a, b);
/// assert_eq!(a.index(), b.index());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Placeholder carried by entities not yet inserted into a world.
    pub const DETACHED: Self = Self {
        index: u32::MAX,
        generation: 0,
    };

    /// Creates a handle from a slot index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

bitflags! {
    /// Classes of entity destroyed on contact.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Destroys: u8 {
        /// Destroys asteroids.
        const ASTEROIDS = 1 << 0;
        /// Destroys the player ship.
        const SHIPS = 1 << 1;
        /// Destroys alien saucers.
        const ALIENS = 1 << 2;
        /// Damages the boss.
        const BOSS = 1 << 3;
    }
}

/// What an entity is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player-controlled ship.
    Ship,
    /// A drifting rock.
    Asteroid,
    /// A roaming saucer.
    Alien,
    /// The boss saucer of every fifth enhanced level.
    Boss,
    /// A shot fired by the player.
    PlayerBullet,
    /// A shot fired by an alien.
    AlienBullet,
    /// A shot fired by the boss.
    BossBullet,
    /// A player homing missile.
    Missile,
    /// Ship wreckage.
    Debris,
    /// Alien or boss wreckage.
    AlienDebris,
    /// Asteroid dust.
    Dust,
    /// Shield pickup.
    Shield,
    /// Ambient rhythm driver; invisible.
    Beatbox,
}

impl EntityKind {
    /// Destroyer capabilities of this kind.
    #[must_use]
    pub const fn destroys(self) -> Destroys {
        match self {
            Self::Ship => Destroys::ASTEROIDS.union(Destroys::ALIENS),
            Self::Asteroid => Destroys::SHIPS.union(Destroys::ALIENS),
            Self::Alien | Self::AlienBullet => Destroys::ASTEROIDS.union(Destroys::SHIPS),
            Self::Boss | Self::BossBullet => Destroys::SHIPS,
            Self::PlayerBullet => Destroys::ASTEROIDS
                .union(Destroys::ALIENS)
                .union(Destroys::BOSS),
            Self::Missile => Destroys::ALIENS.union(Destroys::ASTEROIDS),
            Self::Debris | Self::AlienDebris | Self::Dust | Self::Shield | Self::Beatbox => {
                Destroys::empty()
            }
        }
    }

    /// True for the hazards that must be cleared to finish a level.
    #[must_use]
    pub const fn is_hazard(self) -> bool {
        matches!(self, Self::Asteroid | Self::Alien | Self::Boss)
    }

    /// True for shots credited to the player when scoring.
    #[must_use]
    pub const fn is_player_weapon(self) -> bool {
        matches!(self, Self::PlayerBullet | Self::Ship)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Where an entity is in its life.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Registered and receiving timers, but not moved, hit-tested or drawn.
    Dormant,
    /// Fully simulated.
    Live,
    /// Marked for removal at the end of the tick.
    Expired,
}

/// Per-kind component storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Ship components.
    Ship(ShipState),
    /// Asteroid components.
    Asteroid(AsteroidState),
    /// Alien components.
    Alien(AlienState),
    /// Boss components.
    Boss(BossState),
    /// Missile components.
    Missile(MissileState),
    /// Beatbox components.
    Beatbox(BeatboxState),
    /// Kinds with no state of their own (bullets, debris, pickups).
    Inert,
}

/// What a reacting entity sees of the other party in a collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Handle of the other entity.
    pub id: EntityId,
    /// Kind of the other entity.
    pub kind: EntityKind,
    /// The other entity's destroyer capabilities.
    pub destroys: Destroys,
    /// The other entity's position.
    pub position: Vec2,
}

/// A simulated game object.
///
/// Entities are built detached (see the constructors in
/// [`behavior`](crate::behavior)), then handed to the world which assigns the
/// [`EntityId`]. Timers listed with [`Entity::with_timer`] are armed when the
/// entity is spawned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) kind: EntityKind,
    pub(crate) motion: Motion,
    pub(crate) outline: Outline,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) inner: EntityInner,
    pub(crate) boot_timers: Vec<(TimerTag, u64)>,
}

impl Entity {
    /// Creates a live, detached entity.
    #[must_use]
    pub fn new(kind: EntityKind, motion: Motion, outline: Outline, inner: EntityInner) -> Self {
        Self {
            id: EntityId::DETACHED,
            kind,
            motion,
            outline,
            lifecycle: Lifecycle::Live,
            inner,
            boot_timers: Vec::new(),
        }
    }

    /// Arms a timer when the entity is spawned.
    #[must_use]
    pub fn with_timer(mut self, tag: TimerTag, delay_ms: u64) -> Self {
        self.boot_timers.push((tag, delay_ms));
        self
    }

    /// Starts the entity dormant; a `Spawn` timer brings it to life.
    #[must_use]
    pub fn dormant(mut self) -> Self {
        self.lifecycle = Lifecycle::Dormant;
        self
    }

    /// Handle assigned by the world.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Kind of entity.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Destroyer capabilities.
    #[must_use]
    pub fn destroys(&self) -> Destroys {
        self.kind.destroys()
    }

    /// Lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// True once marked expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.lifecycle == Lifecycle::Expired
    }

    /// True while fully simulated.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.lifecycle == Lifecycle::Live
    }

    /// True while waiting for a spawn timer.
    #[must_use]
    pub fn is_dormant(&self) -> bool {
        self.lifecycle == Lifecycle::Dormant
    }

    /// Marks the entity for removal at the end of the tick.
    pub fn expire(&mut self) {
        self.lifecycle = Lifecycle::Expired;
    }

    /// Brings a dormant entity to life. Expired entities stay expired.
    pub fn activate(&mut self) {
        if self.lifecycle == Lifecycle::Dormant {
            self.lifecycle = Lifecycle::Live;
        }
    }

    /// Motion state.
    #[must_use]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Mutable motion state.
    pub fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }

    /// World position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.motion.position
    }

    /// Heading in radians.
    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.motion.rotation
    }

    /// Local-space outline.
    #[must_use]
    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Outline transformed by position and heading.
    #[must_use]
    pub fn world_outline(&self) -> Vec<Vec<Vec2>> {
        self.outline.to_world(self.motion.position, self.motion.rotation)
    }

    /// Transforms a local-space point to world space.
    #[must_use]
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        Vec2::from_angle(self.motion.rotation).rotate(local) + self.motion.position
    }

    /// Styling variant for the presentation layer: asteroid variety, alien
    /// size, 1 for a shielded ship, otherwise 0.
    #[must_use]
    pub fn variant(&self) -> u8 {
        match &self.inner {
            EntityInner::Asteroid(a) => a.variety.index(),
            EntityInner::Alien(a) => a.size as u8,
            EntityInner::Ship(s) => u8::from(s.shield),
            _ => 0,
        }
    }

    /// Advances motion by `dt` ticks. Only live entities move.
    pub fn advance(&mut self, dt: f32) {
        if self.is_live() {
            self.motion.advance(dt);
        }
    }

    /// Snapshot of this entity as seen by a collision partner.
    #[must_use]
    pub fn contact(&self) -> Contact {
        Contact {
            id: self.id,
            kind: self.kind,
            destroys: self.destroys(),
            position: self.motion.position,
        }
    }

    /// Component storage.
    #[must_use]
    pub fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Ship components, if this is a ship.
    #[must_use]
    pub fn as_ship(&self) -> Option<&ShipState> {
        match &self.inner {
            EntityInner::Ship(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable ship components, if this is a ship.
    pub fn as_ship_mut(&mut self) -> Option<&mut ShipState> {
        match &mut self.inner {
            EntityInner::Ship(s) => Some(s),
            _ => None,
        }
    }

    /// Asteroid components, if this is an asteroid.
    #[must_use]
    pub fn as_asteroid(&self) -> Option<&AsteroidState> {
        match &self.inner {
            EntityInner::Asteroid(a) => Some(a),
            _ => None,
        }
    }

    /// Alien components, if this is an alien.
    #[must_use]
    pub fn as_alien(&self) -> Option<&AlienState> {
        match &self.inner {
            EntityInner::Alien(a) => Some(a),
            _ => None,
        }
    }

    /// Boss components, if this is the boss.
    #[must_use]
    pub fn as_boss(&self) -> Option<&BossState> {
        match &self.inner {
            EntityInner::Boss(b) => Some(b),
            _ => None,
        }
    }

    /// Beatbox components, if this is the rhythm driver.
    #[must_use]
    pub fn as_beatbox(&self) -> Option<&BeatboxState> {
        match &self.inner {
            EntityInner::Beatbox(b) => Some(b),
            _ => None,
        }
    }

    /// Timers armed at spawn.
    #[must_use]
    pub fn boot_timers(&self) -> &[(TimerTag, u64)] {
        &self.boot_timers
    }
}
