//! World module: the entity registry and stepper.
//!
//! The World owns every entity of a game session. It provides:
//! - Generational slot storage with a free list
//! - Stable insertion-order iteration for deterministic stepping
//! - Motion stepping, pairwise collision detection and dispatch
//! - Timer dispatch guarded by owner liveness
//! - Deferred removal (the reap step)
//!
//! # Deferred mutation
//!
//! Nothing is added or removed while a pass is running. Behaviors push
//! [`Output`]s; the game inserts spawned entities after the pass, and entities
//! marked expired stay in their slots until [`World::reap`] runs at the end of
//! the tick.
//!
//! # Example
//!
//! ```
//! use asteroids_core::behavior::asteroid;
//! use asteroids_core::entity::{AsteroidSize, Variety};
//! use asteroids_core::World;
//! use glam::Vec2;
//!
//! let mut world = World::new();
//! let rock = asteroid::build(Vec2::new(100.0, 100.0), AsteroidSize::Large, Variety::default(), 0.0, 0.0);
//! let id = world.insert(rock);
//!
//! assert!(world.is_alive(id));
//! assert_eq!(world.len(), 1);
//! ```

use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::behavior::{self, Ctx, Sightings};
use crate::entity::{Contact, Entity, EntityId, EntityKind};
use crate::geometry::rings_overlap;
use crate::output::Output;
use crate::timer::Timer;

// =============================================================================
// Slot
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

// =============================================================================
// World
// =============================================================================

/// Registry of all entities in a game session.
///
/// Handles are `(index, generation)` pairs. Removing an entity bumps its
/// slot's generation, so a stale handle never resolves to whatever entity
/// reuses the slot later.
#[derive(Debug, Clone, Default)]
pub struct World {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Handles in insertion order.
    order: Vec<EntityId>,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity and returns its handle.
    ///
    /// The entity joins the end of the iteration order. Timers listed on the
    /// entity are not armed here; that is the caller's job.
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                u32::try_from(self.slots.len() - 1).unwrap_or(u32::MAX)
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = EntityId::new(index, slot.generation);
        entity.id = id;
        debug!(%id, kind = %entity.kind, "entity_spawned");
        slot.entity = Some(entity);
        self.order.push(id);
        id
    }

    /// Removes an entity immediately, returning it.
    ///
    /// Prefer [`Entity::expire`] plus [`World::reap`] during a tick.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.take_slot(id)?;
        self.order.retain(|other| *other != id);
        Some(entity)
    }

    /// Returns the entity behind a handle, if the handle is current.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entity.as_ref())
    }

    /// Returns the entity behind a handle mutably, if the handle is current.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entity.as_mut())
    }

    /// True when the handle is current, whatever the entity's lifecycle.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// True when the handle is current and the entity is not expired.
    ///
    /// Dormant entities count as alive: they are registered and receive
    /// timers.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| !e.is_expired())
    }

    /// Iterates over every registered entity in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    /// Iterates over live entities in insertion order, for drawing.
    ///
    /// Dormant and expired entities are skipped.
    pub fn visible(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.iter().filter(|e| e.is_live())
    }

    /// Handles in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of live entities of one kind.
    #[must_use]
    pub fn count_live(&self, kind: EntityKind) -> usize {
        self.iter().filter(|e| e.kind == kind && e.is_live()).count()
    }

    /// Removes every entity.
    ///
    /// All outstanding handles go stale, which silences any timers still
    /// queued for the old entities.
    pub fn clear(&mut self) {
        for id in std::mem::take(&mut self.order) {
            self.take_slot(id);
        }
        debug!(slots = self.slots.len(), "world_cleared");
    }

    /// Moves every live entity by `dt` ticks.
    pub fn advance(&mut self, dt: f32) {
        for id in &self.order {
            if let Some(entity) = self
                .slots
                .get_mut(id.index() as usize)
                .and_then(|slot| slot.entity.as_mut())
            {
                entity.advance(dt);
            }
        }
    }

    /// Every unordered pair of live entities whose outlines overlap.
    ///
    /// Pairs come out in insertion order of their first member, each pair
    /// exactly once and never an entity with itself.
    #[must_use]
    pub fn collision_pairs(&self) -> Vec<(EntityId, EntityId)> {
        let bodies: Vec<_> = self
            .iter()
            .filter(|e| e.is_live() && e.outline.is_solid())
            .map(|e| (e.id, e.position(), e.outline.radius(), e.world_outline()))
            .collect();

        let mut pairs = Vec::new();
        for (i, (id_a, pos_a, radius_a, rings_a)) in bodies.iter().enumerate() {
            for (id_b, pos_b, radius_b, rings_b) in &bodies[i + 1..] {
                let reach = radius_a + radius_b;
                if pos_a.distance_squared(*pos_b) > reach * reach {
                    continue;
                }
                if rings_overlap(rings_a, rings_b) {
                    pairs.push((*id_a, *id_b));
                }
            }
        }
        pairs
    }

    /// Detects collisions and notifies both sides of every overlapping pair.
    ///
    /// A pair is skipped when either side has already expired by the time it
    /// comes up. Otherwise both sides are notified, first then second, each
    /// seeing the other as it was before either handler ran.
    ///
    /// Returns the number of pairs dispatched.
    pub fn resolve_collisions(
        &mut self,
        rng: &mut ChaCha8Rng,
        sightings: &Sightings,
        outputs: &mut Vec<Output>,
    ) -> usize {
        let mut dispatched = 0;
        for (a, b) in self.collision_pairs() {
            let (Some(contact_a), Some(contact_b)) = (self.live_contact(a), self.live_contact(b))
            else {
                continue;
            };
            trace!(%a, %b, "collision");
            let mut ctx = Ctx::new(rng, sightings, outputs);
            self.notify(a, &contact_b, &mut ctx);
            self.notify(b, &contact_a, &mut ctx);
            dispatched += 1;
        }
        dispatched
    }

    /// Runs a due timer on its owner.
    ///
    /// Returns false without doing anything when the owner handle is stale or
    /// the owner has expired.
    pub fn dispatch_timer(
        &mut self,
        timer: &Timer,
        rng: &mut ChaCha8Rng,
        sightings: &Sightings,
        outputs: &mut Vec<Output>,
    ) -> bool {
        let Some(entity) = self.get_mut(timer.owner).filter(|e| !e.is_expired()) else {
            trace!(owner = %timer.owner, tag = ?timer.tag, "timer_skipped");
            return false;
        };
        let mut ctx = Ctx::new(rng, sightings, outputs);
        behavior::for_kind(entity.kind).on_timer(entity, timer.tag, &mut ctx);
        true
    }

    /// Removes every expired entity. Returns how many were removed.
    pub fn reap(&mut self) -> usize {
        let expired: Vec<EntityId> = self
            .iter()
            .filter(|e| e.is_expired())
            .map(Entity::id)
            .collect();
        if expired.is_empty() {
            return 0;
        }
        for id in &expired {
            self.take_slot(*id);
        }
        let slots = &self.slots;
        self.order.retain(|id| {
            slots
                .get(id.index() as usize)
                .is_some_and(|slot| slot.generation == id.generation() && slot.entity.is_some())
        });
        trace!(count = expired.len(), "entities_reaped");
        expired.len()
    }

    fn live_contact(&self, id: EntityId) -> Option<Contact> {
        self.get(id).filter(|e| e.is_live()).map(Entity::contact)
    }

    fn notify(&mut self, id: EntityId, other: &Contact, ctx: &mut Ctx<'_>) {
        if let Some(entity) = self.get_mut(id) {
            behavior::for_kind(entity.kind).collide(entity, other, ctx);
        }
    }

    fn take_slot(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self
            .slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())?;
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        Some(entity)
    }
}

// =============================================================================
// Tests
// =============================================================================
