//! Short-lived and passive entities: wreckage, dust, the shield pickup and
//! the beatbox that drives the ambient rhythm.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{Behavior, Ctx};
use crate::config::{BEAT_DELTA_MS, DEBRIS_MAX_LIFETIME_MS, FASTEST_BEAT_MS, INITIAL_BEAT_MS};
use crate::entity::{BeatboxState, Contact, Entity, EntityInner, EntityKind, Motion};
use crate::geometry::Outline;
use crate::output::SoundKind;
use crate::timer::TimerTag;

const MAX_DRIFT: u8 = 5;
const MAX_SHARD: u8 = 20;

fn drifting<R: Rng + ?Sized>(position: Vec2, rng: &mut R) -> Motion {
    let mut motion = Motion::at(position);
    let speed = f32::from(rng.gen_range(0..MAX_DRIFT));
    motion.set_polar(speed, rng.gen_range(0.0..TAU));
    motion
}

fn fade<R: Rng + ?Sized>(entity: Entity, rng: &mut R) -> Entity {
    entity.with_timer(TimerTag::FloatAway, rng.gen_range(0..DEBRIS_MAX_LIFETIME_MS))
}

/// A line-segment shard of wreckage. `kind` is [`EntityKind::Debris`] for
/// the ship and [`EntityKind::AlienDebris`] for saucers.
pub fn debris<R: Rng + ?Sized>(kind: EntityKind, position: Vec2, rng: &mut R) -> Entity {
    let motion = drifting(position, rng);
    let end = (
        f32::from(rng.gen_range(0..MAX_SHARD)),
        f32::from(rng.gen_range(0..MAX_SHARD)),
    );
    let shard = Outline::polygon(&[(0.0, 0.0), end]);
    fade(Entity::new(kind, motion, shard, EntityInner::Inert), rng)
}

/// A speck of asteroid dust.
pub fn dust<R: Rng + ?Sized>(position: Vec2, rng: &mut R) -> Entity {
    let motion = drifting(position, rng);
    let speck = Outline::polygon(&[(3.0, 0.0), (3.0, 1.0), (2.0, 1.0), (2.0, 0.0)]);
    fade(
        Entity::new(EntityKind::Dust, motion, speck, EntityInner::Inert),
        rng,
    )
}

/// A stationary shield pickup.
#[must_use]
pub fn shield(position: Vec2) -> Entity {
    let hexagon = Outline::polygon(&[
        (0.0, 0.0),
        (-10.0, -5.0),
        (-10.0, 15.0),
        (0.0, 20.0),
        (10.0, 15.0),
        (10.0, -5.0),
    ]);
    Entity::new(
        EntityKind::Shield,
        Motion::at(position),
        hexagon,
        EntityInner::Inert,
    )
}

/// The invisible rhythm driver of a level.
#[must_use]
pub fn beatbox() -> Entity {
    Entity::new(
        EntityKind::Beatbox,
        Motion::default(),
        Outline::empty(),
        EntityInner::Beatbox(BeatboxState::default()),
    )
    .with_timer(TimerTag::Beat, INITIAL_BEAT_MS)
}

/// Wreckage and dust fade away; nothing else.
pub struct DebrisBehavior;

impl Behavior for DebrisBehavior {
    fn on_timer(&self, entity: &mut Entity, tag: TimerTag, _ctx: &mut Ctx<'_>) {
        if tag == TimerTag::FloatAway {
            entity.expire();
        }
    }
}

/// The pickup vanishes when the ship touches it. The ship raises its own
/// shield on the same contact.
pub struct ShieldBehavior;

impl Behavior for ShieldBehavior {
    fn collide(&self, entity: &mut Entity, other: &Contact, _ctx: &mut Ctx<'_>) {
        if other.kind == EntityKind::Ship {
            entity.expire();
        }
    }
}

/// Beats alternate between two sounds and speed up to a floor.
pub struct BeatboxBehavior;

impl Behavior for BeatboxBehavior {
    fn on_timer(&self, entity: &mut Entity, tag: TimerTag, ctx: &mut Ctx<'_>) {
        if tag != TimerTag::Beat {
            return;
        }
        let EntityInner::Beatbox(state) = &mut entity.inner else {
            return;
        };
        state.interval_ms = state
            .interval_ms
            .saturating_sub(BEAT_DELTA_MS)
            .max(FASTEST_BEAT_MS);
        let sound = if state.first_beat {
            SoundKind::Beat1
        } else {
            SoundKind::Beat2
        };
        state.first_beat = !state.first_beat;
        let next = state.interval_ms;
        ctx.play(sound);
        ctx.schedule(entity.id(), TimerTag::Beat, next);
    }
}
