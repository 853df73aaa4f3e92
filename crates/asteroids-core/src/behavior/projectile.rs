//! Bullets and homing missiles.
//!
//! Every bullet is a one-unit square that flies straight at bullet speed and
//! expires on its `Expire` timer or on the contacts its kind stops on. The
//! homing missile ramps its speed up over its first burns and steers toward
//! the alien saucer.

use std::f32::consts::PI;

use glam::Vec2;

use super::{aim, Behavior, Ctx};
use crate::config::{
    BOSS_BULLET_EXTRA_MS, BULLET_DURATION_MS, BULLET_SPEED, MISSILE_BURN_MS,
    MISSILE_FIRST_BURN_MS, MISSILE_LIFETIME_MS,
};
use crate::entity::{Contact, Destroys, Entity, EntityInner, EntityKind, MissileState, Motion};
use crate::geometry::{from_polar, normalize_angle, Outline};
use crate::output::Notice;
use crate::timer::TimerTag;

const MISSILE_BODY: [(f32, f32); 5] = [
    (10.0, 0.0),
    (-10.0, 5.0),
    (-6.0, 5.0),
    (-6.0, -5.0),
    (-10.0, -5.0),
];
const MISSILE_FLAME: [(f32, f32); 3] = [(-6.0, 2.0), (-20.0, 0.0), (-6.0, -2.0)];

/// Turn applied per burn when the target is off to one side.
const MISSILE_TURN: f32 = PI / 16.0;
/// Within this angle the missile locks straight onto the target.
const MISSILE_LOCK: f32 = PI / 6.0;

fn slug() -> Outline {
    Outline::polygon(&[(0.0, 0.0), (-1.0, 0.0), (-1.0, 1.0), (0.0, 1.0)])
}

fn bullet(kind: EntityKind, position: Vec2, direction: f32, lifetime_ms: u64) -> Entity {
    let mut motion = Motion::at(position);
    motion.velocity = from_polar(BULLET_SPEED, direction);
    motion.rotation = direction;
    Entity::new(kind, motion, slug(), EntityInner::Inert).with_timer(TimerTag::Expire, lifetime_ms)
}

/// A bullet fired by the player.
#[must_use]
pub fn player_bullet(position: Vec2, direction: f32) -> Entity {
    bullet(EntityKind::PlayerBullet, position, direction, BULLET_DURATION_MS)
}

/// A bullet fired by an alien saucer.
#[must_use]
pub fn alien_bullet(position: Vec2, direction: f32) -> Entity {
    bullet(EntityKind::AlienBullet, position, direction, BULLET_DURATION_MS)
}

/// A bullet fired by the boss; lives half again as long.
#[must_use]
pub fn boss_bullet(position: Vec2, direction: f32) -> Entity {
    bullet(
        EntityKind::BossBullet,
        position,
        direction,
        BULLET_DURATION_MS + BOSS_BULLET_EXTRA_MS,
    )
}

/// A homing missile leaving `position` along `direction`.
#[must_use]
pub fn missile(position: Vec2, direction: f32) -> Entity {
    let brake = BULLET_SPEED;
    let mut motion = Motion::at(position);
    motion.velocity = from_polar(BULLET_SPEED / brake, direction);
    motion.rotation = direction;
    Entity::new(
        EntityKind::Missile,
        motion,
        Outline::polygon(&MISSILE_BODY),
        EntityInner::Missile(MissileState { brake, flame: false }),
    )
    .with_timer(TimerTag::Expire, MISSILE_LIFETIME_MS)
    .with_timer(TimerTag::Burn, MISSILE_FIRST_BURN_MS)
}

/// New heading after one correction toward `target`.
///
/// Snaps onto the target when within the lock angle, otherwise turns by a
/// fixed step toward it.
#[must_use]
pub fn steer(heading: f32, target: f32) -> f32 {
    let delta = normalize_angle(target - heading);
    if delta.abs() <= MISSILE_LOCK {
        target
    } else {
        heading + MISSILE_TURN.copysign(delta)
    }
}

fn expire_on(entity: &mut Entity, hit: bool) {
    if hit {
        entity.expire();
    }
}

/// Player bullets stop on asteroids, aliens and the boss.
pub struct PlayerBulletBehavior;

impl Behavior for PlayerBulletBehavior {
    fn collide(&self, entity: &mut Entity, other: &Contact, _ctx: &mut Ctx<'_>) {
        expire_on(entity, other.kind.is_hazard());
    }

    fn on_timer(&self, entity: &mut Entity, tag: TimerTag, _ctx: &mut Ctx<'_>) {
        expire_on(entity, tag == TimerTag::Expire);
    }
}

/// Alien bullets stop on asteroids and the ship.
pub struct AlienBulletBehavior;

impl Behavior for AlienBulletBehavior {
    fn collide(&self, entity: &mut Entity, other: &Contact, _ctx: &mut Ctx<'_>) {
        expire_on(
            entity,
            matches!(other.kind, EntityKind::Asteroid | EntityKind::Ship),
        );
    }

    fn on_timer(&self, entity: &mut Entity, tag: TimerTag, _ctx: &mut Ctx<'_>) {
        expire_on(entity, tag == TimerTag::Expire);
    }
}

/// Boss bullets stop on anything but the boss.
pub struct BossBulletBehavior;

impl Behavior for BossBulletBehavior {
    fn collide(&self, entity: &mut Entity, other: &Contact, _ctx: &mut Ctx<'_>) {
        expire_on(entity, other.kind != EntityKind::Boss);
    }

    fn on_timer(&self, entity: &mut Entity, tag: TimerTag, _ctx: &mut Ctx<'_>) {
        expire_on(entity, tag == TimerTag::Expire);
    }
}

/// Missiles burn, home and die on anything that destroys ships.
pub struct MissileBehavior;

impl MissileBehavior {
    fn retire(entity: &mut Entity, ctx: &mut Ctx<'_>) {
        entity.expire();
        ctx.notify(Notice::MissileRetired);
    }

    fn burn(entity: &mut Entity, ctx: &mut Ctx<'_>) {
        let position = entity.position();
        let heading = entity.motion().direction();
        let EntityInner::Missile(state) = &mut entity.inner else {
            return;
        };
        state.brake = (state.brake - 1.0).max(1.0);
        state.flame = !state.flame;
        let speed = BULLET_SPEED / state.brake;
        let lit = state.flame;

        let heading = match ctx.sightings().alien {
            Some(alien) => steer(heading, aim(position, alien)),
            None => heading,
        };
        let motion = entity.motion_mut();
        motion.velocity = from_polar(speed, heading);
        motion.rotation = heading;
        entity.outline = if lit {
            Outline::polygon(&MISSILE_BODY).with_ring(&MISSILE_FLAME)
        } else {
            Outline::polygon(&MISSILE_BODY)
        };
        ctx.schedule(entity.id(), TimerTag::Burn, MISSILE_BURN_MS);
    }
}

impl Behavior for MissileBehavior {
    fn collide(&self, entity: &mut Entity, other: &Contact, ctx: &mut Ctx<'_>) {
        if other.destroys.contains(Destroys::SHIPS) {
            Self::retire(entity, ctx);
        }
    }

    fn on_timer(&self, entity: &mut Entity, tag: TimerTag, ctx: &mut Ctx<'_>) {
        match tag {
            TimerTag::Expire => Self::retire(entity, ctx),
            TimerTag::Burn => Self::burn(entity, ctx),
            _ => {}
        }
    }
}
