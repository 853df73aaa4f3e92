//! Alien saucers.
//!
//! A saucer is registered dormant at the right edge and enters play when its
//! `Spawn` timer fires. From then on two independent cadences run on 750 ms
//! timers: every second `Move` changes course, every second `Fire` shoots.

use std::f32::consts::{FRAC_PI_4, PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::{aim, debris, projectile, Behavior, Ctx};
use crate::config::{ALIEN_CADENCE_MS, ALIEN_DELAY_MS, WORLD_SIZE};
use crate::entity::{
    AlienSize, AlienState, Contact, Destroys, Entity, EntityInner, EntityKind, Motion,
};
use crate::geometry::{from_polar, Outline};
use crate::output::{Notice, SoundKind};
use crate::timer::TimerTag;

const DEBRIS_OFFSETS: [(f32, f32); 5] = [
    (0.0, 0.0),
    (2.0, 2.0),
    (-1.0, 3.0),
    (-2.0, 4.0),
    (1.0, 1.0),
];

/// Local-space outline of a saucer.
#[must_use]
pub fn outline(size: AlienSize) -> Outline {
    let medium = Outline::polygon(&[(0.0, 0.0), (30.0, 0.0), (40.0, -10.0), (-10.0, -10.0)])
        .with_ring(&[(40.0, -10.0), (30.0, -20.0), (0.0, -20.0), (-10.0, -10.0)])
        .with_ring(&[(30.0, -20.0), (24.0, -26.0), (6.0, -26.0), (0.0, -20.0)]);
    match size {
        AlienSize::Medium => medium,
        AlienSize::Small => medium.scaled(0.5),
    }
}

/// Local-space point bullets leave from.
#[must_use]
pub fn muzzle(size: AlienSize) -> Vec2 {
    match size {
        AlienSize::Small => Vec2::new(7.0, -5.0),
        AlienSize::Medium => Vec2::new(15.0, -10.0),
    }
}

/// Builds a dormant saucer at `position`, entering play after the alien
/// delay.
#[must_use]
pub fn build(size: AlienSize, position: Vec2, heading_left: bool) -> Entity {
    let mut motion = Motion::at(position);
    motion.velocity = Vec2::new(cruise_x(size, heading_left), 0.0);
    let first_cadence = ALIEN_DELAY_MS + ALIEN_CADENCE_MS;
    Entity::new(
        EntityKind::Alien,
        motion,
        outline(size),
        EntityInner::Alien(AlienState {
            size,
            heading_left,
            time_to_move: true,
            time_to_fire: true,
        }),
    )
    .dormant()
    .with_timer(TimerTag::Spawn, ALIEN_DELAY_MS)
    .with_timer(TimerTag::Move, first_cadence)
    .with_timer(TimerTag::Fire, first_cadence)
}

/// Builds a saucer at the right edge at a random height, heading a random
/// way.
pub fn random<R: Rng + ?Sized>(size: AlienSize, rng: &mut R) -> Entity {
    let y = rng.gen_range(0.0..WORLD_SIZE);
    let heading_left = rng.gen_bool(0.5);
    build(size, Vec2::new(WORLD_SIZE, y), heading_left)
}

fn cruise_x(size: AlienSize, heading_left: bool) -> f32 {
    if heading_left {
        -size.speed()
    } else {
        size.speed()
    }
}

fn change_course<R: Rng + ?Sized>(entity: &mut Entity, state: AlienState, rng: &mut R) {
    let base = if state.heading_left { PI } else { 0.0 };
    let swing = if state.heading_left { -FRAC_PI_4 } else { FRAC_PI_4 };
    let roll = rng.gen_range(0.0..4.0);
    let direction = if roll > 1.0 && roll < 2.0 {
        base + swing
    } else if roll >= 2.0 {
        base - swing
    } else {
        base
    };
    entity.motion_mut().velocity = from_polar(state.size.speed(), direction);
}

fn fire(entity: &Entity, state: AlienState, ctx: &mut Ctx<'_>) {
    let origin = entity.local_to_world(muzzle(state.size));
    let direction = match state.size {
        AlienSize::Medium => ctx.rng().gen_range(0.0..TAU),
        AlienSize::Small => match ctx.sightings().player {
            Some(player) => aim(entity.position(), player),
            None => return,
        },
    };
    ctx.spawn(projectile::alien_bullet(origin, direction));
}

/// Collision and timer reactions of a saucer.
pub struct AlienBehavior;

impl Behavior for AlienBehavior {
    fn collide(&self, entity: &mut Entity, other: &Contact, ctx: &mut Ctx<'_>) {
        if !other.destroys.contains(Destroys::ALIENS) {
            return;
        }
        let Some(&state) = entity.as_alien() else {
            return;
        };
        let position = entity.position();

        entity.expire();
        ctx.play(SoundKind::AlienCrash);
        ctx.notify(Notice::AlienDestroyed);
        if other.kind == EntityKind::PlayerBullet {
            ctx.score(state.size.score());
        }
        for (dx, dy) in DEBRIS_OFFSETS {
            let piece = debris::debris(
                EntityKind::AlienDebris,
                position + Vec2::new(dx, dy),
                ctx.rng(),
            );
            ctx.spawn(piece);
        }
    }

    fn on_timer(&self, entity: &mut Entity, tag: TimerTag, ctx: &mut Ctx<'_>) {
        let Some(&state) = entity.as_alien() else {
            return;
        };
        let id = entity.id();
        match tag {
            TimerTag::Spawn => {
                entity.activate();
                ctx.play(match state.size {
                    AlienSize::Small => SoundKind::SaucerSmall,
                    AlienSize::Medium => SoundKind::SaucerBig,
                });
            }
            TimerTag::Move => {
                if state.time_to_move {
                    change_course(entity, state, ctx.rng());
                }
                set_flags(entity, |s| s.time_to_move = !s.time_to_move);
                ctx.schedule(id, TimerTag::Move, ALIEN_CADENCE_MS);
            }
            TimerTag::Fire => {
                if state.time_to_fire {
                    fire(entity, state, ctx);
                }
                set_flags(entity, |s| s.time_to_fire = !s.time_to_fire);
                ctx.schedule(id, TimerTag::Fire, ALIEN_CADENCE_MS);
            }
            _ => {}
        }
    }
}

fn set_flags(entity: &mut Entity, update: impl FnOnce(&mut AlienState)) {
    if let EntityInner::Alien(state) = &mut entity.inner {
        update(state);
    }
}
