//! The player ship.
//!
//! The game drives the ship directly from held controls ([`accelerate`],
//! [`decelerate`], [`turn`]) and from commands ([`nose`] for firing,
//! [`teleport`]). Collisions and timers go through [`ShipBehavior`].

use glam::Vec2;
use rand::Rng;

use super::{debris, Behavior, Ctx};
use crate::config::{
    FLAME_FLICKER_MS, SHIP_ACCELERATION, SHIP_FRICTION, SHIP_INVINCIBLE_MS, SHIP_MAX_SPEED,
    SHIP_TURN, WORLD_SIZE,
};
use crate::entity::{Contact, Destroys, Entity, EntityInner, EntityKind, Motion, ShipState};
use crate::geometry::{from_polar, wrap, Outline};
use crate::output::{Notice, SoundKind};
use crate::timer::TimerTag;

const HULL: [(f32, f32); 5] = [
    (20.0, 0.0),
    (-20.0, 12.0),
    (-13.0, 10.0),
    (-13.0, -10.0),
    (-20.0, -12.0),
];

const FLAME: [(f32, f32); 3] = [(-13.0, -10.0), (-25.0, 0.0), (-13.0, 10.0)];

/// Local-space tip of the hull, where bullets leave.
pub const NOSE: Vec2 = Vec2::new(20.0, 0.0);

const DEBRIS_OFFSETS: [(f32, f32); 3] = [(0.0, 0.0), (2.0, 2.0), (-1.0, 3.0)];

fn hull() -> Outline {
    Outline::polygon(&HULL)
}

fn hull_with_flame() -> Outline {
    hull().with_ring(&FLAME)
}

/// Builds a ship at `position` facing `rotation`, invincible for its first
/// second.
#[must_use]
pub fn build(position: Vec2, rotation: f32, shield: bool) -> Entity {
    let mut motion = Motion::at(position);
    motion.rotation = rotation;
    motion.friction = Some(SHIP_FRICTION);
    Entity::new(
        EntityKind::Ship,
        motion,
        hull(),
        EntityInner::Ship(ShipState {
            shield,
            ..ShipState::default()
        }),
    )
    .with_timer(TimerTag::Invincible, SHIP_INVINCIBLE_MS)
}

/// World-space position of the nose.
#[must_use]
pub fn nose(ship: &Entity) -> Vec2 {
    ship.local_to_world(NOSE)
}

/// Speeds the ship up along its heading and lights the flame.
pub fn accelerate(ship: &mut Entity, ctx: &mut Ctx<'_>) {
    let motion = ship.motion_mut();
    let boosted = motion.velocity + from_polar(SHIP_ACCELERATION, motion.rotation);
    motion.velocity = boosted.clamp_length_max(SHIP_MAX_SPEED);
    if let Some(state) = ship.as_ship_mut() {
        state.thrusting = true;
    }
    ctx.play(SoundKind::Thrust);
    ctx.schedule(ship.id(), TimerTag::Flame, FLAME_FLICKER_MS);
}

/// Puts the flame out.
///
/// A flicker timer still pending from the last thrust leaves it out.
pub fn decelerate(ship: &mut Entity) {
    ship.outline = hull();
    if let Some(state) = ship.as_ship_mut() {
        state.flame = false;
        state.thrusting = false;
    }
}

/// Rotates the ship one step; negative turns left.
pub fn turn(ship: &mut Entity, direction: i8) {
    ship.motion_mut().rotation += SHIP_TURN * f32::from(direction);
}

/// Jumps the ship to a random position.
pub fn teleport<R: Rng + ?Sized>(ship: &mut Entity, rng: &mut R) {
    let x = rng.gen_range(0.0..WORLD_SIZE);
    let y = rng.gen_range(0.0..WORLD_SIZE);
    ship.motion_mut().position = wrap(Vec2::new(x, y));
}

/// Collision and timer reactions of the ship.
pub struct ShipBehavior;

impl Behavior for ShipBehavior {
    fn collide(&self, entity: &mut Entity, other: &Contact, ctx: &mut Ctx<'_>) {
        let position = entity.position();
        let Some(state) = entity.as_ship_mut() else {
            return;
        };

        if other.kind == EntityKind::Shield {
            state.shield = true;
        }
        if !other.destroys.contains(Destroys::SHIPS) || state.invincible {
            return;
        }
        if state.shield {
            state.shield = false;
            return;
        }

        entity.expire();
        ctx.play(SoundKind::ShipCrash);
        ctx.notify(Notice::ShipDestroyed);
        for (dx, dy) in DEBRIS_OFFSETS {
            let piece = debris::debris(EntityKind::Debris, position + Vec2::new(dx, dy), ctx.rng());
            ctx.spawn(piece);
        }
    }

    fn on_timer(&self, entity: &mut Entity, tag: TimerTag, _ctx: &mut Ctx<'_>) {
        match tag {
            TimerTag::Invincible => {
                if let Some(state) = entity.as_ship_mut() {
                    state.invincible = false;
                }
            }
            TimerTag::Flame => {
                let Some(state) = entity.as_ship_mut() else {
                    return;
                };
                if !state.thrusting {
                    return;
                }
                let lit = state.flame;
                state.flame = !lit;
                entity.outline = if lit { hull() } else { hull_with_flame() };
            }
            _ => {}
        }
    }
}
