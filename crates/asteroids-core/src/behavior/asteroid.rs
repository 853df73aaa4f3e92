//! Asteroids: four hand-drawn shapes in three sizes.
//!
//! A large or medium asteroid hit by anything that destroys asteroids splits
//! into exactly two asteroids of the next size down, both at the parent's
//! position, each with its own shape and direction. Small asteroids leave
//! nothing behind but dust.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{debris, Behavior, Ctx};
use crate::entity::{
    AsteroidSize, AsteroidState, Contact, Destroys, Entity, EntityInner, EntityKind, Motion,
    Variety,
};
use crate::error::CoreError;
use crate::geometry::{from_polar, Outline};
use crate::output::{Notice, SoundKind};

const SHAPES: [&[(f32, f32)]; 4] = [
    &[
        (0.0, -30.0),
        (28.0, -15.0),
        (20.0, 20.0),
        (4.0, 8.0),
        (-1.0, 30.0),
        (-12.0, 15.0),
        (-5.0, 2.0),
        (-25.0, 7.0),
        (-10.0, -25.0),
    ],
    &[
        (10.0, -28.0),
        (7.0, -16.0),
        (30.0, -9.0),
        (30.0, 9.0),
        (10.0, 13.0),
        (5.0, 30.0),
        (-8.0, 28.0),
        (-6.0, 6.0),
        (-27.0, 12.0),
        (-30.0, -11.0),
        (-6.0, -15.0),
        (-6.0, -28.0),
    ],
    &[
        (10.0, -30.0),
        (30.0, 0.0),
        (15.0, 30.0),
        (0.0, 15.0),
        (-15.0, 30.0),
        (-30.0, 0.0),
        (-10.0, -30.0),
    ],
    &[
        (30.0, -18.0),
        (5.0, 5.0),
        (30.0, 15.0),
        (15.0, 30.0),
        (0.0, 25.0),
        (-15.0, 30.0),
        (-25.0, 8.0),
        (-10.0, -25.0),
        (0.0, -30.0),
        (10.0, -30.0),
    ],
];

const DUST_PER_CRASH: usize = 4;

/// Outline of an asteroid shape at a size.
#[must_use]
pub fn outline(size: AsteroidSize, variety: Variety) -> Outline {
    Outline::polygon(SHAPES[usize::from(variety.index())]).scaled(size.scale())
}

/// Builds an asteroid moving at `speed` in `direction`.
#[must_use]
pub fn build(
    position: Vec2,
    size: AsteroidSize,
    variety: Variety,
    speed: f32,
    direction: f32,
) -> Entity {
    let mut motion = Motion::at(position);
    motion.velocity = from_polar(speed, direction);
    Entity::new(
        EntityKind::Asteroid,
        motion,
        outline(size, variety),
        EntityInner::Asteroid(AsteroidState { size, variety }),
    )
}

/// Builds an asteroid with a random shape, heading and direction.
pub fn random<R: Rng + ?Sized>(
    position: Vec2,
    size: AsteroidSize,
    speed: f32,
    rng: &mut R,
) -> Entity {
    let variety = Variety::random(rng);
    let direction = rng.gen_range(0.0..TAU);
    let mut asteroid = build(position, size, variety, speed, direction);
    asteroid.motion_mut().rotation = rng.gen_range(0.0..TAU);
    asteroid
}

/// Builds an asteroid from unchecked size and variety numbers.
///
/// # Errors
///
/// Returns [`CoreError::InvalidSpawnParameters`] when `size` is outside
/// `0..=2` or `variety` outside `0..=3`.
///
/// ```
/// use asteroids_core::behavior::asteroid;
/// use asteroids_core::CoreError;
/// use glam::Vec2;
///
/// assert!(asteroid::spawn_raw(Vec2::ZERO, 2, 3, 3.0, 0.0).is_ok());
/// assert!(matches!(
///     asteroid::spawn_raw(Vec2::ZERO, 3, 0, 3.0, 0.0),
///     Err(CoreError::InvalidSpawnParameters { .. })
/// ));
/// ```
pub fn spawn_raw(
    position: Vec2,
    size: i32,
    variety: i32,
    speed: f32,
    direction: f32,
) -> Result<Entity, CoreError> {
    let size = AsteroidSize::try_from(size)?;
    let variety = Variety::try_from(variety)?;
    Ok(build(position, size, variety, speed, direction))
}

/// Speed of the fragments a split produces, by fragment size.
fn fragment_speed<R: Rng + ?Sized>(size: AsteroidSize, rng: &mut R) -> f32 {
    match size {
        AsteroidSize::Medium => [3.0, 4.0][rng.gen_range(0..2)],
        AsteroidSize::Small => [3.0, 4.0, 5.0][rng.gen_range(0..3)],
        AsteroidSize::Large => crate::config::ASTEROID_BASE_SPEED,
    }
}

/// Collision reactions of an asteroid.
pub struct AsteroidBehavior;

impl Behavior for AsteroidBehavior {
    fn collide(&self, entity: &mut Entity, other: &Contact, ctx: &mut Ctx<'_>) {
        if !other.destroys.contains(Destroys::ASTEROIDS) {
            return;
        }
        let Some(&AsteroidState { size, .. }) = entity.as_asteroid() else {
            return;
        };
        let position = entity.position();

        entity.expire();
        ctx.play(SoundKind::for_asteroid(size));
        if other.kind.is_player_weapon() {
            ctx.score(size.score());
        }

        if let Some(fragment) = size.smaller() {
            let speed = fragment_speed(fragment, ctx.rng());
            for _ in 0..2 {
                let child = random(position, fragment, speed, ctx.rng());
                ctx.spawn(child);
            }
        }

        ctx.notify(Notice::AsteroidDestroyed(size));
        for _ in 0..DUST_PER_CRASH {
            let dust = debris::dust(position, ctx.rng());
            ctx.spawn(dust);
        }
    }
}
