//! The boss saucer of the enhanced ruleset.
//!
//! Spans most of the playfield width, drops in from the top edge, halts,
//! then fires paired aimed volleys from both ends. Only player bullets hurt
//! it, one point of health per hit.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::Rng;

use super::{aim, debris, projectile, Behavior, Ctx};
use crate::config::{
    ALIEN_DELAY_MS, BOSS_FIRST_FIRE_AFTER_MS, BOSS_REST_MS, BOSS_SCORE, BOSS_SPEED,
    BOSS_STOP_AFTER_MS, BOSS_VOLLEY_MS, WORLD_SIZE,
};
use crate::entity::{BossState, Contact, Destroys, Entity, EntityInner, EntityKind, Motion};
use crate::geometry::{from_polar, Outline};
use crate::output::{Notice, SoundKind};
use crate::timer::TimerTag;

/// Where the boss waits before dropping in.
pub const ENTRY_POINT: Vec2 = Vec2::new(75.0, -5.0);

/// Local-space offset of the second gun.
pub const FAR_GUN: Vec2 = Vec2::new(600.0, 0.0);

const WRECKAGE: usize = 25;
const WRECKAGE_DEPTH: f32 = 200.0;

fn outline() -> Outline {
    Outline::polygon(&[(0.0, 0.0), (600.0, 0.0), (650.0, -50.0), (-50.0, -50.0)]).with_ring(&[
        (-50.0, -50.0),
        (0.0, -100.0),
        (600.0, -100.0),
        (650.0, -50.0),
    ])
}

/// Hit points of the boss fielded on `level`.
#[must_use]
pub fn health_for(level: u32) -> u32 {
    level.saturating_add(5).saturating_mul(10)
}

/// Builds the dormant boss for `level`.
#[must_use]
pub fn build(level: u32) -> Entity {
    Entity::new(
        EntityKind::Boss,
        Motion::at(ENTRY_POINT),
        outline(),
        EntityInner::Boss(BossState {
            health: health_for(level),
            time_to_fire: true,
        }),
    )
    .dormant()
    .with_timer(TimerTag::Spawn, ALIEN_DELAY_MS)
    .with_timer(TimerTag::Stop, ALIEN_DELAY_MS + BOSS_STOP_AFTER_MS)
    .with_timer(TimerTag::Fire, ALIEN_DELAY_MS + BOSS_FIRST_FIRE_AFTER_MS)
}

fn volley(entity: &Entity, ctx: &mut Ctx<'_>) {
    let Some(player) = ctx.sightings().player else {
        return;
    };
    let near = entity.position();
    let far = near + FAR_GUN;
    ctx.spawn(projectile::boss_bullet(far, aim(far, player)));
    ctx.spawn(projectile::boss_bullet(near, aim(near, player)));
}

/// Collision and timer reactions of the boss.
pub struct BossBehavior;

impl Behavior for BossBehavior {
    fn collide(&self, entity: &mut Entity, other: &Contact, ctx: &mut Ctx<'_>) {
        if !other.destroys.contains(Destroys::BOSS) {
            return;
        }
        let EntityInner::Boss(state) = &mut entity.inner else {
            return;
        };
        state.health = state.health.saturating_sub(1);
        if state.health > 0 {
            return;
        }

        entity.expire();
        ctx.notify(Notice::BossDestroyed);
        ctx.play(SoundKind::BangLarge);
        for _ in 0..WRECKAGE {
            let x = ctx.rng().gen_range(0.0..WORLD_SIZE);
            let y = ctx.rng().gen_range(0.0..WRECKAGE_DEPTH);
            let piece = debris::debris(EntityKind::AlienDebris, Vec2::new(x, y), ctx.rng());
            ctx.spawn(piece);
        }
        ctx.score(BOSS_SCORE);
    }

    fn on_timer(&self, entity: &mut Entity, tag: TimerTag, ctx: &mut Ctx<'_>) {
        match tag {
            TimerTag::Spawn => {
                entity.activate();
                entity.motion_mut().velocity = from_polar(BOSS_SPEED, FRAC_PI_2);
            }
            TimerTag::Stop => {
                entity.motion_mut().velocity = Vec2::ZERO;
            }
            TimerTag::Fire => {
                let EntityInner::Boss(state) = &mut entity.inner else {
                    return;
                };
                let firing = state.time_to_fire;
                state.time_to_fire = !firing;
                if firing {
                    volley(entity, ctx);
                    ctx.schedule(entity.id(), TimerTag::Fire, BOSS_VOLLEY_MS);
                } else {
                    ctx.schedule(entity.id(), TimerTag::Fire, BOSS_REST_MS);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Sightings;
    use crate::output::Output;
    use crate::tests::helpers::{contact, rng};

    fn shoot(boss: &mut Entity, times: u32, by: EntityKind) -> Vec<Output> {
        let mut rng = rng(2);
        let mut outputs = Vec::new();
        let sightings = Sightings::default();
        let mut ctx = Ctx::new(&mut rng, &sightings, &mut outputs);
        for _ in 0..times {
            BossBehavior.collide(boss, &contact(by, Vec2::ZERO), &mut ctx);
        }
        outputs
    }

    fn health(boss: &Entity) -> Option<u32> {
        boss.as_boss().map(|b| b.health)
    }

    #[test]
    fn health_scales_with_level() {
        assert_eq!(health_for(5), 100);
        assert_eq!(health_for(10), 150);
        assert_eq!(health(&build(5)), Some(100));
    }

    #[test]
    fn each_player_hit_costs_one_health() {
        let mut boss = build(5);
        boss.activate();
        let outputs = shoot(&mut boss, 3, EntityKind::PlayerBullet);
        assert_eq!(health(&boss), Some(97));
        assert!(boss.is_live());
        assert!(outputs.is_empty());
    }

    #[test]
    fn other_weapons_do_nothing() {
        let mut boss = build(5);
        boss.activate();
        shoot(&mut boss, 3, EntityKind::Ship);
        shoot(&mut boss, 3, EntityKind::Missile);
        shoot(&mut boss, 3, EntityKind::Asteroid);
        assert_eq!(health(&boss), Some(100));
    }

    #[test]
    fn last_hit_destroys() {
        let mut boss = build(5);
        boss.activate();
        let outputs = shoot(&mut boss, 100, EntityKind::PlayerBullet);
        assert!(boss.is_expired());
        assert_eq!(health(&boss), Some(0));
        assert!(outputs.contains(&Output::Notice(Notice::BossDestroyed)));
        assert!(outputs.contains(&Output::AddScore(BOSS_SCORE)));
        let wreckage = outputs
            .iter()
            .filter(|o| matches!(o, Output::Spawn(e) if e.kind() == EntityKind::AlienDebris))
            .count();
        assert_eq!(wreckage, WRECKAGE);
    }

    #[test]
    fn drops_in_then_stops() {
        let mut boss = build(5);
        let mut rng = rng(0);
        let mut outputs = Vec::new();
        let sightings = Sightings::default();
        let mut ctx = Ctx::new(&mut rng, &sightings, &mut outputs);
        BossBehavior.on_timer(&mut boss, TimerTag::Spawn, &mut ctx);
        assert!(boss.is_live());
        assert!(boss.motion().velocity.y > 0.0);
        BossBehavior.on_timer(&mut boss, TimerTag::Stop, &mut ctx);
        assert_eq!(boss.motion().velocity, Vec2::ZERO);
    }

    #[test]
    fn volleys_alternate_with_rests() {
        let mut boss = build(5);
        boss.activate();
        let sightings = Sightings {
            player: Some(Vec2::new(375.0, 600.0)),
            alien: None,
        };
        let mut rng = rng(0);
        let mut outputs = Vec::new();
        let mut ctx = Ctx::new(&mut rng, &sightings, &mut outputs);
        BossBehavior.on_timer(&mut boss, TimerTag::Fire, &mut ctx);
        BossBehavior.on_timer(&mut boss, TimerTag::Fire, &mut ctx);
        let shots = outputs
            .iter()
            .filter(|o| matches!(o, Output::Spawn(e) if e.kind() == EntityKind::BossBullet))
            .count();
        assert_eq!(shots, 2);
        let delays: Vec<_> = outputs
            .iter()
            .filter_map(|o| match o {
                Output::Schedule { delay_ms, .. } => Some(*delay_ms),
                _ => None,
            })
            .collect();
        assert_eq!(delays, vec![BOSS_VOLLEY_MS, BOSS_REST_MS]);
    }
}
