//! Scripted pilot used to exercise the core without a human at the keys.
//!
//! Each frame it picks the nearest hazard, swings the nose toward it, fires
//! when roughly lined up and thrusts in short bursts when the hazard is far
//! away. Missiles go out whenever a saucer is on screen.

use asteroids_core::geometry::normalize_angle;
use asteroids_core::{Command, Controls, EntityKind, Game, Phase};
use glam::Vec2;

/// Heading error tolerated before the pilot turns.
const DEADBAND: f32 = 0.1;
/// Heading error within which the pilot fires.
const FIRING_CONE: f32 = 0.3;
/// Beyond this distance the pilot closes in.
const CHASE_DISTANCE: f32 = 250.0;
/// Within this distance an enhanced pilot teleports away.
const PANIC_DISTANCE: f32 = 40.0;

const FIRE_EVERY: u64 = 4;
const MISSILE_EVERY: u64 = 120;

/// What the pilot does this frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Decision {
    pub controls: Controls,
    pub commands: Vec<Command>,
}

#[derive(Debug)]
pub struct Autopilot {
    frame: u64,
    enhanced: bool,
}

impl Autopilot {
    pub fn new(enhanced: bool) -> Self {
        Self { frame: 0, enhanced }
    }

    pub fn decide(&mut self, game: &Game) -> Decision {
        let frame = self.frame;
        self.frame += 1;

        let mut decision = Decision::default();
        if game.phase() == Phase::Splash {
            decision.commands.push(Command::Start);
            return decision;
        }
        let Some(ship) = game.ship_id().and_then(|id| game.world().get(id)) else {
            return decision;
        };
        let Some((target, distance)) = nearest_hazard(game, ship.position()) else {
            return decision;
        };

        let offset = target - ship.position();
        let error = normalize_angle(offset.y.atan2(offset.x) - ship.rotation());
        decision.controls.turn_right = error > DEADBAND;
        decision.controls.turn_left = error < -DEADBAND;
        decision.controls.thrust = distance > CHASE_DISTANCE && frame % 3 == 0;

        if error.abs() < FIRING_CONE && frame % FIRE_EVERY == 0 {
            decision.commands.push(Command::FirePrimary);
        }
        if game.world().count_live(EntityKind::Alien) > 0 && frame % MISSILE_EVERY == 0 {
            decision.commands.push(Command::FireSecondary);
        }
        if self.enhanced && distance < PANIC_DISTANCE {
            decision.commands.push(Command::Teleport);
        }
        decision
    }
}

fn nearest_hazard(game: &Game, from: Vec2) -> Option<(Vec2, f32)> {
    game.world()
        .visible()
        .filter(|e| e.kind().is_hazard())
        .map(|e| (e.position(), e.position().distance(from)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
