//! Test helpers shared by unit and integration tests.

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::FRAME_INTERVAL_MS;
use crate::entity::{Contact, Entity, EntityId, EntityKind};
use crate::game::Game;
use crate::geometry::Outline;
use crate::input::{Command, Controls};
use crate::GameConfig;

// =============================================================================
// Randomness and shapes
// =============================================================================

/// Deterministic generator for a test.
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Axis-aligned square outline centered on the local origin.
pub fn square(half: f32) -> Outline {
    Outline::polygon(&[(-half, -half), (half, -half), (half, half), (-half, half)])
}

/// What a behavior sees when an entity of `kind` at `position` touches it.
pub fn contact(kind: EntityKind, position: Vec2) -> Contact {
    Contact {
        id: EntityId::DETACHED,
        kind,
        destroys: kind.destroys(),
        position,
    }
}

// =============================================================================
// Game setup
// =============================================================================

/// A game that has received `Start` and run its first frame.
pub fn started(config: GameConfig) -> Game {
    let mut game = Game::new(config);
    game.queue(Command::Start);
    game.advance_frame(&Controls::default());
    game
}

/// Runs `frames` ticks with no controls held.
pub fn step(game: &mut Game, frames: usize) {
    for _ in 0..frames {
        game.advance_frame(&Controls::default());
    }
}

/// Number of default-length frames needed for `ms` to elapse.
pub fn frames_for(ms: u64) -> usize {
    usize::try_from(ms.div_ceil(FRAME_INTERVAL_MS)).unwrap_or(usize::MAX)
}

/// Every registered entity, in insertion order.
pub fn snapshot(game: &Game) -> Vec<Entity> {
    game.world().iter().cloned().collect()
}

/// Position of the live ship, if any.
pub fn ship_position(game: &Game) -> Option<Vec2> {
    game.ship_id()
        .and_then(|id| game.world().get(id))
        .map(Entity::position)
}
