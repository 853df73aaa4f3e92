//! Game module: the state machine that drives one play session.
//!
//! [`Game::advance_frame`] runs one tick in a fixed order:
//!
//! 1. **COMMANDS**: Apply queued [`Command`]s (start, pause, fire, teleport)
//! 2. **CLOCK**: Advance simulated time by one frame interval
//! 3. **CONTROLS**: Apply held [`Controls`] to the ship
//! 4. **TIMERS**: Dispatch every due timer to its owner, if still alive
//! 5. **MOTION**: Move every live entity
//! 6. **COLLISION**: Notify both sides of every overlapping pair
//! 7. **APPLY**: Insert spawned entities, arm timers, credit score, then
//!    handle notices
//! 8. **REAP**: Remove expired entities
//! 9. **TRANSITION**: Resolve a scheduled transition whose deadline passed
//! 10. **EXTRAS**: Best score, extra lives and shield pickups (enhanced only)
//!
//! Behaviors never touch the game directly. Everything they want goes through
//! [`Output`]s which the game applies between passes, so the registry is
//! never mutated while it is being iterated.
//!
//! # Phases
//!
//! ```text
//! Splash --Start--> Playing --ship lost / level cleared--> TransitionPending
//!                      ^                                        |
//!                      +-------- deadline reached, lives > 0 ---+
//!                                                               |
//!                    GameOver <---- deadline reached, lives == 0
//! ```
//!
//! `Start` is accepted from every phase and always begins a fresh game.
//!
//! # Example
//!
//! ```
//! use asteroids_core::{Command, Controls, EntityKind, Game, GameConfig};
//!
//! let mut game = Game::new(GameConfig::default());
//! game.queue(Command::Start);
//! game.advance_frame(&Controls::default());
//!
//! assert_eq!(game.level(), 1);
//! assert_eq!(game.world().count_live(EntityKind::Asteroid), 4);
//! ```

use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;
use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::behavior::{self, alien, asteroid, boss, projectile, ship, Ctx, Sightings};
use crate::config::{
    GameConfig, ASTEROID_BASE_SPEED, BOSS_LEVEL_INTERVAL, EDGE_OFFSET, END_DELAY_MS, WORLD_SIZE,
};
use crate::entity::{AlienSize, AsteroidSize, Entity, EntityId, EntityKind};
use crate::input::{Command, Controls};
use crate::output::{Effect, Notice, Output, SoundKind};
use crate::timer::Scheduler;
use crate::world::World;

const TITLE_LEGEND: &str = "Asteroids";
const PAUSED_LEGEND: &str = "PAUSED";
const GAME_OVER_LEGEND: &str = "GAME OVER";

/// Asteroid spawn slots, cycled round-robin.
const CORNER_SLOTS: [Vec2; 4] = [
    Vec2::new(EDGE_OFFSET, EDGE_OFFSET),
    Vec2::new(WORLD_SIZE - EDGE_OFFSET, EDGE_OFFSET),
    Vec2::new(EDGE_OFFSET, WORLD_SIZE - EDGE_OFFSET),
    Vec2::new(WORLD_SIZE - EDGE_OFFSET, WORLD_SIZE - EDGE_OFFSET),
];

// =============================================================================
// Phase
// =============================================================================

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen with drifting asteroids; waiting for `Start`.
    Splash,
    /// A level is in progress.
    Playing,
    /// A respawn, level advance or game over is scheduled.
    TransitionPending,
    /// Out of lives. Only `Start` is accepted.
    GameOver,
}

impl Phase {
    /// True while a level is being played, with or without a pending
    /// transition.
    #[must_use]
    pub fn in_play(self) -> bool {
        matches!(self, Self::Playing | Self::TransitionPending)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Splash => "splash",
            Self::Playing => "playing",
            Self::TransitionPending => "transition_pending",
            Self::GameOver => "game_over",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Game
// =============================================================================

/// One play session: world, timers, counters and the phase machine.
///
/// The host calls [`Game::advance_frame`] once per frame with the held
/// controls, queues discrete presses with [`Game::queue`], draws
/// [`World::visible`] and drains [`Game::take_effects`].
pub struct Game {
    config: GameConfig,
    world: World,
    scheduler: Scheduler,
    rng: ChaCha8Rng,

    phase: Phase,
    paused: bool,
    /// Deadline of the pending transition; a later schedule overwrites it.
    transition_at: Option<u64>,

    lives: u32,
    score: u64,
    level: u32,
    best_score: u64,
    extra_life_at: u64,
    /// Whether this level's shield pickup has been placed.
    shield_round: bool,

    ship: Option<EntityId>,
    alien: Option<EntityId>,
    boss: Option<EntityId>,
    missiles_in_flight: u32,

    commands: VecDeque<Command>,
    effects: Vec<Effect>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("now_ms", &self.scheduler.now_ms())
            .field("lives", &self.lives)
            .field("score", &self.score)
            .field("level", &self.level)
            .field("entities", &self.world.len())
            .finish_non_exhaustive()
    }
}

/// Counters whose change triggers [`Effect::StatsChanged`].
#[derive(PartialEq)]
struct Stats {
    lives: u32,
    score: u64,
    level: u32,
    best_score: u64,
    boss_health: Option<u32>,
}

impl Game {
    /// Creates a session on the splash screen.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let extra_life_at = config.extra_life_step;
        let mut game = Self {
            config,
            world: World::new(),
            scheduler: Scheduler::new(),
            rng,
            phase: Phase::Splash,
            paused: false,
            transition_at: None,
            lives: 0,
            score: 0,
            level: 1,
            best_score: 0,
            extra_life_at,
            shield_round: false,
            ship: None,
            alien: None,
            boss: None,
            missiles_in_flight: 0,
            commands: VecDeque::new(),
            effects: Vec::new(),
        };
        game.splash_screen();
        game
    }

    /// Queues a discrete command for the start of the next tick.
    pub fn queue(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Runs one tick.
    ///
    /// While paused only queued commands are processed; the clock, timers and
    /// entities stand still.
    pub fn advance_frame(&mut self, controls: &Controls) {
        let before = self.stats();

        self.process_commands();
        if self.paused {
            return;
        }

        let now = self
            .scheduler
            .now_ms()
            .saturating_add(self.config.frame_interval_ms);
        self.scheduler.advance_to(now);

        self.apply_controls(controls);

        let sightings = self.sightings();
        let mut outputs = Vec::new();
        for timer in self.scheduler.drain_due() {
            self.world
                .dispatch_timer(&timer, &mut self.rng, &sightings, &mut outputs);
        }
        self.apply_outputs(outputs);

        self.world.advance(1.0);

        let sightings = self.sightings();
        let mut outputs = Vec::new();
        self.world
            .resolve_collisions(&mut self.rng, &sightings, &mut outputs);
        self.apply_outputs(outputs);

        self.world.reap();
        self.resolve_transition();
        if self.config.is_enhanced() {
            self.enhanced_bookkeeping();
        }

        if self.stats() != before {
            self.effects.push(Effect::StatsChanged);
        }
        trace!(
            now_ms = now,
            phase = %self.phase,
            entities = self.world.len(),
            "frame"
        );
    }

    /// Drains the side-channel effects produced since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while the simulation is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Current level, starting at 1.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Best score of the session (enhanced ruleset; 0 otherwise).
    #[must_use]
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Health of the boss, while one is in the world.
    #[must_use]
    pub fn boss_health(&self) -> Option<u32> {
        self.boss
            .and_then(|id| self.world.get(id))
            .filter(|e| !e.is_expired())
            .and_then(Entity::as_boss)
            .map(|b| b.health)
    }

    /// Homing missiles currently flying.
    #[must_use]
    pub fn missiles_in_flight(&self) -> u32 {
        self.missiles_in_flight
    }

    /// Simulated milliseconds since the session or game started.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Handle of the player ship, if one is in the world.
    #[must_use]
    pub fn ship_id(&self) -> Option<EntityId> {
        self.ship.filter(|id| self.world.is_alive(*id))
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The entity registry, for drawing and inspection.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub(crate) fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    fn stats(&self) -> Stats {
        Stats {
            lives: self.lives,
            score: self.score,
            level: self.level,
            best_score: self.best_score,
            boss_health: self.boss_health(),
        }
    }

    fn live_ship(&self) -> Option<&Entity> {
        self.ship
            .and_then(|id| self.world.get(id))
            .filter(|e| e.is_live())
    }

    fn sightings(&self) -> Sightings {
        Sightings {
            player: self.live_ship().map(Entity::position),
            alien: self
                .alien
                .and_then(|id| self.world.get(id))
                .filter(|e| e.is_live())
                .map(Entity::position),
        }
    }

    // =========================================================================
    // Commands and controls
    // =========================================================================

    fn process_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            debug!(?command, phase = %self.phase, "command");
            match command {
                Command::Start => self.new_game(),
                Command::TogglePause => self.toggle_pause(),
                _ if self.paused || !self.phase.in_play() => {}
                Command::FirePrimary => self.fire_primary(),
                Command::FireSecondary => self.fire_secondary(),
                Command::Teleport => self.teleport(),
            }
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        let legend = if self.paused { PAUSED_LEGEND } else { "" };
        self.effects.push(Effect::SetLegend(legend.to_string()));
        info!(paused = self.paused, "pause_toggled");
    }

    fn fire_primary(&mut self) {
        let Some(ship) = self.live_ship() else {
            return;
        };
        if self.world.count_live(EntityKind::PlayerBullet) >= self.config.bullet_limit {
            return;
        }
        let bullet = projectile::player_bullet(ship::nose(ship), ship.rotation());
        self.spawn(bullet);
        self.effects.push(Effect::PlaySound(SoundKind::Fire));
    }

    fn fire_secondary(&mut self) {
        let alien_live = self
            .alien
            .and_then(|id| self.world.get(id))
            .is_some_and(Entity::is_live);
        if !alien_live || self.missiles_in_flight >= self.config.missile_limit {
            return;
        }
        let Some(ship) = self.live_ship() else {
            return;
        };
        let missile = projectile::missile(ship::nose(ship), ship.rotation());
        self.spawn(missile);
        self.missiles_in_flight += 1;
    }

    fn teleport(&mut self) {
        if !self.config.is_enhanced() {
            return;
        }
        let Some(ship) = self
            .ship
            .and_then(|id| self.world.get_mut(id))
            .filter(|e| e.is_live())
        else {
            return;
        };
        ship::teleport(ship, &mut self.rng);
    }

    fn apply_controls(&mut self, controls: &Controls) {
        let Some(ship) = self
            .ship
            .and_then(|id| self.world.get_mut(id))
            .filter(|e| e.is_live())
        else {
            return;
        };
        let sightings = Sightings::default();
        let mut outputs = Vec::new();
        if controls.thrust {
            let mut ctx = Ctx::new(&mut self.rng, &sightings, &mut outputs);
            ship::accelerate(ship, &mut ctx);
        } else {
            ship::decelerate(ship);
        }
        ship::turn(ship, controls.turn());
        self.apply_outputs(outputs);
    }

    // =========================================================================
    // Outputs and notices
    // =========================================================================

    /// Registers an entity and arms the timers it was built with.
    fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let timers = std::mem::take(&mut entity.boot_timers);
        let id = self.world.insert(entity);
        for (tag, delay_ms) in timers {
            self.scheduler.schedule(id, tag, delay_ms);
        }
        id
    }

    /// Applies one pass worth of outputs.
    ///
    /// Spawns go in first so that notices see the world with fragments
    /// already registered.
    fn apply_outputs(&mut self, outputs: Vec<Output>) {
        let mut notices = Vec::new();
        for output in outputs {
            match output {
                Output::Spawn(entity) => {
                    self.spawn(*entity);
                }
                Output::Schedule {
                    owner,
                    tag,
                    delay_ms,
                } => self.scheduler.schedule(owner, tag, delay_ms),
                Output::AddScore(points) => self.score = self.score.saturating_add(points),
                Output::Sound(sound) => self.effects.push(Effect::PlaySound(sound)),
                Output::Notice(notice) => notices.push(notice),
            }
        }
        for notice in notices {
            self.handle_notice(notice);
        }
    }

    fn handle_notice(&mut self, notice: Notice) {
        debug!(?notice, "notice");
        match notice {
            Notice::MissileRetired => {
                self.missiles_in_flight = self.missiles_in_flight.saturating_sub(1);
            }
            _ if !self.phase.in_play() => {}
            Notice::ShipDestroyed => {
                self.ship = None;
                self.lives = self.lives.saturating_sub(1);
                self.schedule_transition(END_DELAY_MS);
            }
            Notice::AsteroidDestroyed(_) => {
                if self.world.count_live(EntityKind::Asteroid) == 0 {
                    self.schedule_transition(END_DELAY_MS);
                }
            }
            Notice::AlienDestroyed => {
                self.place_alien();
                if self.level_cleared() {
                    self.schedule_transition(END_DELAY_MS);
                }
            }
            Notice::BossDestroyed => {
                self.schedule_transition(END_DELAY_MS * 2);
            }
        }
    }

    fn schedule_transition(&mut self, delay_ms: u64) {
        let at = self.scheduler.now_ms().saturating_add(delay_ms);
        self.transition_at = Some(at);
        self.phase = Phase::TransitionPending;
        debug!(at_ms = at, "transition_scheduled");
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn resolve_transition(&mut self) {
        let Some(at) = self.transition_at else {
            return;
        };
        if self.scheduler.now_ms() < at {
            return;
        }
        self.transition_at = None;

        if self.lives == 0 {
            self.game_over();
            return;
        }

        self.phase = Phase::Playing;
        let ship_was_present = self.live_ship().is_some();
        if !ship_was_present {
            self.place_ship(false);
            debug!(lives = self.lives, "ship_respawned");
        }
        if self.level_cleared() {
            if ship_was_present {
                self.next_level();
            } else {
                self.schedule_transition(END_DELAY_MS);
            }
        }
    }

    fn level_cleared(&self) -> bool {
        if self.is_boss_level() {
            return !self.boss.is_some_and(|id| self.world.is_alive(id));
        }
        self.world.count_live(EntityKind::Asteroid) == 0
            && self.world.count_live(EntityKind::Alien) == 0
    }

    fn is_boss_level(&self) -> bool {
        self.config.is_enhanced() && self.level % BOSS_LEVEL_INTERVAL == 0
    }

    fn splash_screen(&mut self) {
        self.world.clear();
        self.effects
            .push(Effect::SetLegend(TITLE_LEGEND.to_string()));
        self.place_asteroids();
    }

    fn new_game(&mut self) {
        self.world.clear();
        self.scheduler.reset();
        self.phase = Phase::Playing;
        self.paused = false;
        self.transition_at = None;
        self.lives = self.config.starting_lives;
        self.score = 0;
        self.level = 1;
        self.extra_life_at = self.config.extra_life_step;
        self.shield_round = false;
        self.ship = None;
        self.alien = None;
        self.boss = None;
        self.missiles_in_flight = 0;

        self.place_asteroids();
        self.place_ship(false);
        self.place_alien();
        self.spawn(behavior::beatbox());
        self.effects.push(Effect::SetLegend(String::new()));
        info!(lives = self.lives, seed = self.config.seed, "new_game");
    }

    fn next_level(&mut self) {
        let keep_shield = self.config.is_enhanced()
            && self
                .live_ship()
                .and_then(Entity::as_ship)
                .is_some_and(|s| s.shield);

        self.world.clear();
        self.level += 1;
        self.shield_round = false;
        self.missiles_in_flight = 0;
        self.ship = None;
        self.alien = None;
        self.boss = None;

        self.spawn(behavior::beatbox());
        self.place_ship(keep_shield);
        if !self.is_boss_level() {
            self.place_asteroids();
        }
        self.place_alien();
        info!(level = self.level, score = self.score, "level_advanced");
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.effects
            .push(Effect::SetLegend(GAME_OVER_LEGEND.to_string()));
        info!(score = self.score, level = self.level, "game_over");
    }

    // =========================================================================
    // Placement
    // =========================================================================

    fn place_asteroids(&mut self) {
        let count = self.level as usize + 3;
        for slot in CORNER_SLOTS.iter().cycle().take(count) {
            let rock =
                asteroid::random(*slot, AsteroidSize::Large, ASTEROID_BASE_SPEED, &mut self.rng);
            self.spawn(rock);
        }
    }

    fn place_ship(&mut self, shield: bool) {
        let center = Vec2::splat(WORLD_SIZE / 2.0);
        let id = self.spawn(ship::build(center, -FRAC_PI_2, shield));
        self.ship = Some(id);
    }

    /// Places the level's saucer, or the boss on an enhanced boss level.
    ///
    /// No-op on level 1 and while a saucer is already waiting or flying.
    fn place_alien(&mut self) {
        if self.is_boss_level() {
            if self.boss.is_some_and(|id| self.world.is_alive(id)) {
                return;
            }
            let id = self.spawn(boss::build(self.level));
            self.boss = Some(id);
            return;
        }
        if self.alien.is_some_and(|id| self.world.is_alive(id)) {
            return;
        }
        let size = match self.level {
            0 | 1 => return,
            2 => AlienSize::Medium,
            _ => {
                if self.rng.gen_bool(0.5) {
                    AlienSize::Small
                } else {
                    AlienSize::Medium
                }
            }
        };
        let saucer = alien::random(size, &mut self.rng);
        self.alien = Some(self.spawn(saucer));
    }

    // =========================================================================
    // Enhanced ruleset
    // =========================================================================

    fn enhanced_bookkeeping(&mut self) {
        self.best_score = self.best_score.max(self.score);
        if !self.phase.in_play() {
            return;
        }

        let step = self.config.extra_life_step;
        if step > 0 && self.score >= self.extra_life_at {
            self.lives += 1;
            self.extra_life_at = self.extra_life_at.saturating_add(step);
            info!(lives = self.lives, "extra_life");
        }

        let unshielded = self
            .live_ship()
            .and_then(Entity::as_ship)
            .is_some_and(|s| !s.shield);
        if self.level > 1 && unshielded && !self.shield_round {
            let x = self.rng.gen_range(0.0..WORLD_SIZE).floor();
            let y = self.rng.gen_range(0.0..WORLD_SIZE).floor();
            self.spawn(behavior::shield(Vec2::new(x, y)));
            self.shield_round = true;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;
    use crate::config::{BOSS_SCORE, BULLET_LIMIT, INITIAL_BEAT_MS, SHIP_INVINCIBLE_MS};
    use crate::entity::EntityInner;
    use crate::tests::helpers::{contact, frames_for, rng, started, step};

    fn expire(game: &mut Game, id: EntityId) {
        if let Some(entity) = game.world_mut().get_mut(id) {
            entity.expire();
        }
    }

    fn clear_kind(game: &mut Game, kind: EntityKind) {
        let ids: Vec<_> = game
            .world()
            .iter()
            .filter(|e| e.kind() == kind)
            .map(Entity::id)
            .collect();
        for id in ids {
            game.world_mut().remove(id);
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn new_session_shows_splash() {
            let mut game = Game::new(GameConfig::default());
            assert_eq!(game.phase(), Phase::Splash);
            assert_eq!(game.world().count_live(EntityKind::Asteroid), 4);
            assert!(game.ship_id().is_none());
            assert_eq!(
                game.take_effects(),
                vec![Effect::SetLegend("Asteroids".to_string())]
            );
        }

        #[test]
        fn splash_ignores_fire() {
            let mut game = Game::new(GameConfig::default());
            game.queue(Command::FirePrimary);
            step(&mut game, 1);
            assert_eq!(game.world().count_live(EntityKind::PlayerBullet), 0);
            assert_eq!(game.phase(), Phase::Splash);
        }

        #[test]
        fn start_resets_counters() {
            let game = started(GameConfig::default());
            assert_eq!(game.phase(), Phase::Playing);
            assert_eq!(game.lives(), 3);
            assert_eq!(game.score(), 0);
            assert_eq!(game.level(), 1);
            assert_eq!(game.world().count_live(EntityKind::Asteroid), 4);
            assert_eq!(game.world().count_live(EntityKind::Alien), 0);
            assert_eq!(game.world().iter().filter(|e| e.kind() == EntityKind::Beatbox).count(), 1);
        }

        #[test]
        fn asteroids_fill_corner_slots_round_robin() {
            let mut game = Game::new(GameConfig::default());
            game.level = 6;
            game.world_mut().clear();
            game.place_asteroids();
            let positions: Vec<_> = game.world().iter().map(Entity::position).collect();
            assert_eq!(positions.len(), 9);
            assert_eq!(positions[0], CORNER_SLOTS[0]);
            assert_eq!(positions[4], CORNER_SLOTS[0]);
            assert_eq!(positions[8], CORNER_SLOTS[0]);
            assert_eq!(positions[5], CORNER_SLOTS[1]);
        }

        #[test]
        fn pause_freezes_clock() {
            let mut game = started(GameConfig::default());
            let now = game.now_ms();
            game.queue(Command::TogglePause);
            step(&mut game, 10);
            assert!(game.is_paused());
            assert_eq!(game.now_ms(), now);
            assert!(game
                .take_effects()
                .contains(&Effect::SetLegend("PAUSED".to_string())));

            game.queue(Command::TogglePause);
            step(&mut game, 1);
            assert!(!game.is_paused());
            assert!(game.now_ms() > now);
        }

        #[test]
        fn start_from_game_over_begins_again() {
            let mut game = started(GameConfig::default());
            game.phase = Phase::GameOver;
            game.score = 1234;
            game.queue(Command::Start);
            step(&mut game, 1);
            assert_eq!(game.phase(), Phase::Playing);
            assert_eq!(game.score(), 0);
            assert_eq!(game.lives(), 3);
        }
    }

    mod command_tests {
        use super::*;

        #[test]
        fn bullet_limit_caps_primary_fire() {
            let mut game = started(GameConfig::default());
            game.take_effects();
            for _ in 0..BULLET_LIMIT + 5 {
                game.queue(Command::FirePrimary);
            }
            step(&mut game, 1);
            assert_eq!(game.world().count_live(EntityKind::PlayerBullet), BULLET_LIMIT);
            let fire_sounds = game
                .take_effects()
                .iter()
                .filter(|e| **e == Effect::PlaySound(SoundKind::Fire))
                .count();
            assert_eq!(fire_sounds, BULLET_LIMIT);
        }

        #[test]
        fn missile_needs_a_live_alien() {
            let mut game = started(GameConfig::default());
            game.queue(Command::FireSecondary);
            step(&mut game, 1);
            assert_eq!(game.world().count_live(EntityKind::Missile), 0);

            let saucer = alien::build(AlienSize::Medium, Vec2::new(100.0, 600.0), true);
            let id = game.spawn(saucer);
            game.alien = Some(id);
            if let Some(e) = game.world_mut().get_mut(id) {
                e.activate();
            }
            for _ in 0..5 {
                game.queue(Command::FireSecondary);
            }
            step(&mut game, 1);
            assert_eq!(game.world().count_live(EntityKind::Missile), 2);
            assert_eq!(game.missiles_in_flight(), 2);
        }

        #[test]
        fn retired_missiles_free_the_launcher() {
            let mut game = started(GameConfig::default());
            game.missiles_in_flight = 2;
            game.handle_notice(Notice::MissileRetired);
            assert_eq!(game.missiles_in_flight(), 1);
            game.handle_notice(Notice::MissileRetired);
            game.handle_notice(Notice::MissileRetired);
            assert_eq!(game.missiles_in_flight(), 0);
        }

        #[test]
        fn teleport_only_in_enhanced() {
            let mut classic = started(GameConfig::default());
            classic.queue(Command::Teleport);
            step(&mut classic, 1);
            let ship = classic.ship_id().and_then(|id| classic.world().get(id));
            assert_eq!(ship.map(Entity::position), Some(Vec2::splat(375.0)));

            let mut enhanced = started(GameConfig::enhanced(3));
            enhanced.queue(Command::Teleport);
            step(&mut enhanced, 1);
            let ship = enhanced.ship_id().and_then(|id| enhanced.world().get(id));
            assert_ne!(ship.map(Entity::position), Some(Vec2::splat(375.0)));
        }

        #[test]
        fn released_thrust_leaves_no_flame() {
            let mut game = started(GameConfig::default());
            game.advance_frame(&Controls::thrusting());
            game.advance_frame(&Controls::default());
            let ship = game.ship_id().and_then(|id| game.world().get(id));
            assert_eq!(ship.map(|s| s.outline().rings().len()), Some(1));
            assert_eq!(ship.and_then(Entity::as_ship).map(|s| s.flame), Some(false));
        }

        #[test]
        fn thrust_moves_the_ship() {
            let mut game = started(GameConfig::default());
            for _ in 0..5 {
                game.advance_frame(&Controls::thrusting());
            }
            let ship = game.ship_id().and_then(|id| game.world().get(id));
            assert!(ship.is_some_and(|s| s.position().y < 375.0));
        }
    }

    mod transition_tests {
        use super::*;

        fn lose_ship(game: &mut Game) {
            if let Some(id) = game.ship_id() {
                expire(game, id);
            }
            game.handle_notice(Notice::ShipDestroyed);
        }

        #[test]
        fn ship_loss_respawns_after_delay() {
            let mut game = started(GameConfig::default());
            lose_ship(&mut game);
            assert_eq!(game.phase(), Phase::TransitionPending);
            assert_eq!(game.lives(), 2);

            step(&mut game, frames_for(END_DELAY_MS) - 2);
            assert!(game.ship_id().is_none());
            step(&mut game, 3);
            assert_eq!(game.phase(), Phase::Playing);
            let ship = game.ship_id().and_then(|id| game.world().get(id));
            assert!(ship.is_some_and(|s| s.as_ship().is_some_and(|st| st.invincible)));
        }

        #[test]
        fn last_life_ends_the_game() {
            let mut game = started(GameConfig::default());
            game.set_lives(1);
            lose_ship(&mut game);
            step(&mut game, frames_for(END_DELAY_MS) + 1);
            assert_eq!(game.phase(), Phase::GameOver);
            assert!(game.ship_id().is_none());
            assert!(game
                .take_effects()
                .contains(&Effect::SetLegend("GAME OVER".to_string())));
        }

        #[test]
        fn game_over_ignores_play_commands() {
            let mut game = started(GameConfig::default());
            game.set_lives(1);
            lose_ship(&mut game);
            step(&mut game, frames_for(END_DELAY_MS) + 1);
            game.queue(Command::FirePrimary);
            game.queue(Command::Teleport);
            step(&mut game, 1);
            assert_eq!(game.phase(), Phase::GameOver);
            assert_eq!(game.world().count_live(EntityKind::PlayerBullet), 0);
        }

        #[test]
        fn clearing_asteroids_advances_level() {
            let mut game = started(GameConfig::default());
            clear_kind(&mut game, EntityKind::Asteroid);
            game.handle_notice(Notice::AsteroidDestroyed(AsteroidSize::Small));
            assert_eq!(game.phase(), Phase::TransitionPending);
            step(&mut game, frames_for(END_DELAY_MS) + 1);
            assert_eq!(game.level(), 2);
            assert_eq!(game.phase(), Phase::Playing);
            assert_eq!(game.world().count_live(EntityKind::Asteroid), 5);
            let saucer = game.alien.and_then(|id| game.world().get(id));
            assert!(saucer.is_some_and(Entity::is_dormant));
            assert_eq!(
                saucer.and_then(Entity::as_alien).map(|a| a.size),
                Some(AlienSize::Medium)
            );
        }

        #[test]
        fn later_schedule_overwrites_deadline() {
            let mut game = started(GameConfig::default());
            lose_ship(&mut game);
            let first = game.transition_at;
            step(&mut game, 10);
            clear_kind(&mut game, EntityKind::Asteroid);
            game.handle_notice(Notice::AsteroidDestroyed(AsteroidSize::Small));
            assert!(game.transition_at > first);
        }

        #[test]
        fn alien_kill_with_asteroids_left_keeps_playing() {
            let mut game = started(GameConfig::default());
            game.handle_notice(Notice::AlienDestroyed);
            assert_eq!(game.phase(), Phase::Playing);
            assert!(game.transition_at.is_none());

            clear_kind(&mut game, EntityKind::Asteroid);
            game.handle_notice(Notice::AlienDestroyed);
            assert_eq!(game.phase(), Phase::TransitionPending);
        }

        fn beat_interval(game: &Game) -> Option<u64> {
            game.world()
                .iter()
                .find(|e| e.kind() == EntityKind::Beatbox)
                .and_then(Entity::as_beatbox)
                .map(|b| b.interval_ms)
        }

        #[test]
        fn boss_kill_waits_double_delay_then_advances() {
            let mut game = started(GameConfig::enhanced(1));
            game.level = 4;
            clear_kind(&mut game, EntityKind::Asteroid);
            game.handle_notice(Notice::AsteroidDestroyed(AsteroidSize::Small));
            step(&mut game, frames_for(END_DELAY_MS) + 1);
            assert_eq!(game.level(), 5);

            // Still dormant: no boss bullets in flight.
            step(&mut game, frames_for(2000));
            assert!(beat_interval(&game).is_some_and(|ms| ms < INITIAL_BEAT_MS));

            let Some(id) = game.boss else {
                panic!("boss level without a boss");
            };
            let mut outputs = Vec::new();
            if let Some(target) = game.world_mut().get_mut(id) {
                target.activate();
                if let EntityInner::Boss(state) = &mut target.inner {
                    state.health = 1;
                }
                let mut rng = rng(0);
                let sightings = Sightings::default();
                let mut ctx = Ctx::new(&mut rng, &sightings, &mut outputs);
                boss::BossBehavior.collide(
                    target,
                    &contact(EntityKind::PlayerBullet, Vec2::ZERO),
                    &mut ctx,
                );
            }
            game.apply_outputs(outputs);

            let now = game.now_ms();
            assert_eq!(game.phase(), Phase::TransitionPending);
            assert_eq!(game.transition_at, Some(now + END_DELAY_MS * 2));
            assert_eq!(game.score(), BOSS_SCORE);

            step(&mut game, frames_for(END_DELAY_MS * 2) - 1);
            assert_eq!(game.level(), 5);
            step(&mut game, 2);
            assert_eq!(game.level(), 6);
            assert_eq!(game.phase(), Phase::Playing);
            assert!(game.boss_health().is_none());
            assert_eq!(game.world().count_live(EntityKind::Asteroid), 9);
            assert_eq!(beat_interval(&game), Some(INITIAL_BEAT_MS));
        }

        #[test]
        fn respawn_on_cleared_level_defers_advance() {
            let mut game = started(GameConfig::default());
            clear_kind(&mut game, EntityKind::Asteroid);
            lose_ship(&mut game);
            step(&mut game, frames_for(END_DELAY_MS) + 1);
            assert_eq!(game.level(), 1, "respawn first");
            assert!(game.ship_id().is_some());
            assert_eq!(game.phase(), Phase::TransitionPending);
            step(&mut game, frames_for(END_DELAY_MS) + 1);
            assert_eq!(game.level(), 2);
        }

        #[test]
        fn boss_level_fields_boss_without_asteroids() {
            let mut game = started(GameConfig::enhanced(1));
            game.level = 4;
            clear_kind(&mut game, EntityKind::Asteroid);
            game.handle_notice(Notice::AsteroidDestroyed(AsteroidSize::Small));
            step(&mut game, frames_for(END_DELAY_MS) + 1);
            assert_eq!(game.level(), 5);
            assert_eq!(game.world().count_live(EntityKind::Asteroid), 0);
            assert_eq!(game.boss_health(), Some(100));
            assert_eq!(game.phase(), Phase::Playing);
        }
    }

    mod enhanced_tests {
        use super::*;

        #[test]
        fn extra_life_at_threshold() {
            let mut game = started(GameConfig::enhanced(0));
            game.score = 5000;
            step(&mut game, 1);
            assert_eq!(game.lives(), 4);
            assert_eq!(game.best_score(), 5000);
            step(&mut game, 1);
            assert_eq!(game.lives(), 4);
            assert!(game.take_effects().contains(&Effect::StatsChanged));
        }

        #[test]
        fn classic_has_no_extras() {
            let mut game = started(GameConfig::default());
            game.score = 5000;
            step(&mut game, 1);
            assert_eq!(game.lives(), 3);
            assert_eq!(game.best_score(), 0);
        }

        #[test]
        fn one_shield_pickup_per_level_from_level_two() {
            let mut game = started(GameConfig::enhanced(0));
            step(&mut game, 1);
            assert_eq!(game.world().count_live(EntityKind::Shield), 0);

            game.level = 2;
            step(&mut game, 1);
            assert_eq!(game.world().count_live(EntityKind::Shield), 1);
            step(&mut game, 5);
            assert!(game.world().count_live(EntityKind::Shield) <= 1);
            assert!(game.shield_round);
        }

        #[test]
        fn shield_survives_level_change() {
            let mut game = started(GameConfig::enhanced(0));
            step(&mut game, frames_for(SHIP_INVINCIBLE_MS));
            if let Some(state) = game
                .ship
                .and_then(|id| game.world_mut().get_mut(id))
                .and_then(Entity::as_ship_mut)
            {
                state.shield = true;
            }
            clear_kind(&mut game, EntityKind::Asteroid);
            game.handle_notice(Notice::AsteroidDestroyed(AsteroidSize::Small));
            step(&mut game, frames_for(END_DELAY_MS) + 1);
            assert_eq!(game.level(), 2);
            let ship = game.ship_id().and_then(|id| game.world().get(id));
            assert_eq!(ship.and_then(Entity::as_ship).map(|s| s.shield), Some(true));
        }
    }
}
