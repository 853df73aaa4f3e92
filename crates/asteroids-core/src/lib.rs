//! # Asteroids Core
//!
//! Deterministic entity simulation engine for an Asteroids arcade game.
//!
//! This crate owns everything that happens inside one animation tick: entity
//! motion on a toroidal playfield, pairwise outline collision, one-shot timers
//! bound to entity handles, and the game state machine that sequences the
//! splash screen, play, level transitions and game over.
//!
//! ## Architecture
//!
//! - **Entities**: ships, asteroids, aliens, the boss, projectiles, debris,
//!   pickups and the rhythm driver, stored in a generational [`World`]
//! - **Behaviors**: per-kind collision and timer reactions that emit
//!   [`Output`]s instead of mutating the world mid-pass
//! - **Game**: the [`Game`] state machine that applies outputs, reaps expired
//!   entities and resolves scheduled transitions
//!
//! Rendering, audio playback and input polling are external. The core consumes
//! [`Controls`] and [`Command`]s and emits [`Effect`]s.
//!
//! ## Usage
//!
//! ```
//! use asteroids_core::{Command, Controls, Game, GameConfig, Phase};
//!
//! let mut game = Game::new(GameConfig::default());
//! game.queue(Command::Start);
//! game.advance_frame(&Controls::default());
//!
//! assert_eq!(game.phase(), Phase::Playing);
//! assert_eq!(game.lives(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod behavior;
pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod geometry;
pub mod input;
pub mod output;
pub mod timer;
pub mod world;

#[cfg(test)]
mod tests;

pub use config::{GameConfig, Ruleset, WORLD_SIZE};
pub use entity::{Destroys, Entity, EntityId, EntityKind, Lifecycle};
pub use error::CoreError;
pub use game::{Game, Phase};
pub use input::{Command, Controls};
pub use output::{Effect, Notice, Output, SoundKind};
pub use timer::{Scheduler, TimerTag};
pub use world::World;
