//! Outputs emitted by entity behaviors and effects emitted to the host.
//!
//! Behaviors never reach into the world or the game while the world is being
//! iterated. They push [`Output`]s instead, and the game applies them once
//! the collision or timer pass is over:
//!
//! - `Spawn` adds an entity (visible to the next pass)
//! - `Schedule` arms a timer
//! - `AddScore` and `Notice` feed the state machine
//! - `Sound` becomes an [`Effect::PlaySound`]
//!
//! [`Effect`]s are fire-and-forget intents for the excluded audio and display
//! layers. A dropped effect is not an error.

use serde::{Deserialize, Serialize};

use crate::entity::{AsteroidSize, Entity, EntityId};
use crate::timer::TimerTag;

/// A deferred request produced by a behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Add a new entity to the world.
    Spawn(Box<Entity>),
    /// Arm a timer.
    Schedule {
        /// Timer owner.
        owner: EntityId,
        /// Behavior to run.
        tag: TimerTag,
        /// Delay from now.
        delay_ms: u64,
    },
    /// Add points to the score.
    AddScore(u64),
    /// Tell the state machine something happened.
    Notice(Notice),
    /// Play a sound.
    Sound(SoundKind),
}

impl Output {
    /// Short label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Spawn(_) => "spawn",
            Self::Schedule { .. } => "schedule",
            Self::AddScore(_) => "add_score",
            Self::Notice(_) => "notice",
            Self::Sound(_) => "sound",
        }
    }
}

/// Game-level happenings reported by behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// The player ship was destroyed.
    ShipDestroyed,
    /// An asteroid of the given size was destroyed.
    AsteroidDestroyed(AsteroidSize),
    /// An alien saucer was destroyed.
    AlienDestroyed,
    /// The boss was destroyed.
    BossDestroyed,
    /// A homing missile left play.
    MissileRetired,
}

/// Sounds the core asks the host to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKind {
    /// Player shot.
    Fire,
    /// Ship thrust.
    Thrust,
    /// Ship destroyed.
    ShipCrash,
    /// Small asteroid destroyed.
    BangSmall,
    /// Medium asteroid destroyed.
    BangMedium,
    /// Large asteroid or boss destroyed.
    BangLarge,
    /// Alien destroyed.
    AlienCrash,
    /// Small saucer hum.
    SaucerSmall,
    /// Medium saucer hum.
    SaucerBig,
    /// First ambient beat.
    Beat1,
    /// Second ambient beat.
    Beat2,
}

impl SoundKind {
    /// Every sound kind.
    pub const ALL: [Self; 11] = [
        Self::Fire,
        Self::Thrust,
        Self::ShipCrash,
        Self::BangSmall,
        Self::BangMedium,
        Self::BangLarge,
        Self::AlienCrash,
        Self::SaucerSmall,
        Self::SaucerBig,
        Self::Beat1,
        Self::Beat2,
    ];

    /// Sample file a host would load for this sound.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Fire => "fire.wav",
            Self::Thrust => "thrust.wav",
            Self::ShipCrash => "bangShip.wav",
            Self::BangSmall => "bangSmall.wav",
            Self::BangMedium => "bangMedium.wav",
            Self::BangLarge => "bangLarge.wav",
            Self::AlienCrash => "bangAlienShip.wav",
            Self::SaucerSmall => "saucerSmall.wav",
            Self::SaucerBig => "saucerBig.wav",
            Self::Beat1 => "beat1.wav",
            Self::Beat2 => "beat2.wav",
        }
    }

    /// Crash sound for an asteroid of the given size.
    #[must_use]
    pub const fn for_asteroid(size: AsteroidSize) -> Self {
        match size {
            AsteroidSize::Small => Self::BangSmall,
            AsteroidSize::Medium => Self::BangMedium,
            AsteroidSize::Large => Self::BangLarge,
        }
    }
}

/// Side-channel intents for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Play a sound now.
    PlaySound(SoundKind),
    /// Replace the centered legend text (empty clears it).
    SetLegend(String),
    /// Lives, score, level or boss health may have changed.
    StatsChanged,
}
