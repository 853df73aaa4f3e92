//! Sound sink standing in for an audio backend.
//!
//! Samples are looked up by file name in an optional directory. A missing
//! sample disables that one sound: the first request logs a warning, later
//! requests are dropped quietly. Nothing here ever fails the run.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use asteroids_core::{CoreError, SoundKind};
use tracing::{trace, warn};

/// Resolves sound intents against a sample directory and tallies them.
#[derive(Debug, Default)]
pub struct SoundSink {
    samples: HashMap<SoundKind, PathBuf>,
    warned: HashSet<SoundKind>,
    played: BTreeMap<&'static str, u64>,
    dropped: u64,
}

impl SoundSink {
    /// Indexes the samples present in `dir`. With no directory every sound is
    /// unavailable.
    pub fn new(dir: Option<&Path>) -> Self {
        let samples = dir
            .map(|dir| {
                SoundKind::ALL
                    .into_iter()
                    .map(|kind| (kind, dir.join(kind.file_name())))
                    .filter(|(_, path)| path.is_file())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            samples,
            ..Self::default()
        }
    }

    /// Sample file for a sound.
    ///
    /// # Errors
    ///
    /// [`CoreError::MissingOptionalResource`] when the sample was not found.
    pub fn resolve(&self, kind: SoundKind) -> Result<&Path, CoreError> {
        self.samples
            .get(&kind)
            .map(PathBuf::as_path)
            .ok_or_else(|| CoreError::MissingOptionalResource {
                name: kind.file_name().to_string(),
            })
    }

    /// Handles one play intent.
    pub fn play(&mut self, kind: SoundKind) {
        match self.resolve(kind) {
            Ok(path) => {
                trace!(sample = %path.display(), "sound");
                *self.played.entry(kind.file_name()).or_default() += 1;
            }
            Err(err) => {
                self.dropped += 1;
                if self.warned.insert(kind) {
                    warn!(%err, "sound disabled");
                }
            }
        }
    }

    /// Plays per sample file.
    pub fn played(&self) -> &BTreeMap<&'static str, u64> {
        &self.played
    }

    /// Intents dropped for want of a sample.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
