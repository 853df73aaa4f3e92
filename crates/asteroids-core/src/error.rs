//! Error types for the simulation core.
//!
//! The core performs no I/O, so the only errors are contract violations at
//! spawn time and optional resources that a host failed to load.

use thiserror::Error;

/// Errors surfaced by the simulation core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An entity was requested with an out-of-range size or variety.
    #[error("invalid spawn parameters: {what} = {value}")]
    InvalidSpawnParameters {
        /// Which parameter was out of range.
        what: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// An optional audio/visual resource could not be loaded.
    ///
    /// Hosts log this and carry on without the resource.
    #[error("optional resource unavailable: {name}")]
    MissingOptionalResource {
        /// Name of the missing resource.
        name: String,
    },
}

impl CoreError {
    pub(crate) fn invalid(what: &'static str, value: impl Into<i64>) -> Self {
        Self::InvalidSpawnParameters {
            what,
            value: value.into(),
        }
    }
}
