//! Cross-module tests for the simulation core.
//!
//! - `determinism.rs`: same seed and inputs give the same session
//! - `integration.rs`: end-to-end behavior through [`Game`](crate::Game) and
//!   the [`World`](crate::World)
//! - `helpers.rs`: factories shared with the per-module unit tests

mod determinism;
pub mod helpers;
