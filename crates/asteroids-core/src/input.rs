//! Player input as the core sees it.
//!
//! Key polling is external. Held keys arrive as a [`Controls`] snapshot each
//! tick; discrete presses arrive as [`Command`]s queued on the game and
//! processed at the start of the next tick, in the order received.

use serde::{Deserialize, Serialize};

/// Continuous controls, held for the whole tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Accelerate along the heading.
    pub thrust: bool,
    /// Rotate counter-clockwise.
    pub turn_left: bool,
    /// Rotate clockwise.
    pub turn_right: bool,
}

impl Controls {
    /// Controls with only thrust held.
    #[must_use]
    pub fn thrusting() -> Self {
        Self {
            thrust: true,
            ..Self::default()
        }
    }

    /// Net turn direction: -1 left, +1 right, 0 when neither or both are held.
    #[must_use]
    pub fn turn(&self) -> i8 {
        i8::from(self.turn_right) - i8::from(self.turn_left)
    }
}

/// Discrete commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Fire a bullet from the ship's nose.
    FirePrimary,
    /// Launch a homing missile (only while an alien is in play).
    FireSecondary,
    /// Jump the ship to a random position (enhanced ruleset).
    Teleport,
    /// Pause or resume the simulation.
    TogglePause,
    /// Start a new game.
    Start,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_direction() {
        let mut controls = Controls::default();
        assert_eq!(controls.turn(), 0);
        controls.turn_left = true;
        assert_eq!(controls.turn(), -1);
        controls.turn_right = true;
        assert_eq!(controls.turn(), 0);
        controls.turn_left = false;
        assert_eq!(controls.turn(), 1);
    }

    #[test]
    fn thrusting_helper() {
        let controls = Controls::thrusting();
        assert!(controls.thrust);
        assert_eq!(controls.turn(), 0);
    }
}
