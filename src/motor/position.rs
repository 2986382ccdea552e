//! Position tracking for stepper motors.

use super::axis::Direction;

/// Absolute motor position in step pulses from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    steps: i64,
}

impl Position {
    /// Create a position tracker at a specific position.
    #[inline]
    pub const fn at(steps: i64) -> Self {
        Self { steps }
    }

    /// Get current position in steps.
    #[inline]
    pub const fn steps(&self) -> i64 {
        self.steps
    }

    /// Record one completed step pulse.
    #[inline]
    pub fn advance(&mut self, direction: Direction) {
        self.steps = self.steps.saturating_add(direction.sign());
    }

    /// Set current position as the new origin.
    #[inline]
    pub fn set_origin(&mut self) {
        self.steps = 0;
    }

    /// Signed steps needed to reach `target`, or `None` if the distance
    /// does not fit in an `i64`.
    #[inline]
    pub const fn steps_to(&self, target: i64) -> Option<i64> {
        target.checked_sub(self.steps)
    }
}
