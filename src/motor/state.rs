//! Motor run state.

use core::fmt;

/// Run state of one motor.
///
/// `Running` only while a step sequence is being pulsed out; the driver
/// returns to `Idle` when the sequence ends, fails, or is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// Not pulsing.
    #[default]
    Idle,
    /// Pulsing a step sequence.
    Running,
}

impl MotorState {
    /// Get the state name as a static string.
    pub const fn name(self) -> &'static str {
        match self {
            MotorState::Idle => "Idle",
            MotorState::Running => "Running",
        }
    }
}

impl fmt::Display for MotorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
