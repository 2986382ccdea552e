//! Motor identity, direction, and the per-motor runtime record.

use core::fmt;
use core::str::FromStr;

use serde::Deserialize;

use crate::config::{MotorConfig, MotorPins, StepLimits};
use crate::error::ConfigError;
use crate::gpio::Level;

use super::microstep::MicrostepMode;
use super::position::Position;
use super::state::MotorState;

/// One of the two motor channels on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum MotorId {
    /// First channel.
    Motor1,
    /// Second channel.
    Motor2,
}

impl MotorId {
    /// Both channels.
    pub const ALL: [MotorId; 2] = [MotorId::Motor1, MotorId::Motor2];

    /// Array index of this channel.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            MotorId::Motor1 => 0,
            MotorId::Motor2 => 1,
        }
    }

    /// Configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            MotorId::Motor1 => "motor1",
            MotorId::Motor2 => "motor2",
        }
    }
}

impl fmt::Display for MotorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MotorId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "motor1" => Ok(MotorId::Motor1),
            "motor2" => Ok(MotorId::Motor2),
            _ => Err(ConfigError::UnknownMotor(
                heapless::String::try_from(s).unwrap_or_default(),
            )),
        }
    }
}

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// DIR low (positive step count).
    #[default]
    Forward,
    /// DIR high (negative step count).
    Backward,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub const fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Backward => f.write_str("backward"),
        }
    }
}

/// Runtime record for one motor channel.
#[derive(Debug, Clone)]
pub struct Motor {
    id: MotorId,
    pins: MotorPins,
    invert_direction: bool,
    limits: Option<StepLimits>,
    pub(crate) mode: MicrostepMode,
    pub(crate) direction: Direction,
    pub(crate) state: MotorState,
    pub(crate) enabled: bool,
    pub(crate) position: Position,
}

impl Motor {
    /// Create an idle, disabled motor at the origin.
    pub fn new(id: MotorId, config: &MotorConfig) -> Self {
        Self {
            id,
            pins: config.pins(),
            invert_direction: config.invert_direction,
            limits: config.limits,
            mode: MicrostepMode::default(),
            direction: Direction::default(),
            state: MotorState::default(),
            enabled: false,
            position: Position::default(),
        }
    }

    /// Channel this motor is wired to.
    #[inline]
    pub fn id(&self) -> MotorId {
        self.id
    }

    /// Pin assignment.
    #[inline]
    pub fn pins(&self) -> &MotorPins {
        &self.pins
    }

    /// Last configured microstep mode.
    #[inline]
    pub fn mode(&self) -> MicrostepMode {
        self.mode
    }

    /// Last commanded direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current run state.
    #[inline]
    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Whether the driver outputs are energized.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current position in steps.
    #[inline]
    pub fn position(&self) -> i64 {
        self.position.steps()
    }

    /// Soft limits, if configured.
    #[inline]
    pub fn limits(&self) -> Option<&StepLimits> {
        self.limits.as_ref()
    }

    /// DIR level for `direction`, honouring inversion.
    pub fn dir_level(&self, direction: Direction) -> Level {
        let high = matches!(direction, Direction::Backward);
        Level::from(high != self.invert_direction)
    }
}
