//! Motor wiring configuration from TOML.

use serde::Deserialize;

use super::limits::StepLimits;

/// The six GPIO lines of one HR8825 channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorPins {
    /// Enable line (high energizes the outputs).
    pub enable: u8,
    /// Direction line.
    pub dir: u8,
    /// Step line (one rising edge per microstep).
    pub step: u8,
    /// M0, M1, M2 mode-select lines.
    pub mode: [u8; 3],
}

impl MotorPins {
    /// All six lines, control lines first.
    pub const fn lines(&self) -> [u8; 6] {
        [
            self.enable,
            self.dir,
            self.step,
            self.mode[0],
            self.mode[1],
            self.mode[2],
        ]
    }
}

/// Motor channel configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MotorConfig {
    /// Enable line.
    pub enable: u8,
    /// Direction line.
    pub dir: u8,
    /// Step line.
    pub step: u8,
    /// M0, M1, M2 lines.
    pub mode: [u8; 3],

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Optional soft limits.
    #[serde(default)]
    pub limits: Option<StepLimits>,
}

impl MotorConfig {
    /// Waveshare Stepper Motor HAT wiring for channel 1 (BCM numbering).
    pub const fn motor1() -> Self {
        Self::wired(12, 13, 19, [16, 17, 20])
    }

    /// Waveshare Stepper Motor HAT wiring for channel 2 (BCM numbering).
    pub const fn motor2() -> Self {
        Self::wired(4, 24, 18, [21, 22, 27])
    }

    /// Configuration with the given lines and no inversion or limits.
    pub const fn wired(enable: u8, dir: u8, step: u8, mode: [u8; 3]) -> Self {
        Self {
            enable,
            dir,
            step,
            mode,
            invert_direction: false,
            limits: None,
        }
    }

    /// Pin assignment.
    pub const fn pins(&self) -> MotorPins {
        MotorPins {
            enable: self.enable,
            dir: self.dir,
            step: self.step,
            mode: self.mode,
        }
    }
}
