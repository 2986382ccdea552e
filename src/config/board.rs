//! Board configuration - root configuration structure.

use heapless::{String, Vec};
use serde::Deserialize;

use crate::motor::MotorId;

use super::motor::MotorConfig;
use super::program::{demo_moves, MoveConfig, MAX_MOVES};

/// Both motor channels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Motors {
    /// Channel 1 wiring.
    #[serde(default = "MotorConfig::motor1")]
    pub motor1: MotorConfig,

    /// Channel 2 wiring.
    #[serde(default = "MotorConfig::motor2")]
    pub motor2: MotorConfig,
}

impl Default for Motors {
    fn default() -> Self {
        Self {
            motor1: MotorConfig::motor1(),
            motor2: MotorConfig::motor2(),
        }
    }
}

impl Motors {
    /// Configuration for `id`.
    pub fn get(&self, id: MotorId) -> &MotorConfig {
        match id {
            MotorId::Motor1 => &self.motor1,
            MotorId::Motor2 => &self.motor2,
        }
    }

    /// Mutable configuration for `id`.
    pub fn get_mut(&mut self, id: MotorId) -> &mut MotorConfig {
        match id {
            MotorId::Motor1 => &mut self.motor1,
            MotorId::Motor2 => &mut self.motor2,
        }
    }

    /// Every line of both channels, channel 1 first.
    pub fn lines(&self) -> [u8; 12] {
        let mut lines = [0; 12];
        lines[..6].copy_from_slice(&self.motor1.pins().lines());
        lines[6..].copy_from_slice(&self.motor2.pins().lines());
        lines
    }
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoardConfig {
    /// GPIO chip index. `None` detects it from the board model.
    #[serde(default)]
    pub chip: Option<u8>,

    /// Consumer label shown by the kernel for claimed lines.
    #[serde(default = "default_consumer")]
    pub consumer: String<32>,

    /// Motor wiring.
    #[serde(default)]
    pub motors: Motors,

    /// Moves executed by the program runner.
    #[serde(default = "demo_moves")]
    pub program: Vec<MoveConfig, MAX_MOVES>,
}

fn default_consumer() -> String<32> {
    String::try_from("stepper-hat").unwrap_or_default()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            chip: None,
            consumer: default_consumer(),
            motors: Motors::default(),
            program: demo_moves(),
        }
    }
}

impl BoardConfig {
    /// Get a motor configuration by channel.
    pub fn motor(&self, id: MotorId) -> &MotorConfig {
        self.motors.get(id)
    }

    /// Every line the board uses.
    pub fn lines(&self) -> [u8; 12] {
        self.motors.lines()
    }
}
