//! Step program configuration from TOML.

use serde::Deserialize;

use crate::motor::{ControlSource, Direction, MicrostepMode, MotorId};

/// Maximum number of moves in a program.
pub const MAX_MOVES: usize = 32;

/// One entry of a step program: select, configure, pulse, stop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MoveConfig {
    /// Motor channel to drive.
    pub motor: MotorId,

    /// Who sets the mode-select lines.
    #[serde(default)]
    pub control: ControlSource,

    /// Microstep resolution.
    #[serde(default)]
    pub microstep: MicrostepMode,

    /// Rotation direction.
    pub direction: Direction,

    /// Number of step pulses.
    pub steps: u32,

    /// Half period of the step square wave in milliseconds.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u32,
}

fn default_step_delay_ms() -> u32 {
    2
}

impl MoveConfig {
    /// Blocking time of this move, ignoring pin write latency.
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.steps) * 2 * u64::from(self.step_delay_ms)
    }
}

/// Moves of the stock demo: a NEMA motor on channel 1 makes one backward
/// revolution at hardware-selected full step, then a 28BYJ-48 on channel 2
/// makes one backward revolution at software-selected full step.
pub fn demo_moves() -> heapless::Vec<MoveConfig, MAX_MOVES> {
    let mut moves = heapless::Vec::new();
    let _ = moves.push(MoveConfig {
        motor: MotorId::Motor1,
        control: ControlSource::Hardware,
        microstep: MicrostepMode::Full,
        direction: Direction::Backward,
        steps: 200,
        step_delay_ms: 2,
    });
    let _ = moves.push(MoveConfig {
        motor: MotorId::Motor2,
        control: ControlSource::Software,
        microstep: MicrostepMode::Full,
        direction: Direction::Backward,
        steps: 2048,
        step_delay_ms: 2,
    });
    moves
}
