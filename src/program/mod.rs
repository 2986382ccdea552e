//! Step programs: ordered moves executed against a [`StepperDriver`].
//!
//! [`StepperDriver`]: crate::motor::StepperDriver

mod runner;

pub use runner::RunReport;

use heapless::Vec;

use crate::config::{demo_moves, BoardConfig, MoveConfig, MAX_MOVES};
use crate::error::{ConfigError, Error, Result};
use crate::motor::MotorId;

/// An ordered list of moves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    moves: Vec<MoveConfig, MAX_MOVES>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock two-motor demo.
    pub fn demo() -> Self {
        Self { moves: demo_moves() }
    }

    /// Load the moves from a board configuration.
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            moves: config.program.clone(),
        }
    }

    /// Append a move.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is full.
    pub fn push(&mut self, mv: MoveConfig) -> Result<()> {
        self.moves
            .push(mv)
            .map_err(|_| Error::Config(ConfigError::ProgramTooLong))
    }

    /// Get the number of moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Get an iterator over moves.
    pub fn iter(&self) -> impl Iterator<Item = &MoveConfig> {
        self.moves.iter()
    }

    /// Moves that drive `motor`.
    pub fn moves_for(&self, motor: MotorId) -> impl Iterator<Item = &MoveConfig> {
        self.moves.iter().filter(move |mv| mv.motor == motor)
    }

    /// Step pulses issued by the whole program.
    pub fn total_steps(&self) -> u64 {
        self.moves.iter().map(|mv| u64::from(mv.steps)).sum()
    }

    /// Blocking time of the whole program, ignoring pin write latency.
    pub fn duration_ms(&self) -> u64 {
        self.moves.iter().map(MoveConfig::duration_ms).sum()
    }
}
