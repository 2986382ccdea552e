//! Configuration module for stepper-hat.
//!
//! Provides types for loading and validating board wiring and step programs
//! from TOML files (with `std` feature) or pre-built values.

mod board;
mod limits;
#[cfg(feature = "std")]
mod loader;
mod motor;
mod program;
mod validation;

pub use board::{BoardConfig, Motors};
pub use limits::{LimitPolicy, StepLimits};
pub use motor::{MotorConfig, MotorPins};
pub use program::{demo_moves, MoveConfig, MAX_MOVES};
pub use validation::{validate_config, validate_motors};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
