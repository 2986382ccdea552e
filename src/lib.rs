//! # stepper-hat
//!
//! Driver for a dual HR8825 stepper motor HAT over GPIO, with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Two channels**: Select a motor, configure microstepping, pulse, stop
//! - **Microstep truth table**: Full step down to 1/32 via the M0/M1/M2 lines
//! - **Injected GPIO backend**: Linux character device, embedded-hal pins, or a recording mock
//! - **Cooperative cancellation**: Step sequences poll a token between pulses
//! - **Configuration-driven**: Wiring, soft limits, and step programs from TOML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_hat::{ControlSource, Direction, MotorId, StepperDriver};
//! use stepper_hat::gpio::{CdevChip, StdDelay};
//!
//! let mut driver = StepperDriver::builder()
//!     .chip(CdevChip::new(None, "stepper-hat"))
//!     .delay(StdDelay::new())
//!     .build()?;
//!
//! driver.select_motor(MotorId::Motor1);
//! driver.set_micro_step(ControlSource::Software, "1/8step")?;
//! driver.turn_step(Direction::Forward, 1600, 1)?;
//! driver.stop()?;
//! driver.shutdown()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): TOML loading, `StdDelay`, `CancelToken`, board detection, mocks
//! - `cdev`: Linux GPIO character device chip
//! - `cli`: The `stepper-hat` demo binary
//! - `defmt`: Derives `defmt::Format` on public enums for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod error;
pub mod gpio;
pub mod motor;
pub mod program;

// Re-exports for ergonomic API
pub use config::{validate_config, BoardConfig, MotorConfig, MotorPins, MoveConfig};
pub use error::{Error, ErrorKind, Result};
pub use gpio::{GpioBackend, GpioChip, Level};
pub use motor::{
    Cancel, ControlSource, Direction, MicrostepMode, MotorId, MotorState, StepperDriver,
};
pub use program::{Program, RunReport};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

#[cfg(feature = "std")]
pub use motor::CancelToken;
