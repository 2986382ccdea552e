//! Motor module for stepper-hat.
//!
//! Provides the HR8825 driver, motor selection, microstep configuration,
//! and cooperative cancellation.

mod axis;
mod builder;
mod cancel;
mod driver;
mod microstep;
mod position;
mod state;

pub use axis::{Direction, Motor, MotorId};
pub use builder::StepperDriverBuilder;
pub use cancel::{Cancel, NeverCancel};
pub use driver::{StepperDriver, MIN_PULSE_WIDTH_US};
pub use microstep::{ControlSource, MicrostepMode};
pub use position::Position;
pub use state::MotorState;

#[cfg(feature = "std")]
pub use cancel::CancelToken;
