//! GPIO module for stepper-hat.
//!
//! Provides the platform chip abstraction, the backend lifecycle wrapper,
//! and the delay provider used for step timing.

mod backend;
mod hal;
#[cfg(feature = "std")]
mod delay;
#[cfg(feature = "std")]
pub mod detect;
#[cfg(feature = "cdev")]
mod cdev;
#[cfg(feature = "std")]
pub mod mock;

pub use backend::{GpioBackend, MAX_LINES};
pub use hal::HalChip;

#[cfg(feature = "std")]
pub use delay::StdDelay;

#[cfg(feature = "cdev")]
pub use cdev::CdevChip;

use crate::error::GpioError;

/// Digital output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0.
    #[default]
    Low,
    /// Logic 1.
    High,
}

impl Level {
    /// Raw line value (0 or 1).
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }

    /// Whether this is [`Level::High`].
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<u8> for Level {
    fn from(bit: u8) -> Self {
        Level::from(bit != 0)
    }
}

/// A bank of GPIO lines provided by the platform.
///
/// Implementations only talk to hardware. Lifecycle and claim bookkeeping
/// live in [`GpioBackend`], which is what the driver uses.
pub trait GpioChip {
    /// Open the underlying chip handle.
    fn open(&mut self) -> Result<(), GpioError>;

    /// Request `line` as an output driven at `initial`.
    fn claim_output(&mut self, line: u8, initial: Level) -> Result<(), GpioError>;

    /// Drive a previously claimed line.
    fn write(&mut self, line: u8, level: Level) -> Result<(), GpioError>;

    /// Release every line and the chip handle.
    fn close(&mut self);
}

impl<T: GpioChip + ?Sized> GpioChip for &mut T {
    fn open(&mut self) -> Result<(), GpioError> {
        T::open(self)
    }

    fn claim_output(&mut self, line: u8, initial: Level) -> Result<(), GpioError> {
        T::claim_output(self, line, initial)
    }

    fn write(&mut self, line: u8, level: Level) -> Result<(), GpioError> {
        T::write(self, line, level)
    }

    fn close(&mut self) {
        T::close(self)
    }
}
