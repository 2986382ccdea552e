//! GPIO chip built from embedded-hal output pins.

use embedded_hal::digital::OutputPin;
use heapless::FnvIndexMap;

use crate::error::GpioError;

use super::backend::MAX_LINES;
use super::{GpioChip, Level};

/// A [`GpioChip`] over a set of embedded-hal `OutputPin`s keyed by line number.
///
/// Useful with any HAL that hands out owned pins (rppal, linux-embedded-hal,
/// or `embedded-hal-mock` in tests).
///
/// # Example
///
/// ```rust,ignore
/// let chip = HalChip::new()
///     .with_pin(19, step_pin)?
///     .with_pin(13, dir_pin)?;
/// ```
pub struct HalChip<P: OutputPin> {
    pins: FnvIndexMap<u8, P, MAX_LINES>,
}

impl<P: OutputPin> Default for HalChip<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin> HalChip<P> {
    /// Create an empty chip.
    pub fn new() -> Self {
        Self {
            pins: FnvIndexMap::new(),
        }
    }

    /// Attach `pin` as `line`.
    ///
    /// # Errors
    ///
    /// Returns `ClaimFailed` if the chip is full.
    pub fn with_pin(mut self, line: u8, pin: P) -> Result<Self, GpioError> {
        self.pins
            .insert(line, pin)
            .map_err(|_| GpioError::ClaimFailed(line))?;
        Ok(self)
    }

    /// Number of attached pins.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Whether no pins are attached.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    fn drive(&mut self, line: u8, level: Level) -> Result<(), P::Error> {
        match self.pins.get_mut(&line) {
            Some(pin) if level.is_high() => pin.set_high(),
            Some(pin) => pin.set_low(),
            None => Ok(()),
        }
    }
}

impl<P: OutputPin> GpioChip for HalChip<P> {
    fn open(&mut self) -> Result<(), GpioError> {
        Ok(())
    }

    fn claim_output(&mut self, line: u8, initial: Level) -> Result<(), GpioError> {
        if !self.pins.contains_key(&line) {
            return Err(GpioError::ClaimFailed(line));
        }
        self.drive(line, initial)
            .map_err(|_| GpioError::ClaimFailed(line))
    }

    fn write(&mut self, line: u8, level: Level) -> Result<(), GpioError> {
        if !self.pins.contains_key(&line) {
            return Err(GpioError::UnclaimedPin(line));
        }
        self.drive(line, level)
            .map_err(|_| GpioError::WriteFailed(line))
    }

    // Pins are owned values; there is no handle to release.
    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_claim_and_write() {
        let expectations = [
            Transaction::set(State::Low),
            Transaction::set(State::High),
        ];
        let pin = PinMock::new(&expectations);
        let mut chip = HalChip::new().with_pin(19, pin.clone()).unwrap();

        chip.claim_output(19, Level::Low).unwrap();
        chip.write(19, Level::High).unwrap();

        let mut pin = pin;
        pin.done();
    }

    #[test]
    fn test_missing_pin() {
        let pin = PinMock::new(&[] as &[Transaction]);
        let mut chip = HalChip::new().with_pin(19, pin.clone()).unwrap();

        assert_eq!(chip.claim_output(5, Level::Low), Err(GpioError::ClaimFailed(5)));
        assert_eq!(chip.write(5, Level::High), Err(GpioError::UnclaimedPin(5)));

        let mut pin = pin;
        pin.done();
    }
}
