//! Builder pattern for StepperDriver.

use embedded_hal::delay::DelayNs;

use crate::config::{validate_motors, BoardConfig, MotorConfig, Motors};
use crate::error::{ConfigError, Error, GpioError, Result};
use crate::gpio::{GpioBackend, GpioChip};

use super::axis::{Motor, MotorId};
use super::driver::StepperDriver;

/// Builder for creating StepperDriver instances.
///
/// Defaults to the Waveshare HAT wiring for both channels.
pub struct StepperDriverBuilder<C, D>
where
    C: GpioChip,
    D: DelayNs,
{
    backend: Option<GpioBackend<C>>,
    delay: Option<D>,
    motors: Motors,
}

impl<C, D> Default for StepperDriverBuilder<C, D>
where
    C: GpioChip,
    D: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D> StepperDriverBuilder<C, D>
where
    C: GpioChip,
    D: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            backend: None,
            delay: None,
            motors: Motors::default(),
        }
    }

    /// Set the GPIO chip. It is opened by [`build`](Self::build).
    pub fn chip(mut self, chip: C) -> Self {
        self.backend = Some(GpioBackend::new(chip));
        self
    }

    /// Set an existing backend.
    ///
    /// If it is already open it must have claimed every motor line.
    pub fn backend(mut self, backend: GpioBackend<C>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: D) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set one channel's configuration.
    pub fn motor(mut self, id: MotorId, config: MotorConfig) -> Self {
        *self.motors.get_mut(id) = config;
        self
    }

    /// Configure both channels from a board configuration.
    pub fn from_config(mut self, config: &BoardConfig) -> Self {
        self.motors = config.motors.clone();
        self
    }

    /// Build the driver, initializing the backend if it is still closed.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing, the wiring is
    /// invalid, or the backend fails to initialize.
    pub fn build(self) -> Result<StepperDriver<C, D>> {
        let mut backend = self
            .backend
            .ok_or(Error::Config(ConfigError::MissingField("chip")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;

        validate_motors(&self.motors)?;

        let lines = self.motors.lines();
        if backend.is_open() {
            if let Some(&line) = lines.iter().find(|&&l| !backend.is_claimed(l)) {
                return Err(Error::Gpio(GpioError::UnclaimedPin(line)));
            }
        } else {
            backend.initialize(&lines)?;
        }

        let motors = [
            Motor::new(MotorId::Motor1, &self.motors.motor1),
            Motor::new(MotorId::Motor2, &self.motors.motor2),
        ];

        Ok(StepperDriver::new(backend, delay, motors))
    }
}
