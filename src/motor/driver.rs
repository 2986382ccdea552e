//! HR8825 dual stepper driver.
//!
//! Generic over a [`GpioChip`] and an embedded-hal 1.0 delay provider.

use embedded_hal::delay::DelayNs;

use crate::error::{DriverError, Error, Result};
use crate::gpio::{GpioBackend, GpioChip, Level};

use super::axis::{Direction, Motor, MotorId};
use super::builder::StepperDriverBuilder;
use super::cancel::{Cancel, NeverCancel};
use super::microstep::{ControlSource, MicrostepMode};
use super::state::MotorState;

/// Minimum STEP high and low time required by the HR8825, in microseconds.
pub const MIN_PULSE_WIDTH_US: u32 = 2;

/// Driver for the two HR8825 channels on one board.
///
/// Generic over:
/// - `C`: GPIO chip (must implement [`GpioChip`])
/// - `D`: Delay provider (must implement `DelayNs`)
///
/// Exactly one motor is active at a time; every motor operation acts on it.
pub struct StepperDriver<C, D>
where
    C: GpioChip,
    D: DelayNs,
{
    /// GPIO backend owning the chip handle.
    backend: GpioBackend<C>,

    /// Delay provider for step timing.
    delay: D,

    /// Channel records, indexed by [`MotorId::index`].
    motors: [Motor; 2],

    /// Currently selected channel.
    active: Option<MotorId>,
}

impl<C, D> StepperDriver<C, D>
where
    C: GpioChip,
    D: DelayNs,
{
    /// Start building a driver.
    pub fn builder() -> StepperDriverBuilder<C, D> {
        StepperDriverBuilder::new()
    }

    pub(crate) fn new(backend: GpioBackend<C>, delay: D, motors: [Motor; 2]) -> Self {
        Self {
            backend,
            delay,
            motors,
            active: None,
        }
    }

    /// Make `id` the active motor. Does not touch any pin.
    pub fn select_motor(&mut self, id: MotorId) {
        tracing::debug!("selected {}", id);
        self.active = Some(id);
    }

    /// The active motor, if any.
    #[inline]
    pub fn active(&self) -> Option<MotorId> {
        self.active
    }

    /// Runtime record of a motor.
    #[inline]
    pub fn motor(&self, id: MotorId) -> &Motor {
        &self.motors[id.index()]
    }

    /// The GPIO backend.
    #[inline]
    pub fn backend(&self) -> &GpioBackend<C> {
        &self.backend
    }

    /// Take the driver apart.
    pub fn into_parts(self) -> (GpioBackend<C>, D) {
        (self.backend, self.delay)
    }

    fn active_index(&self) -> Result<usize> {
        self.active
            .map(MotorId::index)
            .ok_or(Error::Driver(DriverError::NoMotorSelected))
    }

    /// Configure the active motor's microstep mode by name.
    ///
    /// Names: `fullstep`, `halfstep`, `1/4step`, `1/8step`, `1/16step`,
    /// `1/32step`. An unknown name is rejected before any pin is written.
    pub fn set_micro_step(&mut self, control: ControlSource, mode: &str) -> Result<()> {
        self.active_index()?;
        let mode: MicrostepMode = mode.parse()?;
        self.set_microstep_mode(control, mode)
    }

    /// Configure the active motor's microstep mode.
    ///
    /// With [`ControlSource::Hardware`] the DIP switches decide and only the
    /// stored mode changes. With [`ControlSource::Software`] the M0/M1/M2
    /// lines are driven from the truth table.
    ///
    /// The stored mode only changes once every line is written. If a write
    /// fails, the lines before it already carry the new pattern.
    pub fn set_microstep_mode(&mut self, control: ControlSource, mode: MicrostepMode) -> Result<()> {
        let idx = self.active_index()?;
        tracing::info!("{} control mode: {}, {}", self.motors[idx].id(), control, mode);

        if control == ControlSource::Software {
            let lines = self.motors[idx].pins().mode;
            for (line, level) in lines.into_iter().zip(mode.pattern()) {
                self.backend.write_pin(line, level)?;
            }
        }

        self.motors[idx].mode = mode;
        Ok(())
    }

    /// Pulse the active motor `steps` times.
    ///
    /// Each step holds STEP high then low for `step_delay_ms` each, so the
    /// wave period is `2 * step_delay_ms`. Blocks until done.
    pub fn turn_step(&mut self, direction: Direction, steps: u32, step_delay_ms: u32) -> Result<()> {
        self.turn_step_until(direction, steps, step_delay_ms, &NeverCancel)
    }

    /// Like [`turn_step`](Self::turn_step), polling `cancel` before every step.
    ///
    /// On cancellation the motor is stopped and `DriverError::Cancelled` is
    /// returned with the number of completed steps.
    pub fn turn_step_until<X>(
        &mut self,
        direction: Direction,
        steps: u32,
        step_delay_ms: u32,
        cancel: &X,
    ) -> Result<()>
    where
        X: Cancel + ?Sized,
    {
        let idx = self.active_index()?;
        let pins = *self.motors[idx].pins();
        let dir_level = self.motors[idx].dir_level(direction);

        self.backend.write_pin(pins.enable, Level::High)?;
        self.motors[idx].enabled = true;
        self.backend.write_pin(pins.dir, dir_level)?;
        self.motors[idx].direction = direction;

        if steps == 0 {
            return Ok(());
        }

        tracing::debug!("{} turn {} steps {}", self.motors[idx].id(), steps, direction);
        self.motors[idx].state = MotorState::Running;
        let result = self.pulse(idx, direction, steps, step_delay_ms, cancel);
        self.motors[idx].state = MotorState::Idle;

        if let Err(Error::Driver(DriverError::Cancelled { completed })) = result {
            tracing::warn!("{} cancelled after {} steps", self.motors[idx].id(), completed);
            self.stop_index(idx)?;
        }
        result
    }

    fn pulse<X>(
        &mut self,
        idx: usize,
        direction: Direction,
        steps: u32,
        step_delay_ms: u32,
        cancel: &X,
    ) -> Result<()>
    where
        X: Cancel + ?Sized,
    {
        let step = self.motors[idx].pins().step;
        for completed in 0..steps {
            if cancel.is_cancelled() {
                return Err(Error::Driver(DriverError::Cancelled { completed }));
            }
            self.backend.write_pin(step, Level::High)?;
            self.half_period(step_delay_ms);
            self.backend.write_pin(step, Level::Low)?;
            self.half_period(step_delay_ms);
            self.motors[idx].position.advance(direction);
        }
        Ok(())
    }

    fn half_period(&mut self, step_delay_ms: u32) {
        if step_delay_ms == 0 {
            self.delay.delay_us(MIN_PULSE_WIDTH_US);
        } else {
            self.delay.delay_ms(step_delay_ms);
        }
    }

    /// Drive the active motor's STEP and enable lines low.
    pub fn stop(&mut self) -> Result<()> {
        let idx = self.active_index()?;
        self.stop_index(idx)
    }

    /// Stop both motors. Both are attempted; the first error is returned.
    pub fn stop_all(&mut self) -> Result<()> {
        let first = self.stop_index(0);
        let second = self.stop_index(1);
        first.and(second)
    }

    fn stop_index(&mut self, idx: usize) -> Result<()> {
        let pins = *self.motors[idx].pins();
        self.motors[idx].state = MotorState::Idle;
        self.backend.write_pin(pins.step, Level::Low)?;
        self.backend.write_pin(pins.enable, Level::Low)?;
        self.motors[idx].enabled = false;
        tracing::debug!("{} stopped", self.motors[idx].id());
        Ok(())
    }

    /// Move the active motor to an absolute position in steps.
    ///
    /// Soft limits apply: `Clamp` shortens the move, `Reject` fails with
    /// `DriverError::LimitExceeded` before any pin is written. A target too
    /// far to express as a step count fails with `DriverError::OutOfRange`.
    /// Returns the position reached.
    pub fn move_to(&mut self, target: i64, step_delay_ms: u32) -> Result<i64> {
        let idx = self.active_index()?;
        let motor = &self.motors[idx];
        let target = match motor.limits() {
            Some(limits) => limits.apply(target).ok_or(DriverError::LimitExceeded {
                position: target,
                limit: limits.nearest(target),
            })?,
            None => target,
        };

        let delta = motor
            .position
            .steps_to(target)
            .ok_or(DriverError::OutOfRange {
                position: motor.position(),
                target,
            })?;
        let direction = Direction::from_steps(delta);
        let mut remaining = delta.unsigned_abs();
        while remaining > 0 {
            let chunk = u32::try_from(remaining).unwrap_or(u32::MAX);
            self.turn_step(direction, chunk, step_delay_ms)?;
            remaining -= u64::from(chunk);
        }

        Ok(self.motors[idx].position())
    }

    /// Move the active motor by a signed number of steps.
    pub fn move_by(&mut self, delta: i64, step_delay_ms: u32) -> Result<i64> {
        let idx = self.active_index()?;
        let target = self.motors[idx].position().saturating_add(delta);
        self.move_to(target, step_delay_ms)
    }

    /// Return the active motor to position zero.
    pub fn home(&mut self, step_delay_ms: u32) -> Result<()> {
        self.move_to(0, step_delay_ms).map(|_| ())
    }

    /// Declare the active motor's current position to be zero.
    pub fn set_origin(&mut self) -> Result<()> {
        let idx = self.active_index()?;
        self.motors[idx].position.set_origin();
        Ok(())
    }

    /// Stop both motors and close the GPIO backend.
    ///
    /// The backend is closed even if stopping fails. Calling this on a closed
    /// backend does nothing.
    pub fn shutdown(&mut self) -> Result<()> {
        if !self.backend.is_open() {
            return Ok(());
        }
        let stopped = self.stop_all();
        self.backend.shutdown();
        tracing::info!("driver shut down");
        stopped
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::error::GpioError;
    use crate::gpio::mock::{RecordingChip, RecordingDelay, Trace};

    fn driver(trace: &Trace) -> StepperDriver<RecordingChip, RecordingDelay> {
        StepperDriver::builder()
            .chip(RecordingChip::new(trace.clone()))
            .delay(RecordingDelay::new(trace.clone()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_requires_selection() {
        let trace = Trace::default();
        let mut driver = driver(&trace);
        trace.clear();

        let no_motor = Err(Error::Driver(DriverError::NoMotorSelected));
        assert_eq!(driver.turn_step(Direction::Forward, 1, 1), no_motor);
        assert_eq!(driver.stop(), no_motor);
        assert_eq!(driver.set_micro_step(ControlSource::Software, "fullstep"), no_motor);
        assert_eq!(
            driver.move_to(5, 1),
            Err(Error::Driver(DriverError::NoMotorSelected))
        );
        assert!(trace.events().is_empty());
    }

    #[test]
    fn test_software_mode_writes_truth_table() {
        let trace = Trace::default();
        let mut driver = driver(&trace);
        driver.select_motor(MotorId::Motor1);
        driver.set_micro_step(ControlSource::Software, "1/32step").unwrap();

        assert_eq!(trace.level(16), Some(Level::High));
        assert_eq!(trace.level(17), Some(Level::Low));
        assert_eq!(trace.level(20), Some(Level::High));
        assert_eq!(driver.motor(MotorId::Motor1).mode(), MicrostepMode::ThirtySecond);
    }

    #[test]
    fn test_every_mode_through_driver() {
        use Level::{High as H, Low as L};
        let expected = [
            ("fullstep", [L, L, L]),
            ("halfstep", [H, L, L]),
            ("1/4step", [L, H, L]),
            ("1/8step", [H, H, L]),
            ("1/16step", [L, L, H]),
            ("1/32step", [H, L, H]),
        ];

        let trace = Trace::default();
        let mut driver = driver(&trace);
        driver.select_motor(MotorId::Motor1);

        for (mode, (name, levels)) in MicrostepMode::ALL.into_iter().zip(expected) {
            driver.set_micro_step(ControlSource::Software, name).unwrap();
            assert_eq!(
                [trace.level(16), trace.level(17), trace.level(20)],
                levels.map(Some),
                "{}",
                name
            );
            assert_eq!(driver.motor(MotorId::Motor1).mode(), mode);
        }
    }

    #[test]
    fn test_failed_mode_write_keeps_stored_mode() {
        let trace = Trace::default();
        let mut driver = StepperDriver::builder()
            .chip(RecordingChip::new(trace.clone()).fail_write(17))
            .delay(RecordingDelay::new(trace.clone()))
            .build()
            .unwrap();
        driver.select_motor(MotorId::Motor1);

        assert_eq!(
            driver.set_micro_step(ControlSource::Software, "halfstep"),
            Err(Error::Gpio(GpioError::WriteFailed(17)))
        );
        assert_eq!(trace.writes(16), [Level::High]);
        assert!(trace.writes(20).is_empty());
        assert_eq!(driver.motor(MotorId::Motor1).mode(), MicrostepMode::Full);
    }

    #[test]
    fn test_hardware_mode_writes_nothing() {
        let trace = Trace::default();
        let mut driver = driver(&trace);
        trace.clear();
        driver.select_motor(MotorId::Motor2);
        driver.set_micro_step(ControlSource::Hardware, "halfstep").unwrap();

        assert!(trace.events().is_empty());
        assert_eq!(driver.motor(MotorId::Motor2).mode(), MicrostepMode::Half);
    }

    #[test]
    fn test_turn_step_counts_edges() {
        let trace = Trace::default();
        let mut driver = driver(&trace);
        driver.select_motor(MotorId::Motor1);
        driver.turn_step(Direction::Forward, 10, 1).unwrap();

        assert_eq!(trace.edges(19), 20);
        assert_eq!(trace.level(12), Some(Level::High));
        assert_eq!(trace.level(13), Some(Level::Low));
        assert_eq!(driver.motor(MotorId::Motor1).position(), 10);
        assert_eq!(driver.motor(MotorId::Motor1).state(), MotorState::Idle);
    }

    #[test]
    fn test_zero_delay_respects_pulse_floor() {
        let trace = Trace::default();
        let mut driver = driver(&trace);
        driver.select_motor(MotorId::Motor1);
        driver.turn_step(Direction::Backward, 3, 0).unwrap();

        let gaps = trace.gaps_ns(19);
        assert_eq!(gaps.len(), 5);
        assert!(gaps.iter().all(|&ns| ns >= u64::from(MIN_PULSE_WIDTH_US) * 1_000));
    }

    #[test]
    fn test_write_failure_is_surfaced() {
        let trace = Trace::default();
        let mut driver = StepperDriver::builder()
            .chip(RecordingChip::new(trace.clone()).fail_write(19))
            .delay(RecordingDelay::new(trace.clone()))
            .build()
            .unwrap();
        driver.select_motor(MotorId::Motor1);

        assert_eq!(
            driver.turn_step(Direction::Forward, 5, 1),
            Err(Error::Gpio(GpioError::WriteFailed(19)))
        );
        assert_eq!(driver.motor(MotorId::Motor1).state(), MotorState::Idle);
        assert_eq!(driver.motor(MotorId::Motor1).position(), 0);
    }

    #[test]
    fn test_move_to_without_limits() {
        let trace = Trace::default();
        let mut driver = driver(&trace);
        driver.select_motor(MotorId::Motor2);

        assert_eq!(driver.move_to(7, 1), Ok(7));
        assert_eq!(driver.move_by(-10, 1), Ok(-3));
        driver.home(1).unwrap();
        assert_eq!(driver.motor(MotorId::Motor2).position(), 0);
        // 7 + 10 + 3 steps
        assert_eq!(trace.edges(18), 40);
    }

    #[test]
    fn test_move_to_distance_overflow() {
        let trace = Trace::default();
        let mut driver = driver(&trace);
        driver.select_motor(MotorId::Motor1);
        assert_eq!(driver.move_by(-1, 0), Ok(-1));
        trace.clear();

        assert_eq!(
            driver.move_to(i64::MAX, 0),
            Err(Error::Driver(DriverError::OutOfRange {
                position: -1,
                target: i64::MAX
            }))
        );
        assert!(trace.events().is_empty());
        assert_eq!(driver.motor(MotorId::Motor1).position(), -1);
    }

    #[test]
    fn test_shutdown_twice() {
        let trace = Trace::default();
        let mut driver = driver(&trace);
        driver.shutdown().unwrap();
        driver.shutdown().unwrap();
        assert!(!driver.backend().is_open());
        assert_eq!(driver.backend().chip().close_count(), 1);
    }
}
