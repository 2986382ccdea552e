//! Program execution.

use embedded_hal::delay::DelayNs;

use crate::config::MoveConfig;
use crate::error::{DriverError, Error, Result};
use crate::gpio::GpioChip;
use crate::motor::{Cancel, StepperDriver};

use super::Program;

/// Outcome of a program run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Moves that ran to completion.
    pub moves_completed: usize,
    /// Step pulses issued across all moves.
    pub steps: u64,
    /// Whether the run ended on a cancellation request.
    pub cancelled: bool,
}

impl Program {
    /// Execute every move in order, then stop both motors and shut the
    /// driver down.
    ///
    /// Each move selects its motor, sets the microstep mode, pulses, and
    /// stops the motor. `cancel` is polled between steps; a cancelled run
    /// still takes the normal shutdown path and reports `cancelled`.
    ///
    /// # Errors
    ///
    /// Returns the first driver or GPIO error. The driver is shut down
    /// before the error is returned.
    pub fn run<C, D, X>(&self, driver: &mut StepperDriver<C, D>, cancel: &X) -> Result<RunReport>
    where
        C: GpioChip,
        D: DelayNs,
        X: Cancel + ?Sized,
    {
        let mut report = RunReport::default();

        for (i, mv) in self.iter().enumerate() {
            tracing::info!(
                "move {}: {} {} {} steps, {} ms",
                i,
                mv.motor,
                mv.direction,
                mv.steps,
                mv.step_delay_ms
            );
            match run_move(driver, mv, cancel) {
                Ok(()) => {
                    report.moves_completed += 1;
                    report.steps += u64::from(mv.steps);
                }
                Err(Error::Driver(DriverError::Cancelled { completed })) => {
                    report.steps += u64::from(completed);
                    report.cancelled = true;
                    break;
                }
                Err(e) => {
                    tracing::error!("move {} failed: {}", i, e);
                    if let Err(stop) = driver.shutdown() {
                        tracing::error!("shutdown after failure: {}", stop);
                    }
                    return Err(e);
                }
            }
        }

        driver.shutdown()?;
        Ok(report)
    }
}

fn run_move<C, D, X>(
    driver: &mut StepperDriver<C, D>,
    mv: &MoveConfig,
    cancel: &X,
) -> Result<()>
where
    C: GpioChip,
    D: DelayNs,
    X: Cancel + ?Sized,
{
    driver.select_motor(mv.motor);
    driver.set_microstep_mode(mv.control, mv.microstep)?;
    driver.turn_step_until(mv.direction, mv.steps, mv.step_delay_ms, cancel)?;
    driver.stop()
}
