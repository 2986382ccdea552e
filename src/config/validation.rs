//! Configuration validation.

use heapless::FnvIndexSet;

use crate::error::{ConfigError, Error, Result};

use super::{BoardConfig, MotorConfig, Motors};

/// Validate a board configuration.
///
/// Checks:
/// - No GPIO line is assigned twice, within or across motors
/// - Soft limits are valid (min < max)
pub fn validate_config(config: &BoardConfig) -> Result<()> {
    validate_motors(&config.motors)
}

/// Validate both motor channels.
pub fn validate_motors(motors: &Motors) -> Result<()> {
    let mut seen: FnvIndexSet<u8, 16> = FnvIndexSet::new();
    for line in motors.lines() {
        if seen.insert(line).map_err(|_| ConfigError::DuplicatePin(line))? {
            continue;
        }
        return Err(Error::Config(ConfigError::DuplicatePin(line)));
    }

    validate_motor(&motors.motor1)?;
    validate_motor(&motors.motor2)?;
    Ok(())
}

fn validate_motor(config: &MotorConfig) -> Result<()> {
    // Soft limits: min must be < max
    if let Some(ref limits) = config.limits {
        if !limits.is_valid() {
            return Err(Error::Config(ConfigError::InvalidSoftLimits {
                min: limits.min_steps,
                max: limits.max_steps,
            }));
        }
    }

    Ok(())
}
