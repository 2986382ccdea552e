//! Unit tests for configuration validation.

use stepper_hat::config::{validate_config, BoardConfig, LimitPolicy, StepLimits};
use stepper_hat::error::{ConfigError, Error};
use stepper_hat::parse_config;

/// Test validation of the stock wiring.
#[test]
fn test_valid_config_passes_validation() {
    assert!(validate_config(&BoardConfig::default()).is_ok());
}

/// Test a line shared between the two channels.
#[test]
fn test_shared_line_rejected() {
    let toml_str = r#"
[motors.motor2]
enable = 12
dir = 24
step = 18
mode = [21, 22, 27]
"#;

    assert_eq!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::DuplicatePin(12)))
    );
}

/// Test a line used twice within one channel.
#[test]
fn test_line_reused_within_channel() {
    let mut config = BoardConfig::default();
    config.motors.motor1.mode = [16, 16, 20];

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::DuplicatePin(16)))
    );
}

/// Test validation fails for inverted soft limits.
#[test]
fn test_invalid_soft_limits() {
    let toml_str = r#"
[motors.motor1]
enable = 12
dir = 13
step = 19
mode = [16, 17, 20]

[motors.motor1.limits]
min_steps = 100
max_steps = -100
"#;

    assert_eq!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::InvalidSoftLimits {
            min: 100,
            max: -100
        }))
    );
}

/// Test that equal limits are rejected.
#[test]
fn test_empty_soft_limit_range() {
    let mut config = BoardConfig::default();
    config.motors.motor2.limits = Some(StepLimits::new(5, 5, LimitPolicy::Clamp));

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSoftLimits { min: 5, max: 5 }))
    ));
}
