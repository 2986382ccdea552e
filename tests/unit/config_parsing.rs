//! Unit tests for TOML configuration parsing.

use stepper_hat::config::{load_config, parse_config, LimitPolicy, MAX_MOVES};
use stepper_hat::error::{ConfigError, Error};
use stepper_hat::{ControlSource, Direction, MicrostepMode, MotorId};

/// Test parsing a single rewired channel.
#[test]
fn test_parse_motor_config() {
    let toml_str = r#"
[motors.motor1]
enable = 5
dir = 6
step = 7
mode = [8, 9, 10]
invert_direction = true
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    let motor = config.motor(MotorId::Motor1);

    assert_eq!(motor.enable, 5);
    assert_eq!(motor.dir, 6);
    assert_eq!(motor.step, 7);
    assert_eq!(motor.mode, [8, 9, 10]);
    assert!(motor.invert_direction);
    assert!(motor.limits.is_none());

    // Untouched channel keeps the stock wiring.
    assert_eq!(config.motor(MotorId::Motor2).step, 18);
}

/// Test parsing soft limits with the default policy.
#[test]
fn test_parse_limits_default_policy() {
    let toml_str = r#"
[motors.motor2]
enable = 4
dir = 24
step = 18
mode = [21, 22, 27]

[motors.motor2.limits]
min_steps = -200
max_steps = 200
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    let limits = config.motor(MotorId::Motor2).limits.expect("limits");

    assert_eq!(limits.min_steps, -200);
    assert_eq!(limits.max_steps, 200);
    assert_eq!(limits.policy, LimitPolicy::Reject);
}

/// Test parsing every microstep mode name.
#[test]
fn test_parse_all_mode_names() {
    for mode in MicrostepMode::ALL {
        let toml_str = format!(
            r#"
[[program]]
motor = "motor1"
control = "software"
microstep = "{}"
direction = "forward"
steps = 1
"#,
            mode.name()
        );

        let config = parse_config(&toml_str).expect("Failed to parse TOML");
        assert_eq!(config.program[0].microstep, mode);
    }
}

/// Test move defaults.
#[test]
fn test_parse_move_defaults() {
    let toml_str = r#"
[[program]]
motor = "motor2"
direction = "backward"
steps = 64
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    let mv = &config.program[0];

    assert_eq!(mv.motor, MotorId::Motor2);
    assert_eq!(mv.control, ControlSource::Software);
    assert_eq!(mv.microstep, MicrostepMode::Full);
    assert_eq!(mv.direction, Direction::Backward);
    assert_eq!(mv.step_delay_ms, 2);
    assert_eq!(mv.duration_ms(), 256);
}

/// Test that an unknown motor name is a parse error.
#[test]
fn test_parse_unknown_motor() {
    let toml_str = r#"
[motors.motor3]
enable = 1
dir = 2
step = 3
mode = [5, 6, 7]
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

/// Test that a program longer than the fixed capacity is rejected.
#[test]
fn test_parse_program_too_long() {
    let mut toml_str = String::new();
    for _ in 0..=MAX_MOVES {
        toml_str.push_str("[[program]]\nmotor = \"motor1\"\ndirection = \"forward\"\nsteps = 1\n");
    }

    assert!(parse_config(&toml_str).is_err());
}

/// Test loading a configuration from disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("stepper-hat-{}.toml", std::process::id()));
    std::fs::write(&path, "chip = 0\nconsumer = \"bench\"\n").expect("write temp config");

    let config = load_config(&path);
    let _ = std::fs::remove_file(&path);

    let config = config.expect("Failed to load config");
    assert_eq!(config.chip, Some(0));
    assert_eq!(config.consumer.as_str(), "bench");
}
