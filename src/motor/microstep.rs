//! Microstep resolution and the HR8825 mode-select truth table.

use core::fmt;
use core::str::FromStr;

use serde::Deserialize;

use crate::error::DriverError;
use crate::gpio::Level;

/// Step resolution selected by the M0/M1/M2 lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MicrostepMode {
    /// Full step.
    #[default]
    Full,
    /// Half step.
    Half,
    /// 1/4 step.
    Quarter,
    /// 1/8 step.
    Eighth,
    /// 1/16 step.
    Sixteenth,
    /// 1/32 step.
    ThirtySecond,
}

/// Who sets the mode-select lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum ControlSource {
    /// The DIP switches on the board set the mode; no lines are driven.
    #[serde(alias = "hardward")]
    Hardware,
    /// The driver sets M0/M1/M2. All DIP switches must be off.
    #[default]
    #[serde(alias = "softward")]
    Software,
}

impl MicrostepMode {
    /// Every mode, finest last.
    pub const ALL: [MicrostepMode; 6] = [
        MicrostepMode::Full,
        MicrostepMode::Half,
        MicrostepMode::Quarter,
        MicrostepMode::Eighth,
        MicrostepMode::Sixteenth,
        MicrostepMode::ThirtySecond,
    ];

    /// Mode name as used in configuration.
    pub const fn name(self) -> &'static str {
        match self {
            MicrostepMode::Full => "fullstep",
            MicrostepMode::Half => "halfstep",
            MicrostepMode::Quarter => "1/4step",
            MicrostepMode::Eighth => "1/8step",
            MicrostepMode::Sixteenth => "1/16step",
            MicrostepMode::ThirtySecond => "1/32step",
        }
    }

    /// M0, M1, M2 levels from the HR8825 datasheet.
    pub const fn pattern(self) -> [Level; 3] {
        use Level::{High as H, Low as L};
        match self {
            MicrostepMode::Full => [L, L, L],
            MicrostepMode::Half => [H, L, L],
            MicrostepMode::Quarter => [L, H, L],
            MicrostepMode::Eighth => [H, H, L],
            MicrostepMode::Sixteenth => [L, L, H],
            MicrostepMode::ThirtySecond => [H, L, H],
        }
    }

    /// Microsteps per full step.
    pub const fn divisor(self) -> u16 {
        match self {
            MicrostepMode::Full => 1,
            MicrostepMode::Half => 2,
            MicrostepMode::Quarter => 4,
            MicrostepMode::Eighth => 8,
            MicrostepMode::Sixteenth => 16,
            MicrostepMode::ThirtySecond => 32,
        }
    }

    /// Step pulses for one revolution of a motor with `full_steps` steps.
    ///
    /// 200 for a 1.8 degree NEMA motor, 2048 for a 28BYJ-48.
    pub const fn steps_per_revolution(self, full_steps: u32) -> u32 {
        full_steps * self.divisor() as u32
    }
}

impl FromStr for MicrostepMode {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| {
                let mut name = heapless::String::new();
                for c in s.chars() {
                    if name.push(c).is_err() {
                        break;
                    }
                }
                DriverError::UnknownMode(name)
            })
    }
}

impl fmt::Display for MicrostepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ControlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlSource::Hardware => f.write_str("hardware"),
            ControlSource::Software => f.write_str("software"),
        }
    }
}

impl<'de> Deserialize<'de> for MicrostepMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let name = heapless::String::<32>::deserialize(deserializer)?;
        name.as_str().parse().map_err(|e: DriverError| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Level::{High as H, Low as L};

    #[test]
    fn test_truth_table() {
        let expected = [
            ("fullstep", [L, L, L]),
            ("halfstep", [H, L, L]),
            ("1/4step", [L, H, L]),
            ("1/8step", [H, H, L]),
            ("1/16step", [L, L, H]),
            ("1/32step", [H, L, H]),
        ];
        for (name, pattern) in expected {
            let mode: MicrostepMode = name.parse().unwrap();
            assert_eq!(mode.pattern(), pattern, "{}", name);
            assert_eq!(mode.name(), name);
        }
    }

    #[test]
    fn test_unknown_mode() {
        assert!(matches!(
            "1/64step".parse::<MicrostepMode>(),
            Err(DriverError::UnknownMode(name)) if name.as_str() == "1/64step"
        ));
        assert!("FULLSTEP".parse::<MicrostepMode>().is_err());
    }

    #[test]
    fn test_long_unknown_name_is_truncated() {
        let err = "this-is-not-a-mode-name-at-all".parse::<MicrostepMode>().unwrap_err();
        match err {
            DriverError::UnknownMode(name) => assert_eq!(name.len(), 16),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_steps_per_revolution() {
        assert_eq!(MicrostepMode::Full.steps_per_revolution(200), 200);
        assert_eq!(MicrostepMode::Eighth.steps_per_revolution(2048), 16384);
    }
}
