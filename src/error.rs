//! Error types for stepper-hat.
//!
//! Provides unified error handling across GPIO access, motor control, and configuration.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-hat operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// GPIO chip or line error
    Gpio(GpioError),
    /// Motor driver error
    Driver(DriverError),
    /// Configuration parsing or validation error
    Config(ConfigError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Chip detection, open, or line claim failed. Fatal at startup.
    Initialization,
    /// Bad mode name, wiring, or limits.
    Configuration,
    /// Operation attempted before its required setup.
    Precondition,
    /// A GPIO write failed on an initialized chip.
    Hardware,
    /// A step sequence was cancelled cooperatively.
    Cancelled,
}

/// GPIO backend errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// Board model detection could not run
    DetectionFailed,
    /// The GPIO chip could not be opened
    ChipOpenFailed {
        /// Chip index that was tried
        chip: u8,
    },
    /// Requesting a line as output failed
    ClaimFailed(u8),
    /// Backend was initialized twice without a shutdown
    AlreadyInitialized,
    /// Pin operation attempted while the backend is closed
    NotInitialized,
    /// Pin operation on a line that was never claimed
    UnclaimedPin(u8),
    /// The platform rejected a write to a claimed line
    WriteFailed(u8),
}

/// Motor driver errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// Microstep mode name is not one of the six recognized values
    UnknownMode(heapless::String<16>),
    /// Motor operation attempted before `select_motor`
    NoMotorSelected,
    /// Step sequence stopped by a cancellation request
    Cancelled {
        /// Steps completed before the request was seen
        completed: u32,
    },
    /// Target position is outside the motor's soft limits
    LimitExceeded {
        /// Requested position in steps
        position: i64,
        /// Limit that was exceeded (min or max)
        limit: i64,
    },
    /// Distance to the target does not fit in a signed step count
    OutOfRange {
        /// Current position in steps
        position: i64,
        /// Requested position in steps
        target: i64,
    },
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// The same GPIO line is assigned twice
    DuplicatePin(u8),
    /// Invalid soft limits (min must be < max)
    InvalidSoftLimits {
        /// Minimum limit value
        min: i64,
        /// Maximum limit value
        max: i64,
    },
    /// Motor name is not `motor1` or `motor2`
    UnknownMotor(heapless::String<32>),
    /// Program has more moves than the fixed capacity
    ProgramTooLong,
    /// A required builder field was not set
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Gpio(GpioError::NotInitialized | GpioError::UnclaimedPin(_)) => {
                ErrorKind::Precondition
            }
            Error::Gpio(GpioError::WriteFailed(_)) => ErrorKind::Hardware,
            Error::Gpio(_) => ErrorKind::Initialization,
            Error::Driver(DriverError::NoMotorSelected) => ErrorKind::Precondition,
            Error::Driver(DriverError::Cancelled { .. }) => ErrorKind::Cancelled,
            Error::Driver(_) | Error::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Whether this error leaves the board unusable.
    ///
    /// Only initialization failures are fatal. Everything else is returned
    /// to the caller, who may retry with other arguments.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Initialization
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Gpio(e) => write!(f, "GPIO error: {}", e),
            Error::Driver(e) => write!(f, "Driver error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::DetectionFailed => write!(f, "Unable to determine the board model"),
            GpioError::ChipOpenFailed { chip } => write!(f, "gpiochip{} open failed", chip),
            GpioError::ClaimFailed(line) => write!(f, "Failed to claim line {} as output", line),
            GpioError::AlreadyInitialized => write!(f, "GPIO backend already initialized"),
            GpioError::NotInitialized => write!(f, "GPIO backend not initialized"),
            GpioError::UnclaimedPin(line) => write!(f, "Line {} was not claimed", line),
            GpioError::WriteFailed(line) => write!(f, "Write to line {} failed", line),
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::UnknownMode(name) => write!(
                f,
                "Unknown microstep mode '{}'. Valid values: fullstep, halfstep, 1/4step, 1/8step, 1/16step, 1/32step",
                name
            ),
            DriverError::NoMotorSelected => write!(f, "No motor selected"),
            DriverError::Cancelled { completed } => {
                write!(f, "Step sequence cancelled after {} steps", completed)
            }
            DriverError::LimitExceeded { position, limit } => {
                write!(f, "Position {} exceeds limit {}", position, limit)
            }
            DriverError::OutOfRange { position, target } => {
                write!(f, "Target {} is out of range from position {}", target, position)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::DuplicatePin(line) => write!(f, "Line {} is assigned more than once", line),
            ConfigError::InvalidSoftLimits { min, max } => {
                write!(f, "Invalid soft limits: min ({}) must be < max ({})", min, max)
            }
            ConfigError::UnknownMotor(name) => {
                write!(f, "Unknown motor '{}'. Valid values: motor1, motor2", name)
            }
            ConfigError::ProgramTooLong => write!(f, "Too many program moves (max 32)"),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

// Conversion impls
impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Error::Gpio(e)
    }
}

impl From<DriverError> for Error {
    fn from(e: DriverError) -> Self {
        Error::Driver(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for GpioError {}

#[cfg(feature = "std")]
impl std::error::Error for DriverError {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
