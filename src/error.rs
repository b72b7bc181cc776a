//! Error types for gantry-motion.
//!
//! Provides unified error handling across configuration, motor output, and command handling.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all gantry-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor output error
    Motor(MotorError),
    /// Command intake or dispatch error
    Command(CommandError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Steps per millimeter must be > 0
    InvalidStepsPerMm {
        /// Axis name
        axis: &'static str,
        /// Offending value
        value: f32,
    },
    /// Maximum speed must be > 0
    InvalidMaxSpeed {
        /// Axis or profile name
        context: &'static str,
        /// Offending value
        value: f32,
    },
    /// Acceleration must be > 0
    InvalidAcceleration {
        /// Axis or profile name
        context: &'static str,
        /// Offending value
        value: f32,
    },
    /// Speed multiplier for MOVE/WARP must be > 0
    InvalidSpeedFactor(f32),
    /// Homing search distance must be > 0
    InvalidSearchDistance(i64),
    /// Rebound distance must be >= 0
    InvalidReboundDistance(i64),
    /// Required builder field missing
    Missing(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor output errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
}

/// Command intake and dispatch errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The command queue has no free slot; the command was discarded
    QueueFull,
    /// The command text matches no known form
    UnknownCommand(heapless::String<32>),
    /// A MOVE/WARP payload could not be decoded
    MalformedArguments(heapless::String<32>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Command(e) => write!(f, "Command error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidStepsPerMm { axis, value } => {
                write!(f, "Invalid steps_per_mm for axis {}: {}. Must be > 0", axis, value)
            }
            ConfigError::InvalidMaxSpeed { context, value } => {
                write!(f, "Invalid max speed for {}: {}. Must be > 0", context, value)
            }
            ConfigError::InvalidAcceleration { context, value } => {
                write!(f, "Invalid acceleration for {}: {}. Must be > 0", context, value)
            }
            ConfigError::InvalidSpeedFactor(v) => write!(f, "Invalid speed factor: {}. Must be > 0", v),
            ConfigError::InvalidSearchDistance(v) => {
                write!(f, "Invalid homing search distance: {}. Must be > 0", v)
            }
            ConfigError::InvalidReboundDistance(v) => {
                write!(f, "Invalid rebound distance: {}. Must be >= 0", v)
            }
            ConfigError::Missing(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::QueueFull => write!(f, "Command queue is full. Command rejected."),
            CommandError::UnknownCommand(cmd) => {
                write!(f, "Unknown command or invalid format: {}", cmd)
            }
            CommandError::MalformedArguments(cmd) => {
                write!(f, "Malformed arguments: {}", cmd)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

/// Copy `text` into a fixed-capacity string, truncating on a char boundary.
pub(crate) fn truncated<const N: usize>(text: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
