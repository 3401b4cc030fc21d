//! Error types.

use std::path::PathBuf;

/// Errors raised while validating manual override input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverrideError {
    /// The time override was not a valid `HH:MM` string.
    #[error("Invalid time format '{0}'. Please use HH:MM.")]
    InvalidTimeFormat(String),

    /// The elapsed override was not an integer.
    #[error("Invalid elapsed time '{0}'. Please enter an integer.")]
    InvalidElapsed(String),

    /// The elapsed override was an integer outside `0..=60`.
    #[error("Elapsed time should be between 0 and 60 minutes (got {0}).")]
    ElapsedOutOfRange(i64),
}

/// Errors raised by a sun-time provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SunTimeError {
    /// The sun stays below the horizon all day (polar night).
    #[error("The sun never rises at this location on {0}")]
    SunNeverRises(chrono::NaiveDate),

    /// The sun stays above the horizon all day (polar day).
    #[error("The sun never sets at this location on {0}")]
    SunNeverSets(chrono::NaiveDate),

    /// The computed event could not be expressed as a local time.
    #[error("Could not express sun event as a local time: {0}")]
    InvalidTime(String),
}

/// Errors raised when a command line cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("command '{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
}

/// Errors raised while parsing command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),

    #[error("invalid value '{value}' for {flag}")]
    InvalidValue { flag: &'static str, value: String },

    #[error("unknown option '{0}'")]
    UnknownFlag(String),
}

/// Errors raised while setting up or running the window.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Framebuffer error: {0}")]
    Pixels(#[from] pixels::Error),

    #[error("Failed to read font '{path}': {source}")]
    FontRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("File '{0}' is not a usable TrueType/OpenType font")]
    FontParse(PathBuf),
}
