//! Error kinds for trailure operations

use std::fmt;

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how to react. The exploration
/// flow treats `Transport` and `Format` alike when showing them to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration (missing credential, unreadable config file)
    ConfigInvalid,

    /// Invalid argument passed to an operation
    InvalidArgument,

    /// The completion endpoint could not be reached or answered non-2xx
    Transport,

    /// The reply could not be parsed as the expected JSON payload
    Format,

    /// Local IO failed
    IoFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::Transport => "Transport",
            ErrorKind::Format => "Format",
            ErrorKind::IoFailed => "IoFailed",
        }
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Transport)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
