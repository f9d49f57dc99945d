//! The main Error type for trailure

use crate::{ErrorKind, ErrorStatus};
use std::fmt;

/// The unified error type for all trailure operations.
///
/// - `kind`: what type of error occurred
/// - `message`: human-readable description, suitable for showing a user
/// - `status`: whether the error is retryable
/// - `operation`: what operation produced the error
/// - `context`: key/value pairs for debugging
/// - `source`: the underlying error (if any)
///
/// # Example
///
/// ```rust
/// use trailure_error::{Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::Transport, "HTTP 503")
///     .with_operation("anthropic::complete")
///     .with_context("status", "503");
///
/// assert_eq!(err.kind(), ErrorKind::Transport);
/// assert_eq!(err.message(), "HTTP 503");
/// assert!(err.is_retryable());
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let status = if kind.is_retryable() {
            ErrorStatus::Temporary
        } else {
            ErrorStatus::Permanent
        };

        Self {
            kind,
            message: message.into(),
            status,
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Set the operation that produced this error.
    ///
    /// A previously set operation is moved to context as "called" so the
    /// call chain survives.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if a source was already set.
    pub fn set_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(source.into());
        self
    }

    /// Mark as persistent after failed retries
    pub fn persist(mut self) -> Self {
        self.status = self.status.persist();
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.status.is_retryable()
    }
}

// =============================================================================
// Display - compact, single-line format for logs
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

// =============================================================================
// Debug - verbose, multi-line format
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::IoFailed, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl Error {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// A non-2xx answer from the completion endpoint. The message is
    /// `HTTP <status>`.
    pub fn http_status(status: u16) -> Self {
        Self::new(ErrorKind::Transport, format!("HTTP {}", status))
            .with_context("status", status.to_string())
    }

    /// The endpoint could not be reached at all
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// The reply was not the expected JSON
    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::Format, "expected value at line 1 column 1");
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.message(), "expected value at line 1 column 1");
        assert_eq!(err.status(), ErrorStatus::Permanent);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::http_status(500)
            .with_operation("anthropic::complete")
            .with_context("model", "claude-sonnet-4-20250514");

        assert_eq!(err.operation(), "anthropic::complete");
        assert_eq!(err.context().len(), 2);
        assert_eq!(err.context()[0], ("status", "500".to_string()));
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::format("bad json")
            .with_operation("fence::parse_reply")
            .with_operation("gateway::query");

        assert_eq!(err.operation(), "gateway::query");
        assert_eq!(err.context()[0], ("called", "fence::parse_reply".to_string()));
    }

    #[test]
    fn test_http_status_message_is_user_facing() {
        let err = Error::http_status(500);
        assert_eq!(err.message(), "HTTP 500");
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_persist() {
        let err = Error::transport("connection refused");
        assert!(err.is_retryable());

        let err = err.persist();
        assert!(!err.is_retryable());
        assert_eq!(err.status(), ErrorStatus::Persistent);
    }

    #[test]
    fn test_display() {
        let err = Error::http_status(429).with_operation("relay::complete");

        let display = format!("{}", err);
        assert!(display.contains("Transport"));
        assert!(display.contains("temporary"));
        assert!(display.contains("relay::complete"));
        assert!(display.contains("status: 429"));
        assert!(display.ends_with("=> HTTP 429"));
    }

    #[test]
    fn test_set_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = Error::format(json_err.to_string()).set_source(json_err);

        assert!(err.source_ref().is_some());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::IoFailed);
        assert_eq!(err.operation(), "io");
    }
}
