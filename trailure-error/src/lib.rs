//! # trailure-error
//!
//! Unified error handling for trailure.
//!
//! ## Design
//!
//! - **ErrorKind**: what went wrong (e.g. `Transport`, `Format`)
//! - **ErrorStatus**: whether retrying can help (Permanent, Temporary, Persistent)
//! - **Error Context**: key/value pairs that help locate the cause
//! - **Error Source**: the underlying error, wrapped without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use trailure_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::Transport, "HTTP 500")
//!         .with_operation("gateway::query")
//!         .with_context("status", "500"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fallible functions return `Result<T, trailure_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - `message()` is the user-facing text; `Display` is the log form

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the trailure Error
pub type Result<T> = std::result::Result<T, Error>;
