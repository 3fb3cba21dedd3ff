//! # graphdot-error
//!
//! Unified error handling for graphdot.
//!
//! - **ErrorKind**: what went wrong (e.g. `ResolutionFailed`, `PropertiesUnreadable`)
//! - **Operation**: where it went wrong (`resolver::go_list`, `cli::run`)
//! - **Context**: key/value pairs that locate the cause (import path, directory)
//! - **Source**: the wrapped lower-level error, if any
//!
//! ## Usage
//!
//! ```rust
//! use graphdot_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ResolutionFailed, "cannot find module")
//!         .with_operation("resolver::go_list")
//!         .with_context("import_path", "example.com/missing"))
//! }
//! ```
//!
//! Errors are never retried: package resolution is deterministic, so every
//! error propagates to the binary, which reports it once and exits.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using graphdot Error
pub type Result<T> = std::result::Result<T, Error>;
