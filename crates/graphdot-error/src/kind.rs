//! Error kinds for graphdot operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Kinds fall into three groups that decide how the binary reports them:
/// resolution errors (the package graph could not be discovered), input errors
/// (the invocation itself is wrong) and properties/IO errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // Resolution errors
    // =========================================================================
    /// The package resolver failed for an import path
    ResolutionFailed,

    /// The import path does not name any known package
    PackageNotFound,

    /// The resolver produced output that could not be parsed
    ParseFailed,

    // =========================================================================
    // Input errors
    // =========================================================================
    /// Invalid command-line argument
    InvalidArgument,

    /// The target directory does not exist
    DirectoryNotFound,

    // =========================================================================
    // Properties / IO errors
    // =========================================================================
    /// The graph properties file exists but could not be read
    PropertiesUnreadable,

    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// Output serialization failed
    SerializationFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Whether the error stems from package resolution.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            ErrorKind::ResolutionFailed | ErrorKind::PackageNotFound | ErrorKind::ParseFailed
        )
    }

    /// Whether the error is caused by how the tool was invoked.
    pub fn is_input(&self) -> bool {
        matches!(self, ErrorKind::InvalidArgument | ErrorKind::DirectoryNotFound)
    }

    /// Process exit code used by the binary for this kind.
    ///
    /// Input errors use 2 like clap's usage errors, everything else 1.
    pub fn exit_code(&self) -> u8 {
        if self.is_input() { 2 } else { 1 }
    }
}
