//! Error types for build, bundle and archive operations.
//!
//! Every external tool invocation surfaces as [`Error::ToolFailed`] carrying the
//! tool name, exit code and whatever output was captured, so callers can report
//! failures without re-running anything.

use std::{fmt::Display, io, path::PathBuf};
use thiserror::Error as DeriveError;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, bundling or archiving.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Free-form error with a descriptive message.
    #[error("{0}")]
    GenericError(String),

    /// Bare I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Filesystem error with the operation and path that failed.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// What was being done when the error occurred
        context: &'static str,
        /// Path involved in the failing operation
        path: PathBuf,
        /// Underlying error
        error: io::Error,
    },

    /// An external command could not be spawned at all.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command name
        command: String,
        /// Spawn error
        error: io::Error,
    },

    /// An external tool ran and exited unsuccessfully.
    #[error("{tool} failed with {}{}", exit_code_label(.code), output_suffix(.output))]
    ToolFailed {
        /// Tool name (e.g. `gn gen`, `xcrun lipo`)
        tool: String,
        /// Exit code, `None` if the process was killed by a signal
        code: Option<i32>,
        /// Captured stderr/stdout, empty when output was streamed
        output: String,
    },

    /// Platform/language/linkage combination has no build configuration.
    #[error("unsupported target: {0}")]
    UnsupportedTarget(String),

    /// Architecture not valid for the requested platform.
    #[error("architecture error: {0}")]
    ArchError(String),

    /// Directory traversal error.
    #[error("directory walk failed: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path was not under the expected root.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// ZIP read/write error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

fn output_suffix(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}

/// Attach filesystem context to I/O results.
pub trait ErrorExt<T> {
    /// Wraps the error in [`Error::Fs`] with the given operation and path.
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Anyhow-style context for results and options.
pub trait Context<T> {
    /// Wraps the error (or `None`) with a static message.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Wraps the error (or `None`) with a lazily built message.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
