//! GN/Ninja build driver for multi-platform native libraries.
//!
//! Generates GN build files per CPU, compiles them with ninja, combines
//! Darwin slices into an XCFramework and packages products and debug symbols
//! into ZIP archives that preserve symbolic links.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
