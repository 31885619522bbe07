//! Platform-specific packaging steps.

pub mod macos;
