//! Build orchestration.
//!
//! - [`orchestrator`] - the [`Builder`] that runs each CPU through the
//!   toolchain and creates the XCFramework
//! - [`checksum`] - SHA-256 of finished artifacts

pub mod checksum;
mod orchestrator;

pub use orchestrator::Builder;
