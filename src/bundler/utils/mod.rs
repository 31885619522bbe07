//! Shared helpers: filesystem staging, subprocess execution and ZIP archives.

pub mod fs;
pub mod process;
pub mod tool_detection;
pub mod zip;
