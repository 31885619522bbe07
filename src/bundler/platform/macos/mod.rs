//! Darwin packaging: `lipo` slice merging and XCFramework creation.
//!
//! Both steps shell out through `xcrun`, so they only succeed on a macOS host
//! with Xcode installed.

pub mod lipo;
pub mod xcframework;
