//! Configuration structures for build operations.
//!
//! This module provides the target model (platform, linkage, language, CPU)
//! and the immutable [`Settings`] record passed through every build stage.

mod arch;
mod builder;
mod core;
mod package;
mod target;

// Re-export all public types
pub use arch::Cpu;
pub use builder::SettingsBuilder;
pub use self::core::{PRODUCTS_TAG, Settings, XCFRAMEWORK_TAG};
pub use package::{
    DEFAULT_BUNDLE_ID_PREFIX, DEFAULT_PROJECT_NAME, DEFAULT_VERSION_ARG, PackageSettings,
};
pub use target::{BuildLang, BuildType, LibType, PlatformProfile, Sanitizer, TargetOs};
