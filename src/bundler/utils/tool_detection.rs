//! External tool detection and availability checking.
//!
//! `xcrun` drives `lipo` and `xcodebuild` on Darwin hosts; `git` supplies the
//! branch and revision for version strings. Lookups are cached so repeated
//! stages do not search `PATH` again.

use crate::bundler::error::{Context, Result};
use std::{path::PathBuf, sync::LazyLock};

/// Location of `xcrun`, if it is on `PATH`.
pub static XCRUN: LazyLock<Option<PathBuf>> = LazyLock::new(|| locate("xcrun"));

/// Location of `git`, if it is on `PATH`.
pub static GIT: LazyLock<Option<PathBuf>> = LazyLock::new(|| locate("git"));

fn locate(tool: &str) -> Option<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            None
        }
    }
}

/// Path to `xcrun`, or an error naming the missing tool.
pub fn xcrun() -> Result<PathBuf> {
    require("xcrun", &XCRUN)
}

/// Path to `git`, or an error naming the missing tool.
pub fn git() -> Result<PathBuf> {
    require("git", &GIT)
}

fn require(tool: &str, cached: &LazyLock<Option<PathBuf>>) -> Result<PathBuf> {
    cached
        .as_ref()
        .cloned()
        .with_context(|| format!("{tool} not found in PATH; it is required for this build"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_reported_by_name() {
        static NOWHERE: LazyLock<Option<PathBuf>> = LazyLock::new(|| None);
        let err = require("xcrun", &NOWHERE).unwrap_err();
        assert!(err.to_string().contains("xcrun not found"));
    }

    #[test]
    fn locate_finds_nothing_for_bogus_name() {
        assert!(locate("definitely-not-a-real-tool-gnbuild").is_none());
    }
}
