//! Version metadata from `version.json` and `git describe`.
//!
//! The full version string embedded in every build looks like
//! `1.2.3-main-210101-120000-g6ff87c4924`:
//!
//! | part            | source                                   |
//! |-----------------|------------------------------------------|
//! | `1.2.3`         | `version.json` (`major`, `minor`, `patch`) |
//! | `main`          | branch from `git describe --all`         |
//! | `210101-120000` | local build time, `%y%m%d-%H%M%S`        |
//! | `g6ff87c4924`   | abbreviated revision from `git describe` |

use crate::bundler::utils::{process::run_stdout, tool_detection};
use crate::error::{BundlerError, CliError, Result};
use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;

/// File at the project root holding the semantic version.
pub const VERSION_FILE: &str = "version.json";

/// Timestamp layout inside the full version.
const TIMESTAMP_FORMAT: &str = "%y%m%d-%H%M%S";

/// Contents of `version.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct VersionFile {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionFile {
    /// Reads `{root}/version.json`.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(VERSION_FILE);
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            BundlerError::Cli(CliError::ExecutionFailed {
                command: "read_version_json".to_string(),
                reason: format!("Failed to read {}: {}", path.display(), e),
            })
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            BundlerError::Cli(CliError::ExecutionFailed {
                command: "parse_version_json".to_string(),
                reason: format!("Failed to parse {}: {}", path.display(), e),
            })
        })
    }

    /// The version as a [`semver::Version`] without pre-release or build parts.
    pub fn semver(&self) -> semver::Version {
        semver::Version::new(self.major, self.minor, self.patch)
    }
}

/// Normalised output of `git describe --all --long --abbrev=10`.
///
/// `/` becomes `_` and the `remotes_` and `origin_` prefixes are dropped, so
/// `remotes/origin/main-3-g6ff87c4924` reads `main-3-g6ff87c4924`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitDescribe(String);

impl GitDescribe {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw
            .trim()
            .replace('/', "_")
            .replace("remotes_", "")
            .replace("origin_", "");
        Self(normalized)
    }

    /// The normalised describe string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text after the last `-`, e.g. `g6ff87c4924`.
    pub fn revision(&self) -> &str {
        match self.0.rfind('-') {
            Some(index) => &self.0[index + 1..],
            None => &self.0,
        }
    }

    /// Branch label: text before the first `-`, cut at the first `_`.
    ///
    /// A `tags` ref means a detached commit and maps to `heads`.
    pub fn branch(&self) -> &str {
        let reference = match self.0.find('-') {
            Some(index) => &self.0[..index],
            None => &self.0,
        };

        match reference.find('_') {
            Some(index) => {
                let branch = &reference[..index];
                if branch.contains("tags") { "heads" } else { branch }
            }
            None => reference,
        }
    }
}

/// Which version string `--print-version` prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum VersionKind {
    /// `1.2.3-main-210101-120000-g6ff87c4924`
    Fullver,
    /// `1.2.3`
    Semver,
    /// `g6ff87c4924`
    Revision,
}

/// Runs `git -C {root} describe --all --long --abbrev=10`.
pub async fn git_describe(project_root: &Path) -> Result<GitDescribe> {
    let mut cmd = Command::new(tool_detection::git()?);
    cmd.arg("-C")
        .arg(project_root)
        .args(["describe", "--all", "--long", "--abbrev=10"]);
    let raw = run_stdout("git describe", &mut cmd).await?;
    Ok(GitDescribe::parse(&raw))
}

/// `{major}.{minor}.{patch}`
pub fn short_semver(project_root: &Path) -> Result<String> {
    Ok(VersionFile::load(project_root)?.semver().to_string())
}

/// `{semver}-{branch}`
pub async fn long_semver(project_root: &Path) -> Result<String> {
    let semver = short_semver(project_root)?;
    let describe = git_describe(project_root).await?;
    Ok(format!("{}-{}", semver, describe.branch()))
}

/// Abbreviated revision, e.g. `g6ff87c4924`.
pub async fn git_revision(project_root: &Path) -> Result<String> {
    Ok(git_describe(project_root).await?.revision().to_string())
}

/// `{semver}-{branch}-{yymmdd-HHMMSS}-{revision}` stamped with the current
/// local time.
pub async fn full_version(project_root: &Path) -> Result<String> {
    let semver = short_semver(project_root)?;
    let describe = git_describe(project_root).await?;
    Ok(compose_full_version(&semver, &describe, &Local::now()))
}

/// Assembles a full version from its parts.
pub fn compose_full_version<Tz>(semver: &str, describe: &GitDescribe, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}-{}-{}-{}",
        semver,
        describe.branch(),
        at.format(TIMESTAMP_FORMAT),
        describe.revision()
    )
}

/// The version printed for a `--print-version` request.
pub async fn version_for(kind: VersionKind, project_root: &Path) -> Result<String> {
    match kind {
        VersionKind::Fullver => full_version(project_root).await,
        VersionKind::Semver => short_semver(project_root),
        VersionKind::Revision => git_revision(project_root).await,
    }
}

/// Semver and branch only, as used in archive names: `1.2.3-main`.
pub fn archive_version(full_version: &str) -> String {
    full_version
        .split('-')
        .take(2)
        .collect::<Vec<_>>()
        .join("-")
}
