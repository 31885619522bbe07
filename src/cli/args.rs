//! Command line argument parsing and validation.

use crate::bundler::{
    BuildLang, BuildType, Cpu, DEFAULT_BUNDLE_ID_PREFIX, DEFAULT_PROJECT_NAME,
    DEFAULT_VERSION_ARG, LibType, PackageSettings, Sanitizer, SettingsBuilder, TargetOs,
};
use crate::error::CliError;
use crate::metadata::VersionKind;
use clap::Parser;
use std::path::{Path, PathBuf};

/// GN/Ninja build driver for multi-platform native libraries
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gnbuild",
    version,
    about = "GN/Ninja build driver for multi-platform native libraries",
    long_about = "Generates GN build files, compiles every requested CPU with ninja, wraps Darwin \
outputs in an XCFramework and zips products and debug symbols.

Usage:
  gnbuild --ios
  gnbuild --mac --lib-type static --cpu arm64 x64
  gnbuild --target-os mac --debug --only-gen
  gnbuild --print-version fullver

Outputs land in {root}/_out/{os}-{lib}-{lang}/{build_type}/."
)]
pub struct Args {
    /// Target platform
    #[arg(long, value_enum, value_name = "OS")]
    pub target_os: Option<TargetOs>,

    /// Shortcut for --target-os android
    #[arg(long)]
    pub android: bool,

    /// Shortcut for --target-os ios
    #[arg(long)]
    pub ios: bool,

    /// Shortcut for --target-os mac
    #[arg(long)]
    pub mac: bool,

    /// Shortcut for --target-os win
    #[arg(long)]
    pub win: bool,

    /// Build type [default: release]
    #[arg(long, value_enum)]
    pub build_type: Option<BuildType>,

    /// Shortcut for --build-type debug
    #[arg(long)]
    pub debug: bool,

    /// Build a shared framework or a static library
    #[arg(long, value_enum, default_value_t = LibType::Shared)]
    pub lib_type: LibType,

    /// CPUs to build, in order (defaults depend on the target)
    #[arg(long, value_enum, num_args = 1..)]
    pub cpu: Vec<Cpu>,

    /// Language binding to build (defaults depend on the target)
    #[arg(long, value_enum)]
    pub lang: Option<BuildLang>,

    /// Generate GN build files and compile databases without compiling
    #[arg(long)]
    pub only_gen: bool,

    /// Disable bitcode for iOS targets
    #[arg(long)]
    pub ios_no_bitcode: bool,

    /// Sanitizers to enable
    #[arg(long, value_enum, num_args = 1..)]
    pub sanitizer: Vec<Sanitizer>,

    /// Project root holding BUILD.gn, version.json and buildtools/
    #[arg(long, env = "GNBUILD_PROJECT_ROOT", default_value = ".", value_name = "PATH")]
    pub project_root: PathBuf,

    /// Project name, used for library, framework and archive names
    #[arg(long, env = "GNBUILD_PROJECT_NAME", default_value = DEFAULT_PROJECT_NAME)]
    pub project_name: String,

    /// GN argument receiving the version string
    #[arg(long, default_value = DEFAULT_VERSION_ARG, value_name = "ARG")]
    pub version_arg: String,

    /// Bundle identifier prefix for Darwin bundles
    #[arg(long, env = "GNBUILD_BUNDLE_ID_PREFIX", default_value = DEFAULT_BUNDLE_ID_PREFIX)]
    pub bundle_id_prefix: String,

    /// Team name selecting the iOS code signing certificate
    #[arg(long, default_value = "", value_name = "TEAM")]
    pub signing_team: String,

    /// Use this version string instead of deriving it from version.json and git
    #[arg(long, env = "GNBUILD_VERSION", value_name = "VERSION")]
    pub build_version: Option<String>,

    /// Print a version string and exit
    #[arg(long, value_enum, value_name = "KIND")]
    pub print_version: Option<VersionKind>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Target OS from `--target-os` or one of the shortcuts.
    ///
    /// Returns `Ok(None)` if none was given.
    pub fn resolved_target_os(&self) -> Result<Option<TargetOs>, CliError> {
        let mut requested: Vec<(String, TargetOs)> = Vec::new();
        if let Some(os) = self.target_os {
            requested.push((format!("--target-os {os}"), os));
        }
        for (flag, set, os) in [
            ("--android", self.android, TargetOs::Android),
            ("--ios", self.ios, TargetOs::Ios),
            ("--mac", self.mac, TargetOs::Mac),
            ("--win", self.win, TargetOs::Win),
        ] {
            if set {
                requested.push((flag.to_string(), os));
            }
        }

        let Some(&(_, first)) = requested.first() else {
            return Ok(None);
        };
        if requested.iter().any(|(_, os)| *os != first) {
            return Err(CliError::ConflictingArguments {
                arguments: requested.into_iter().map(|(flag, _)| flag).collect(),
            });
        }
        Ok(Some(first))
    }

    /// Build type from `--build-type` or `--debug`.
    pub fn resolved_build_type(&self) -> Result<BuildType, CliError> {
        match (self.debug, self.build_type) {
            (true, Some(BuildType::Release)) => Err(CliError::ConflictingArguments {
                arguments: vec!["--debug".to_string(), "--build-type release".to_string()],
            }),
            (true, _) => Ok(BuildType::Debug),
            (false, build_type) => Ok(build_type.unwrap_or_default()),
        }
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        if self.resolved_target_os()?.is_none() {
            return Err(CliError::MissingArgument {
                argument: "--target-os".to_string(),
            });
        }
        self.resolved_build_type()?;

        if self.project_name.trim().is_empty() {
            return Err(CliError::InvalidArguments {
                reason: "Project name cannot be empty".to_string(),
            });
        }
        if self.version_arg.trim().is_empty() {
            return Err(CliError::InvalidArguments {
                reason: "Version argument name cannot be empty".to_string(),
            });
        }
        if self.build_version.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(CliError::InvalidArguments {
                reason: "Build version cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Project identity from the name, version argument and signing flags.
    pub fn package_settings(&self) -> PackageSettings {
        PackageSettings {
            project_name: self.project_name.clone(),
            version_arg: self.version_arg.clone(),
            bundle_id_prefix: self.bundle_id_prefix.clone(),
            signing_team: self.signing_team.clone(),
        }
    }

    /// Settings builder for a validated argument set, without the version.
    pub fn settings_builder(&self, project_root: &Path) -> Result<SettingsBuilder, CliError> {
        let mut builder = SettingsBuilder::new()
            .package(self.package_settings())
            .project_root(project_root)
            .lib_type(self.lib_type)
            .build_type(self.resolved_build_type()?)
            .cpus(self.cpu.clone())
            .only_gen(self.only_gen)
            .ios_no_bitcode(self.ios_no_bitcode)
            .sanitizers(self.sanitizer.clone());

        if let Some(os) = self.resolved_target_os()? {
            builder = builder.target_os(os);
        }
        if let Some(lang) = self.lang {
            builder = builder.lang(lang);
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("gnbuild").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn shortcut_selects_target() {
        let args = parse(&["--ios"]);
        assert_eq!(args.resolved_target_os().unwrap(), Some(TargetOs::Ios));
        args.validate().unwrap();
    }

    #[test]
    fn agreeing_flags_are_accepted() {
        let args = parse(&["--mac", "--target-os", "mac"]);
        assert_eq!(args.resolved_target_os().unwrap(), Some(TargetOs::Mac));
    }

    #[test]
    fn disagreeing_targets_conflict() {
        let args = parse(&["--ios", "--mac"]);
        assert!(matches!(
            args.validate(),
            Err(CliError::ConflictingArguments { .. })
        ));
    }

    #[test]
    fn missing_target_is_reported() {
        let args = parse(&[]);
        assert!(matches!(
            args.validate(),
            Err(CliError::MissingArgument { ref argument }) if argument == "--target-os"
        ));
    }

    #[test]
    fn debug_shortcut() {
        assert_eq!(parse(&["--mac", "--debug"]).resolved_build_type().unwrap(), BuildType::Debug);
        assert_eq!(parse(&["--mac"]).resolved_build_type().unwrap(), BuildType::Release);
        assert!(parse(&["--mac", "--debug", "--build-type", "release"])
            .resolved_build_type()
            .is_err());
    }

    #[test]
    fn cpu_list_and_sanitizers_parse() {
        let args = parse(&["--mac", "--cpu", "x64", "arm64", "--sanitizer", "asan", "ubsan"]);
        assert_eq!(args.cpu, vec![Cpu::X64, Cpu::Arm64]);
        assert_eq!(args.sanitizer, vec![Sanitizer::Asan, Sanitizer::Ubsan]);
    }

    #[test]
    fn settings_follow_arguments() {
        let args = parse(&[
            "--ios",
            "--lib-type",
            "static",
            "--cpu",
            "arm64",
            "--project-name",
            "MyLib",
        ]);
        let settings = args
            .settings_builder(Path::new("/proj"))
            .unwrap()
            .version("1.0.0-main")
            .build()
            .unwrap();
        assert_eq!(settings.project_name(), "MyLib");
        assert_eq!(settings.lib_type(), LibType::Static);
        assert_eq!(settings.cpus(), &[Cpu::Arm64]);
        assert_eq!(settings.lang(), BuildLang::Objc);
    }
}
