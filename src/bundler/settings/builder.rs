//! Builder for constructing Settings.

use super::{
    BuildLang, BuildType, Cpu, LibType, PackageSettings, Sanitizer, Settings, TargetOs,
};
use crate::bundler::{Error, Result, gn};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// All validation happens here, before any external tool runs. Unset CPUs and
/// language fall back to the platform defaults from
/// [`TargetOs::profile`].
///
/// # Examples
///
/// ```no_run
/// use gnbuild::bundler::{BuildLang, Cpu, LibType, SettingsBuilder, TargetOs};
///
/// # fn example() -> gnbuild::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root(".")
///     .target_os(TargetOs::Ios)
///     .lib_type(LibType::Static)
///     .lang(BuildLang::C)
///     .cpus(vec![Cpu::Arm64, Cpu::X64])
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct SettingsBuilder {
    package: PackageSettings,
    project_root: Option<PathBuf>,
    target_os: Option<TargetOs>,
    lib_type: LibType,
    lang: Option<BuildLang>,
    build_type: BuildType,
    cpus: Vec<Cpu>,
    only_gen: bool,
    ios_no_bitcode: bool,
    sanitizers: Vec<Sanitizer>,
    version: Option<String>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets project metadata.
    ///
    /// Default: [`PackageSettings::default`]
    pub fn package(mut self, package: PackageSettings) -> Self {
        self.package = package;
        self
    }

    /// Sets the project root (directory containing `BUILD.gn` and `buildtools/`).
    ///
    /// # Required
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the target platform.
    ///
    /// # Required
    pub fn target_os(mut self, target_os: TargetOs) -> Self {
        self.target_os = Some(target_os);
        self
    }

    /// Sets library linkage. Default: shared.
    pub fn lib_type(mut self, lib_type: LibType) -> Self {
        self.lib_type = lib_type;
        self
    }

    /// Sets the API language. Default: the platform's default language.
    pub fn lang(mut self, lang: BuildLang) -> Self {
        self.lang = Some(lang);
        self
    }

    /// Sets the build mode. Default: release.
    pub fn build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// Sets the CPUs to build. Empty means the platform defaults.
    pub fn cpus(mut self, cpus: Vec<Cpu>) -> Self {
        self.cpus = cpus;
        self
    }

    /// Only generate GN files and the compile database.
    pub fn only_gen(mut self, only_gen: bool) -> Self {
        self.only_gen = only_gen;
        self
    }

    /// Disable bitcode for iOS targets.
    pub fn ios_no_bitcode(mut self, ios_no_bitcode: bool) -> Self {
        self.ios_no_bitcode = ios_no_bitcode;
        self
    }

    /// Sets the sanitizers to enable.
    pub fn sanitizers(mut self, sanitizers: Vec<Sanitizer>) -> Self {
        self.sanitizers = sanitizers;
        self
    }

    /// Sets the full version string baked into the library.
    ///
    /// Default: `unknown`
    pub fn version<S: Into<String>>(mut self, version: S) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Checks the configuration without consuming the builder.
    ///
    /// # Errors
    ///
    /// - target OS or project root missing
    /// - language not available on the target OS
    /// - CPU not available on the target OS
    /// - no GN argument set exists for the platform/language pair
    pub fn validate(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SettingsBuilder::validate`].
    pub fn build(self) -> Result<Settings> {
        let (project_root, target_os, lang, cpus) = self.resolve()?;

        Ok(Settings::new(
            self.package,
            project_root,
            target_os,
            self.lib_type,
            lang,
            self.build_type,
            cpus,
            self.only_gen,
            !self.ios_no_bitcode,
            self.sanitizers,
            self.version.unwrap_or_else(|| "unknown".to_string()),
        ))
    }

    fn resolve(&self) -> Result<(PathBuf, TargetOs, BuildLang, Vec<Cpu>)> {
        let project_root = self
            .project_root
            .clone()
            .ok_or_else(|| Error::GenericError("project_root is required".into()))?;

        let target_os = self
            .target_os
            .ok_or_else(|| Error::GenericError("Target OS must be specified.".into()))?;
        let profile = target_os.profile();

        let lang = self.lang.unwrap_or(profile.default_lang);
        if !profile.langs.contains(&lang) {
            return Err(Error::UnsupportedTarget(match lang {
                BuildLang::Java => "Java build lang only available for Android.".to_string(),
                BuildLang::Objc => {
                    "Objective-C build lang only available for iOS/macOS.".to_string()
                }
                BuildLang::C => format!("C build lang not available for {target_os}."),
            }));
        }

        let mut cpus = Vec::new();
        let requested = if self.cpus.is_empty() {
            profile.default_cpus
        } else {
            &self.cpus[..]
        };
        for &cpu in requested {
            if !profile.cpus.contains(&cpu) {
                return Err(Error::ArchError(format!(
                    "{cpu} is not a valid cpu for {target_os} (valid: {})",
                    profile
                        .cpus
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
            if !cpus.contains(&cpu) {
                cpus.push(cpu);
            }
        }

        if gn::platform_entry(target_os, lang).is_none() {
            return Err(Error::UnsupportedTarget(format!(
                "no GN build arguments defined for {target_os} ({lang})"
            )));
        }

        Ok((project_root, target_os, lang, cpus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SettingsBuilder {
        SettingsBuilder::new().project_root("/proj")
    }

    #[test]
    fn missing_target_os_is_rejected() {
        let err = base().build().unwrap_err();
        assert_eq!(err.to_string(), "Target OS must be specified.");
    }

    #[test]
    fn platform_defaults_fill_cpus_and_lang() {
        let settings = base().target_os(TargetOs::Mac).build().unwrap();
        assert_eq!(settings.cpus(), &[Cpu::Arm64, Cpu::X64]);
        assert_eq!(settings.lang(), BuildLang::Objc);
        assert_eq!(settings.lib_type(), LibType::Shared);
        assert_eq!(settings.build_type(), BuildType::Release);
        assert_eq!(settings.version_string(), "unknown");
        assert!(settings.ios_bitcode());
    }

    #[test]
    fn java_rejected_outside_android() {
        let err = base()
            .target_os(TargetOs::Ios)
            .lang(BuildLang::Java)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedTarget(_)));
    }

    #[test]
    fn invalid_cpu_for_platform() {
        let err = base()
            .target_os(TargetOs::Mac)
            .cpus(vec![Cpu::X86])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ArchError(_)));
    }

    #[test]
    fn duplicate_cpus_are_collapsed_in_order() {
        let settings = base()
            .target_os(TargetOs::Ios)
            .cpus(vec![Cpu::X64, Cpu::Arm64, Cpu::X64])
            .build()
            .unwrap();
        assert_eq!(settings.cpus(), &[Cpu::X64, Cpu::Arm64]);
    }

    #[test]
    fn android_has_no_gn_arguments() {
        let err = base().target_os(TargetOs::Android).validate().unwrap_err();
        assert!(matches!(err, Error::UnsupportedTarget(_)));
    }

    #[test]
    fn no_bitcode_flag_is_inverted() {
        let settings = base()
            .target_os(TargetOs::Ios)
            .ios_no_bitcode(true)
            .build()
            .unwrap();
        assert!(!settings.ios_bitcode());
    }
}
