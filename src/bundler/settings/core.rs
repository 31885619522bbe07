//! Core Settings struct and implementations.

use super::{BuildLang, BuildType, Cpu, LibType, PackageSettings, Sanitizer, TargetOs};
use std::path::{Path, PathBuf};

/// Output directory tag holding the combined XCFramework.
pub const XCFRAMEWORK_TAG: &str = "xcframework";

/// Output directory tag holding the zipped deliverables.
pub const PRODUCTS_TAG: &str = "__products";

/// Immutable configuration for one build invocation.
///
/// Constructed once through [`SettingsBuilder`](super::SettingsBuilder),
/// validated at construction, and passed by reference to every stage.
///
/// # Examples
///
/// ```no_run
/// use gnbuild::bundler::{SettingsBuilder, TargetOs};
///
/// # fn example() -> gnbuild::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root("/src/gn-build-example")
///     .target_os(TargetOs::Mac)
///     .version("1.2.3-main-240101-120000-g6ff87c4924")
///     .build()?;
///
/// // /src/gn-build-example/_out/mac-shared-objc/release/x64
/// println!("{}", settings.cpu_out_dir(gnbuild::bundler::Cpu::X64).display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Project identity.
    package: PackageSettings,

    /// Absolute project root; `gn` runs from here.
    project_root: PathBuf,

    target_os: TargetOs,
    lib_type: LibType,
    lang: BuildLang,
    build_type: BuildType,

    /// CPUs in build order.
    cpus: Vec<Cpu>,

    /// Generate build files and compile database only, no compilation.
    only_gen: bool,

    /// Emit bitcode for iOS targets.
    ios_bitcode: bool,

    sanitizers: Vec<Sanitizer>,

    /// Full version string, e.g. `1.2.3-main-240101-120000-g6ff87c4924`.
    version: String,
}

impl Settings {
    /// Returns the project metadata.
    pub fn package(&self) -> &PackageSettings {
        &self.package
    }

    /// Returns the project name.
    pub fn project_name(&self) -> &str {
        &self.package.project_name
    }

    /// Returns the project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the target platform.
    pub fn target_os(&self) -> TargetOs {
        self.target_os
    }

    /// Returns the library linkage.
    pub fn lib_type(&self) -> LibType {
        self.lib_type
    }

    /// Returns the API language.
    pub fn lang(&self) -> BuildLang {
        self.lang
    }

    /// Returns the build mode.
    pub fn build_type(&self) -> BuildType {
        self.build_type
    }

    /// Returns the CPUs to build, in order.
    pub fn cpus(&self) -> &[Cpu] {
        &self.cpus
    }

    /// Returns `true` if `cpu` is part of this build.
    pub fn has_cpu(&self, cpu: Cpu) -> bool {
        self.cpus.contains(&cpu)
    }

    /// Returns `true` when only build files should be generated.
    pub fn only_gen(&self) -> bool {
        self.only_gen
    }

    /// Returns `true` when iOS bitcode is enabled.
    pub fn ios_bitcode(&self) -> bool {
        self.ios_bitcode
    }

    /// Returns the enabled sanitizers.
    pub fn sanitizers(&self) -> &[Sanitizer] {
        &self.sanitizers
    }

    /// Returns the full version string.
    pub fn version_string(&self) -> &str {
        &self.version
    }

    /// Output directory for a CPU or special tag.
    ///
    /// Layout: `{root}/_out/{os}-{lib}-{lang}/{build_type}/{tag}`
    pub fn out_dir(&self, tag: &str) -> PathBuf {
        self.project_root
            .join("_out")
            .join(format!("{}-{}-{}", self.target_os, self.lib_type, self.lang))
            .join(self.build_type.as_str())
            .join(tag)
    }

    /// Output directory for one CPU.
    pub fn cpu_out_dir(&self, cpu: Cpu) -> PathBuf {
        self.out_dir(cpu.as_str())
    }

    /// Path of the built library binary inside a CPU's output directory.
    ///
    /// `lib{project}.a` for static builds, `{project}.framework/{project}`
    /// for shared builds.
    pub fn library_binary(&self, cpu: Cpu) -> PathBuf {
        let out = self.cpu_out_dir(cpu);
        match self.lib_type {
            LibType::Static => out.join(self.package.static_library_name()),
            LibType::Shared => out
                .join(self.package.framework_name())
                .join(&self.package.project_name),
        }
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        package: PackageSettings,
        project_root: PathBuf,
        target_os: TargetOs,
        lib_type: LibType,
        lang: BuildLang,
        build_type: BuildType,
        cpus: Vec<Cpu>,
        only_gen: bool,
        ios_bitcode: bool,
        sanitizers: Vec<Sanitizer>,
        version: String,
    ) -> Self {
        Self {
            package,
            project_root,
            target_os,
            lib_type,
            lang,
            build_type,
            cpus,
            only_gen,
            ios_bitcode,
            sanitizers,
            version,
        }
    }
}
