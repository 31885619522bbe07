//! Main build orchestration.
//!
//! Runs the GN/Ninja toolchain for every requested CPU and, for Darwin
//! targets, wraps the results in an XCFramework.

use crate::bundler::{
    Result, Settings, TargetOs, platform::macos::xcframework, toolchain::Toolchain,
};

/// Drives one build of a validated [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use gnbuild::bundler::{Builder, Cpu, SettingsBuilder, TargetOs};
///
/// # async fn example() -> gnbuild::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root("/path/to/project")
///     .target_os(TargetOs::Mac)
///     .cpus(vec![Cpu::Arm64, Cpu::X64])
///     .version("1.2.3-main-240101-120000-g6ff87c4924")
///     .build()?;
///
/// Builder::new(&settings)?.build().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Builder<'a> {
    settings: &'a Settings,
    toolchain: Toolchain,
}

impl<'a> Builder<'a> {
    /// Creates a builder, locating `gn` and `ninja` under the project root.
    ///
    /// Fails before anything runs if either tool is missing.
    pub fn new(settings: &'a Settings) -> Result<Self> {
        let toolchain = Toolchain::locate(settings.project_root())?;
        Ok(Self {
            settings,
            toolchain,
        })
    }

    /// Returns the settings this builder was created with.
    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Builds every CPU in order, stopping at the first failure.
    pub async fn build(&self) -> Result<()> {
        let settings = self.settings;
        log::info!(
            "[*] Start building {} {} {} ({})",
            settings.target_os(),
            settings.lib_type(),
            settings.build_type(),
            settings.lang()
        );

        for &cpu in settings.cpus() {
            log::info!("[*] Building {} {}", settings.target_os(), cpu);
            self.toolchain.build_cpu(settings, cpu).await?;
        }

        if !settings.only_gen() && needs_xcframework(settings.target_os()) {
            let output = xcframework::create(settings).await?;
            log::info!("[*] Created {}", output.display());
        }

        log::info!(
            "[*] Build {} {} success!",
            settings.target_os(),
            settings.build_type()
        );
        Ok(())
    }
}

fn needs_xcframework(target_os: TargetOs) -> bool {
    matches!(target_os, TargetOs::Ios | TargetOs::Mac)
}
