//! `gn` and `ninja` invocation for a single CPU.
//!
//! Both tools are vendored per host under `{root}/buildtools/{host}/`.

use crate::{
    bail,
    bundler::{
        Cpu, Settings,
        error::{Error, ErrorExt, Result},
        gn,
        utils::process::{run_captured, run_streaming},
    },
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Name of the host platform directory under `buildtools/`.
pub fn host_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "darwin"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else {
        "linux"
    }
}

/// Executable suffix on the host.
pub fn exe_suffix() -> &'static str {
    if cfg!(target_os = "windows") { ".exe" } else { "" }
}

/// Paths of the vendored `gn` and `ninja` binaries.
#[derive(Debug, Clone)]
pub struct Toolchain {
    gn: PathBuf,
    ninja: PathBuf,
}

impl Toolchain {
    /// Locates `gn` and `ninja` in `{root}/buildtools/{host}/`.
    ///
    /// # Errors
    ///
    /// Fails if either binary is missing, before anything is executed.
    pub fn locate(project_root: &Path) -> Result<Self> {
        let dir = project_root.join("buildtools").join(host_platform());
        let gn = dir.join(format!("gn{}", exe_suffix()));
        let ninja = dir.join(format!("ninja{}", exe_suffix()));

        for tool in [&gn, &ninja] {
            if !tool.is_file() {
                bail!("build tool not found: {}", tool.display());
            }
        }

        log::debug!("Using gn at {} and ninja at {}", gn.display(), ninja.display());
        Ok(Self { gn, ninja })
    }

    /// Path to `gn`.
    pub fn gn(&self) -> &Path {
        &self.gn
    }

    /// Path to `ninja`.
    pub fn ninja(&self) -> &Path {
        &self.ninja
    }

    /// Runs `gn gen`, writes the compile database and, unless only-gen is
    /// set, compiles with `ninja`.
    pub async fn build_cpu(&self, settings: &Settings, cpu: Cpu) -> Result<()> {
        let out_dir = settings.cpu_out_dir(cpu);

        self.generate(settings, cpu, &out_dir).await?;
        self.write_compile_commands(settings, &out_dir).await?;

        if !settings.only_gen() {
            self.compile(settings, &out_dir).await?;
        }

        Ok(())
    }

    /// `gn gen --check -v [ide flags] {out_dir} --args=...`
    pub async fn generate(&self, settings: &Settings, cpu: Cpu, out_dir: &Path) -> Result<()> {
        let args = gn::gn_args(settings, cpu).ok_or_else(|| {
            Error::UnsupportedTarget(format!(
                "no GN build arguments defined for {} ({})",
                settings.target_os(),
                settings.lang()
            ))
        })?;

        let mut cmd = Command::new(&self.gn);
        cmd.current_dir(settings.project_root())
            .args(["gen", "--check", "-v"])
            .args(ide_flags(settings.project_name()))
            .arg(out_dir)
            .arg(args.to_gen_flag());

        log::info!("[*] Generating GN files in: {}", out_dir.display());
        run_streaming("gn gen", &mut cmd).await
    }

    /// `ninja -C {out_dir} -t compdb ...` into `{out_dir}/compile_commands.json`.
    ///
    /// Only generates the database; nothing is compiled.
    pub async fn write_compile_commands(&self, settings: &Settings, out_dir: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.ninja);
        cmd.current_dir(settings.project_root())
            .arg("-C")
            .arg(out_dir)
            .args(["-t", "compdb", "cc", "cxx", "objc", "objcxx", "asm"]);

        log::info!("[*] Run ninja -t compdb in: {}", out_dir.display());
        let output = run_captured("ninja -t compdb", &mut cmd).await?;

        let db = out_dir.join("compile_commands.json");
        tokio::fs::write(&db, &output.stdout)
            .await
            .fs_context("writing compile database", &db)
    }

    /// `ninja -v -C {out_dir}`
    pub async fn compile(&self, settings: &Settings, out_dir: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.ninja);
        cmd.current_dir(settings.project_root())
            .arg("-v")
            .arg("-C")
            .arg(out_dir);

        log::info!("[*] Run ninja build in: {}", out_dir.display());
        run_streaming("ninja", &mut cmd).await
    }
}

/// IDE project flags for the host: Xcode on macOS, Visual Studio on Windows.
fn ide_flags(project_name: &str) -> Vec<String> {
    match host_platform() {
        "darwin" => vec![
            "--ide=xcode".to_string(),
            format!("--xcode-project={project_name}"),
            "--xcode-build-system=new".to_string(),
        ],
        "windows" => vec!["--ide=vs".to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn locate_requires_both_tools() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("buildtools").join(host_platform());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("gn{}", exe_suffix())), b"").unwrap();

        let err = Toolchain::locate(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("ninja"));

        std::fs::write(dir.join(format!("ninja{}", exe_suffix())), b"").unwrap();
        let toolchain = Toolchain::locate(tmp.path()).unwrap();
        assert!(toolchain.gn().ends_with(format!("gn{}", exe_suffix())));
    }

    #[test]
    fn ide_flags_match_host() {
        let flags = ide_flags("GNBuildExample");
        match host_platform() {
            "darwin" => assert!(flags.contains(&"--xcode-project=GNBuildExample".to_string())),
            "windows" => assert_eq!(flags, vec!["--ide=vs"]),
            _ => assert!(flags.is_empty()),
        }
    }
}
