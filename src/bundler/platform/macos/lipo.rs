//! Universal binary merging with `lipo`.
//!
//! An XCFramework accepts one binary per platform variant, so slices that
//! share a variant have to be merged first: iOS armv7 goes into the arm64
//! binary, macOS arm64 goes into the x86_64 binary.

use crate::bundler::{
    Cpu, Settings, TargetOs,
    error::Result,
    utils::{
        process::{run_stdout, run_streaming},
        tool_detection,
    },
};
use tokio::process::Command;

/// The `(source, destination)` pair merged for this build, if any.
///
/// Only applies when both CPUs are part of the build.
pub fn combine_pair(settings: &Settings) -> Option<(Cpu, Cpu)> {
    let pair = match settings.target_os() {
        TargetOs::Ios => (Cpu::Arm, Cpu::Arm64),
        TargetOs::Mac => (Cpu::Arm64, Cpu::X64),
        TargetOs::Android | TargetOs::Win => return None,
    };
    (settings.has_cpu(pair.0) && settings.has_cpu(pair.1)).then_some(pair)
}

/// Whether `cpu` was merged into another slice and has no XCFramework entry
/// of its own.
pub fn is_merged_away(settings: &Settings, cpu: Cpu) -> bool {
    combine_pair(settings).is_some_and(|(src, _)| src == cpu)
}

/// Whether `lipo -info` output already lists `abi`.
fn contains_arch(lipo_info: &str, abi: &str) -> bool {
    lipo_info.contains(abi)
}

/// Merges the source slice into the destination binary when the build needs
/// it and the destination does not already contain that architecture.
pub async fn combine(settings: &Settings) -> Result<()> {
    let Some((src, dst)) = combine_pair(settings) else {
        return Ok(());
    };
    combine_binary(settings, src, dst).await
}

/// `xcrun lipo -info {dst}`, then `xcrun lipo -create {src} {dst} -output {dst}`
/// if the source ABI is missing.
pub async fn combine_binary(settings: &Settings, src: Cpu, dst: Cpu) -> Result<()> {
    let xcrun = tool_detection::xcrun()?;
    let src_binary = settings.library_binary(src);
    let dst_binary = settings.library_binary(dst);
    let abi = src.abi(settings.target_os());

    log::info!("[*] Check binary's arch.");
    let mut info = Command::new(&xcrun);
    info.arg("lipo").arg("-info").arg(&dst_binary);
    let archs = run_stdout("lipo -info", &mut info).await?;
    log::info!("{archs}");

    if contains_arch(&archs, abi) {
        log::debug!("{} already contains {abi}", dst_binary.display());
        return Ok(());
    }

    log::info!("[*] Combine {src} into {dst} binary with lipo.");
    let mut create = Command::new(&xcrun);
    create
        .args(["lipo", "-create"])
        .arg(&src_binary)
        .arg(&dst_binary)
        .arg("-output")
        .arg(&dst_binary);
    run_streaming("lipo -create", &mut create).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::SettingsBuilder;

    fn settings(os: TargetOs, cpus: Vec<Cpu>) -> Settings {
        SettingsBuilder::new()
            .project_root("/proj")
            .target_os(os)
            .cpus(cpus)
            .build()
            .unwrap()
    }

    #[test]
    fn ios_merges_armv7_into_arm64() {
        let s = settings(TargetOs::Ios, vec![Cpu::Arm, Cpu::Arm64, Cpu::X64]);
        assert_eq!(combine_pair(&s), Some((Cpu::Arm, Cpu::Arm64)));
        assert!(is_merged_away(&s, Cpu::Arm));
        assert!(!is_merged_away(&s, Cpu::Arm64));
    }

    #[test]
    fn mac_merges_arm64_into_x64() {
        let s = settings(TargetOs::Mac, vec![Cpu::Arm64, Cpu::X64]);
        assert_eq!(combine_pair(&s), Some((Cpu::Arm64, Cpu::X64)));
        assert!(is_merged_away(&s, Cpu::Arm64));
    }

    #[test]
    fn single_cpu_needs_no_merge() {
        let s = settings(TargetOs::Mac, vec![Cpu::X64]);
        assert_eq!(combine_pair(&s), None);

        let s = settings(TargetOs::Ios, vec![Cpu::Arm64, Cpu::X64]);
        assert_eq!(combine_pair(&s), None);
    }

    #[test]
    fn lipo_info_detection() {
        let out = "Architectures in the fat file: libGNBuildExample.a are: armv7 arm64";
        assert!(contains_arch(out, "armv7"));
        assert!(!contains_arch("Non-fat file: lib.a is architecture: x86_64", "arm64"));
    }
}
