//! XCFramework creation with `xcodebuild -create-xcframework`.

use crate::bundler::{
    LibType, Settings, XCFRAMEWORK_TAG,
    error::Result,
    utils::{fs, process::run_streaming, tool_detection},
};
use std::{ffi::OsString, path::PathBuf};
use tokio::process::Command;

use super::lipo;

/// Output path: `{out_dir(xcframework)}/{Project}.xcframework`.
pub fn output_path(settings: &Settings) -> PathBuf {
    settings
        .out_dir(XCFRAMEWORK_TAG)
        .join(settings.package().xcframework_name())
}

/// Arguments after `xcodebuild`, one `-framework` or `-library`/`-headers`
/// group per CPU that was not merged into another slice.
pub fn xcodebuild_args(settings: &Settings) -> Vec<OsString> {
    let package = settings.package();
    let mut args: Vec<OsString> = vec!["-create-xcframework".into()];

    for &cpu in settings.cpus() {
        if lipo::is_merged_away(settings, cpu) {
            continue;
        }

        let out = settings.cpu_out_dir(cpu);
        match settings.lib_type() {
            LibType::Shared => {
                args.push("-framework".into());
                args.push(out.join(package.framework_name()).into());
            }
            LibType::Static => {
                args.push("-library".into());
                args.push(out.join(package.static_library_name()).into());
                args.push("-headers".into());
                args.push(out.join("include").into());
            }
        }
    }

    args.push("-output".into());
    args.push(output_path(settings).into());
    args
}

/// Merges shared slices with `lipo` and wraps the per-CPU products in an
/// XCFramework, replacing any previous one.
pub async fn create(settings: &Settings) -> Result<PathBuf> {
    lipo::combine(settings).await?;

    let output = output_path(settings);
    if output.exists() {
        log::info!("[*] remove {}", output.display());
        fs::remove_dir_all(&output).await?;
    }

    let mut cmd = Command::new(tool_detection::xcrun()?);
    cmd.arg("xcodebuild").args(xcodebuild_args(settings));
    run_streaming("xcodebuild -create-xcframework", &mut cmd).await?;

    Ok(output)
}
