//! Command line interface for gnbuild.
//!
//! Runs the whole pipeline for one target: validate arguments, resolve the
//! version, build every CPU, then archive unless only generating.

mod args;

pub use args::Args;

use crate::{
    bundler::{Archiver, Builder, toolchain::Toolchain},
    error::Result,
    metadata,
};
use anyhow::Context as _;
use path_absolutize::Absolutize;
use std::path::PathBuf;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await?;
    Ok(0)
}

/// Runs the pipeline for already parsed arguments.
pub async fn execute(args: &Args) -> Result<()> {
    let project_root = absolute_root(args)?;

    if let Some(kind) = args.print_version {
        println!("{}", metadata::version_for(kind, &project_root).await?);
        return Ok(());
    }

    // Configuration errors surface here, before any tool runs.
    args.validate()?;
    let settings_builder = args.settings_builder(&project_root)?;
    settings_builder.validate()?;
    Toolchain::locate(&project_root)?;

    let version = match &args.build_version {
        Some(version) => version.clone(),
        None => metadata::full_version(&project_root).await?,
    };
    log::info!("[*] Version: {version}");

    let settings = settings_builder.version(version).build()?;

    Builder::new(&settings)?.build().await?;

    if !settings.only_gen() {
        let output = Archiver::new(&settings).archive().await?;
        for artifact in [&output.products, &output.symbols] {
            log::info!(
                "[*] {} ({} bytes, sha256 {})",
                artifact.path.display(),
                artifact.size,
                artifact.checksum
            );
        }
    }

    log::info!("[*] All build success ^_^");
    Ok(())
}

fn absolute_root(args: &Args) -> Result<PathBuf> {
    let root = args
        .project_root
        .absolutize()
        .with_context(|| {
            format!(
                "Failed to resolve project root {}",
                args.project_root.display()
            )
        })?
        .into_owned();
    Ok(root)
}
