//! Packaging of build products into distributable ZIP archives.
//!
//! The products directory `out_dir(__products)` is rebuilt from scratch on
//! every run. It ends up holding two archives:
//!
//! - `{product}.zip` with the XCFramework
//! - `symbols-{product}.zip` with per-ABI dSYM bundles (shared builds)
//!
//! where `{product}` is `{Project}-{archive_version}-{os}-{lib}-{lang}`.

use crate::{
    bundler::{
        Error, LibType, PRODUCTS_TAG, Result, Settings,
        builder::checksum::calculate_sha256,
        error::ErrorExt,
        platform::macos::xcframework,
        utils::{
            fs,
            zip::{ArchiveOptions, ArchiveReport, zip_folders},
        },
    },
    metadata::archive_version,
};
use std::path::{Path, PathBuf};

/// Finder metadata never shipped in archives.
const DS_STORE: &str = ".DS_Store";

/// A finished archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path of the archive.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256.
    pub checksum: String,
}

/// Product and symbol archives of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutput {
    pub products: Artifact,
    pub symbols: Artifact,
}

/// Stages and zips the products of a completed build.
#[derive(Debug)]
pub struct Archiver<'a> {
    settings: &'a Settings,
}

impl<'a> Archiver<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// `{Project}-{archive_version}-{os}-{lib}-{lang}`
    pub fn product_name(&self) -> String {
        let s = self.settings;
        format!(
            "{}-{}-{}-{}-{}",
            s.project_name(),
            archive_version(s.version_string()),
            s.target_os(),
            s.lib_type(),
            s.lang()
        )
    }

    /// Directory receiving the staging folders and archives.
    pub fn products_dir(&self) -> PathBuf {
        self.settings.out_dir(PRODUCTS_TAG)
    }

    /// Rebuilds the products directory and writes both archives.
    pub async fn archive(&self) -> Result<ArchiveOutput> {
        let settings = self.settings;
        log::info!(
            "[*] Start archiving {} {}...",
            settings.target_os(),
            settings.build_type()
        );

        let product_name = self.product_name();
        let products_dir = self.products_dir();
        log::info!("[*] recreate {}", products_dir.display());
        fs::create_dir_all(&products_dir, true).await?;

        let product_dir = products_dir.join(&product_name);
        let symbols_dir = products_dir.join(format!("symbols-{product_name}"));
        fs::create_dir_all(&product_dir, false).await?;
        fs::create_dir_all(&symbols_dir, false).await?;

        if settings.target_os().is_darwin() {
            self.stage_darwin(&product_dir, &symbols_dir).await?;
        }

        let products = zip_staged(
            product_dir,
            products_dir.clone(),
            format!("{product_name}.zip"),
        )
        .await?;
        let symbols = zip_staged(
            symbols_dir,
            products_dir,
            format!("symbols-{product_name}.zip"),
        )
        .await?;

        log::info!(
            "[*] Archive {} {} success!",
            settings.target_os(),
            settings.build_type()
        );

        Ok(ArchiveOutput {
            products: artifact(products.path).await?,
            symbols: artifact(symbols.path).await?,
        })
    }

    /// Copies per-ABI dSYMs (shared builds only) and the XCFramework into the
    /// staging folders.
    async fn stage_darwin(&self, product_dir: &Path, symbols_dir: &Path) -> Result<()> {
        let settings = self.settings;
        let package = settings.package();

        if settings.lib_type() == LibType::Shared {
            log::info!("[*] Copy Darwin dSYM...");
            for &cpu in settings.cpus() {
                let src = settings.cpu_out_dir(cpu).join(package.dsym_name());
                let dst = symbols_dir
                    .join(cpu.abi(settings.target_os()))
                    .join(package.dsym_name());
                fs::copy_dir(&src, &dst).await?;
            }
        }

        log::info!("[*] Copy Darwin XCFramework...");
        let src = xcframework::output_path(settings);
        let dst = product_dir.join(package.xcframework_name());
        fs::copy_dir(&src, &dst).await
    }
}

/// Zips one staging folder on the blocking pool.
async fn zip_staged(src: PathBuf, dst_folder: PathBuf, zip_name: String) -> Result<ArchiveReport> {
    log::info!(
        "[*] Zip {}, from: {}",
        dst_folder.join(&zip_name).display(),
        src.display()
    );

    tokio::task::spawn_blocking(move || {
        let options = ArchiveOptions::default().with_excluded_suffixes([DS_STORE]);
        zip_folders(&[src], &dst_folder, &zip_name, &options)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Archive task panicked: {e}")))?
}

async fn artifact(path: PathBuf) -> Result<Artifact> {
    let size = tokio::fs::metadata(&path)
        .await
        .fs_context("reading artifact metadata", &path)?
        .len();
    let checksum = calculate_sha256(&path).await?;
    Ok(Artifact {
        path,
        size,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{Cpu, SettingsBuilder, TargetOs};
    use std::fs::File;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn mac_settings(root: &Path, lib_type: LibType) -> Settings {
        SettingsBuilder::new()
            .project_root(root)
            .target_os(TargetOs::Mac)
            .lib_type(lib_type)
            .cpus(vec![Cpu::Arm64, Cpu::X64])
            .version("1.2.3-main-240101-120000-g6ff87c4924")
            .build()
            .unwrap()
    }

    fn names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn product_name_uses_semver_and_branch() {
        let settings = mac_settings(Path::new("/proj"), LibType::Shared);
        assert_eq!(
            Archiver::new(&settings).product_name(),
            "GNBuildExample-1.2.3-main-mac-shared-objc"
        );
    }

    #[tokio::test]
    async fn shared_mac_archives_framework_and_dsyms() {
        let tmp = TempDir::new().unwrap();
        let settings = mac_settings(tmp.path(), LibType::Shared);

        let xcfw = xcframework::output_path(&settings);
        std::fs::create_dir_all(xcfw.join("macos-arm64_x86_64")).unwrap();
        std::fs::write(xcfw.join("Info.plist"), b"plist").unwrap();
        std::fs::write(xcfw.join(".DS_Store"), b"junk").unwrap();
        for cpu in [Cpu::Arm64, Cpu::X64] {
            let dsym = settings.cpu_out_dir(cpu).join("GNBuildExample.dSYM");
            std::fs::create_dir_all(dsym.join("Contents")).unwrap();
            std::fs::write(dsym.join("Contents/Info.plist"), b"dsym").unwrap();
        }

        let output = Archiver::new(&settings).archive().await.unwrap();

        assert!(output.products.path.ends_with("GNBuildExample-1.2.3-main-mac-shared-objc.zip"));
        assert_eq!(output.products.checksum.len(), 64);
        assert!(output.products.size > 0);
        assert_eq!(
            names(&output.products.path),
            vec!["GNBuildExample-1.2.3-main-mac-shared-objc/GNBuildExample.xcframework/Info.plist"]
        );
        assert_eq!(
            names(&output.symbols.path),
            vec![
                "symbols-GNBuildExample-1.2.3-main-mac-shared-objc/arm64/GNBuildExample.dSYM/Contents/Info.plist",
                "symbols-GNBuildExample-1.2.3-main-mac-shared-objc/x86_64/GNBuildExample.dSYM/Contents/Info.plist",
            ]
        );
    }

    #[tokio::test]
    async fn static_build_has_empty_symbols_archive() {
        let tmp = TempDir::new().unwrap();
        let settings = mac_settings(tmp.path(), LibType::Static);
        let xcfw = xcframework::output_path(&settings);
        std::fs::create_dir_all(&xcfw).unwrap();
        std::fs::write(xcfw.join("Info.plist"), b"plist").unwrap();

        let output = Archiver::new(&settings).archive().await.unwrap();
        assert!(names(&output.symbols.path).is_empty());
    }

    #[tokio::test]
    async fn stale_products_are_removed() {
        let tmp = TempDir::new().unwrap();
        let settings = mac_settings(tmp.path(), LibType::Static);
        let archiver = Archiver::new(&settings);
        std::fs::create_dir_all(archiver.products_dir()).unwrap();
        std::fs::write(archiver.products_dir().join("old.zip"), b"old").unwrap();
        std::fs::create_dir_all(xcframework::output_path(&settings)).unwrap();

        archiver.archive().await.unwrap();
        assert!(!archiver.products_dir().join("old.zip").exists());
    }

    #[tokio::test]
    async fn missing_xcframework_fails() {
        let tmp = TempDir::new().unwrap();
        let settings = mac_settings(tmp.path(), LibType::Static);
        assert!(Archiver::new(&settings).archive().await.is_err());
    }
}
