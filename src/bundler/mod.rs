//! GN/Ninja build driver and product packaging.
//!
//! A build goes through three stages, each driven by [`Settings`]:
//!
//! 1. [`toolchain`] runs `gn gen`, `ninja -t compdb` and `ninja` per CPU
//! 2. [`Builder`] merges slices with `lipo` and creates the XCFramework
//!    (Darwin targets)
//! 3. [`Archiver`] stages the products and zips them with
//!    [`utils::zip::zip_folders`]
//!
//! # Example
//!
//! ```no_run
//! use gnbuild::bundler::{Archiver, Builder, SettingsBuilder, TargetOs};
//!
//! # async fn example() -> gnbuild::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .project_root("/path/to/project")
//!     .target_os(TargetOs::Ios)
//!     .version("1.2.3-main-240101-120000-g6ff87c4924")
//!     .build()?;
//!
//! Builder::new(&settings)?.build().await?;
//! let output = Archiver::new(&settings).archive().await?;
//! println!("{} ({})", output.products.path.display(), output.products.checksum);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod builder;
pub mod error;
pub mod gn;
pub mod platform;
pub mod settings;
pub mod toolchain;
pub mod utils;

pub use archive::{ArchiveOutput, Archiver, Artifact};
pub use builder::Builder;
pub use error::{Error, Result};
pub use settings::{
    BuildLang, BuildType, Cpu, DEFAULT_BUNDLE_ID_PREFIX, DEFAULT_PROJECT_NAME,
    DEFAULT_VERSION_ARG, LibType, PRODUCTS_TAG, PackageSettings, PlatformProfile, Sanitizer,
    Settings, SettingsBuilder, TargetOs, XCFRAMEWORK_TAG,
};
