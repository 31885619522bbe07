//! Project identity used for binary names and GN arguments.

/// Default project name; also the GN target/binary name.
pub const DEFAULT_PROJECT_NAME: &str = "GNBuildExample";

/// Default GN argument receiving the version string.
pub const DEFAULT_VERSION_ARG: &str = "gbe_version";

/// Default prefix for Darwin bundle identifiers.
pub const DEFAULT_BUNDLE_ID_PREFIX: &str = "com.example";

/// Project metadata shared by every build stage.
///
/// # Examples
///
/// ```
/// use gnbuild::bundler::PackageSettings;
///
/// let package = PackageSettings {
///     project_name: "MyLib".into(),
///     ..Default::default()
/// };
/// assert_eq!(package.static_library_name(), "libMyLib.a");
/// assert_eq!(package.version_arg, "gbe_version");
/// ```
#[derive(Debug, Clone)]
pub struct PackageSettings {
    /// Project name.
    ///
    /// Names the framework (`{name}.framework`), static library
    /// (`lib{name}.a`), dSYM bundle and XCFramework.
    pub project_name: String,

    /// GN argument that receives the version string.
    ///
    /// The library hard-codes this value behind its `getVersion()` API.
    pub version_arg: String,

    /// Bundle identifier prefix for Darwin app/framework bundles.
    pub bundle_id_prefix: String,

    /// Team name pattern selecting the iOS code signing certificate.
    ///
    /// Only needed when several "Apple Development" certificates are in the
    /// keychain. Empty means let Xcode pick.
    pub signing_team: String,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            version_arg: DEFAULT_VERSION_ARG.to_string(),
            bundle_id_prefix: DEFAULT_BUNDLE_ID_PREFIX.to_string(),
            signing_team: String::new(),
        }
    }
}

impl PackageSettings {
    /// `lib{project}.a`
    pub fn static_library_name(&self) -> String {
        format!("lib{}.a", self.project_name)
    }

    /// `{project}.framework`
    pub fn framework_name(&self) -> String {
        format!("{}.framework", self.project_name)
    }

    /// `{project}.dSYM`
    pub fn dsym_name(&self) -> String {
        format!("{}.dSYM", self.project_name)
    }

    /// `{project}.xcframework`
    pub fn xcframework_name(&self) -> String {
        format!("{}.xcframework", self.project_name)
    }
}
