//! GN build argument generation.
//!
//! Arguments are selected from [`PLATFORM_TABLE`], keyed by platform and
//! language, then rendered into the single `--args=` parameter `gn gen`
//! expects.

use crate::bundler::{BuildLang, BuildType, Cpu, LibType, Settings, TargetOs};
use std::fmt;

/// A GN argument value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GnValue {
    /// `true` / `false`
    Bool(bool),
    /// Quoted string
    Str(String),
    /// List of quoted strings
    List(Vec<String>),
}

impl fmt::Display for GnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GnValue::Bool(b) => write!(f, "{b}"),
            GnValue::Str(s) => write!(f, "\"{s}\""),
            GnValue::List(items) => {
                let quoted: Vec<String> = items.iter().map(|v| format!("\"{v}\"")).collect();
                write!(f, "[{}]", quoted.join(","))
            }
        }
    }
}

/// Ordered GN arguments.
///
/// Insertion order is preserved so generated command lines are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GnArgs(Vec<(String, GnValue)>);

impl GnArgs {
    /// Sets `key`, replacing an earlier value in place.
    pub fn set(&mut self, key: &str, value: GnValue) {
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            self.0.push((key.to_string(), value));
        }
    }

    /// Sets a boolean argument.
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, GnValue::Bool(value));
    }

    /// Sets a string argument.
    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.set(key, GnValue::Str(value.into()));
    }

    /// Looks up an argument.
    pub fn get(&self, key: &str) -> Option<&GnValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// One `key=value` string per argument.
    pub fn to_command_line(&self) -> Vec<String> {
        self.0.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }

    /// The `--args=...` parameter passed to `gn gen`.
    pub fn to_gen_flag(&self) -> String {
        format!("--args={}", self.to_command_line().join(" "))
    }
}

/// Build arguments for one (platform, language) pair.
#[derive(Debug)]
pub struct PlatformEntry {
    /// Target platform
    pub target_os: TargetOs,
    /// API language
    pub lang: BuildLang,
    /// Flag enabling the shared library target
    pub shared_flag: &'static str,
    /// Flag enabling the static library target
    pub static_flag: &'static str,
    /// Platform-wide arguments
    pub platform_args: fn(&Settings, &mut GnArgs),
}

/// Supported (platform, language) pairs.
///
/// Android and Windows have no entry: their GN configuration is not defined
/// and they are rejected during settings validation.
pub static PLATFORM_TABLE: &[PlatformEntry] = &[
    PlatformEntry {
        target_os: TargetOs::Ios,
        lang: BuildLang::Objc,
        shared_flag: "build_ios_objc_shared",
        static_flag: "build_ios_objc_static",
        platform_args: ios_args,
    },
    PlatformEntry {
        target_os: TargetOs::Ios,
        lang: BuildLang::C,
        shared_flag: "build_ios_common_shared",
        static_flag: "build_ios_common_static",
        platform_args: ios_args,
    },
    PlatformEntry {
        target_os: TargetOs::Mac,
        lang: BuildLang::Objc,
        shared_flag: "build_mac_objc_shared",
        static_flag: "build_mac_objc_static",
        platform_args: mac_args,
    },
    PlatformEntry {
        target_os: TargetOs::Mac,
        lang: BuildLang::C,
        shared_flag: "build_mac_common_shared",
        static_flag: "build_mac_common_static",
        platform_args: mac_args,
    },
];

/// Finds the table entry for a platform and language.
pub fn platform_entry(target_os: TargetOs, lang: BuildLang) -> Option<&'static PlatformEntry> {
    PLATFORM_TABLE
        .iter()
        .find(|e| e.target_os == target_os && e.lang == lang)
}

fn ios_args(settings: &Settings, args: &mut GnArgs) {
    let package = settings.package();
    args.set_str("target_os", "ios");
    args.set_bool("enable_ios_bitcode", settings.ios_bitcode());
    args.set_str("ios_app_bundle_id_prefix", &package.bundle_id_prefix);
    // dSYMs are archived even for debug builds.
    args.set_bool("enable_dsyms", true);
    args.set_str("ios_code_signing_identity_team_name", &package.signing_team);
}

fn mac_args(settings: &Settings, args: &mut GnArgs) {
    args.set_str("target_os", "mac");
    args.set_str("mac_app_bundle_id_prefix", &settings.package().bundle_id_prefix);
    args.set_bool("enable_dsyms", true);
}

/// Builds the full argument set for one CPU.
///
/// Returns `None` when the platform/language pair has no table entry;
/// [`SettingsBuilder`](crate::bundler::SettingsBuilder) rejects such
/// configurations up front.
pub fn gn_args(settings: &Settings, cpu: Cpu) -> Option<GnArgs> {
    let entry = platform_entry(settings.target_os(), settings.lang())?;
    let mut args = GnArgs::default();

    args.set_bool(
        "is_official_build",
        settings.build_type() == BuildType::Release,
    );
    // Escaped so the value reaches the compiler as a string literal.
    args.set_str(
        &settings.package().version_arg,
        format!("\\\"{}\\\"", settings.version_string()),
    );

    (entry.platform_args)(settings, &mut args);

    let flag = match settings.lib_type() {
        LibType::Shared => entry.shared_flag,
        LibType::Static => entry.static_flag,
    };
    args.set_bool(flag, true);

    args.set_str("target_cpu", cpu.as_str());

    for sanitizer in settings.sanitizers() {
        args.set_bool(sanitizer.gn_arg(), true);
    }

    Some(args)
}
