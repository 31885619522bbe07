//! Target platform, linkage, language and build mode.
//!
//! Each [`TargetOs`] has a [`PlatformProfile`] describing which CPUs and
//! languages it accepts and what it builds by default.

use super::Cpu;
use std::fmt;

/// Operating system the library is built for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum TargetOs {
    /// Android (NDK)
    Android,
    /// iOS devices and simulator
    Ios,
    /// macOS
    Mac,
    /// Windows
    Win,
}

/// Library linkage.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LibType {
    /// Dynamically loaded library (`.framework` on Darwin)
    #[default]
    Shared,
    /// Statically linked archive (`lib*.a`)
    Static,
}

/// Language of the public API layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum BuildLang {
    /// Java bindings (Android only)
    Java,
    /// Objective-C bindings (iOS/macOS only)
    Objc,
    /// Plain C API
    C,
}

/// Build mode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum BuildType {
    /// Unoptimised build with assertions
    Debug,
    /// Official optimised build
    #[default]
    Release,
}

/// Sanitizer toggled through a GN `is_*` argument.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Sanitizer {
    /// AddressSanitizer
    Asan,
    /// LeakSanitizer
    Lsan,
    /// MemorySanitizer
    Msan,
    /// ThreadSanitizer
    Tsan,
    /// UndefinedBehaviorSanitizer
    Ubsan,
}

/// Accepted and default CPUs/languages for one platform.
#[derive(Debug)]
pub struct PlatformProfile {
    /// CPUs the toolchain can target
    pub cpus: &'static [Cpu],
    /// CPUs built when none are given
    pub default_cpus: &'static [Cpu],
    /// Languages the platform supports
    pub langs: &'static [BuildLang],
    /// Language used when none is given
    pub default_lang: BuildLang,
}

static ANDROID: PlatformProfile = PlatformProfile {
    cpus: &[Cpu::Arm, Cpu::Arm64, Cpu::X86, Cpu::X64],
    default_cpus: &[Cpu::Arm, Cpu::Arm64, Cpu::X86, Cpu::X64],
    langs: &[BuildLang::Java, BuildLang::C],
    default_lang: BuildLang::Java,
};

static IOS: PlatformProfile = PlatformProfile {
    cpus: &[Cpu::Arm, Cpu::Arm64, Cpu::X64],
    default_cpus: &[Cpu::Arm, Cpu::Arm64, Cpu::X64],
    langs: &[BuildLang::Objc, BuildLang::C],
    default_lang: BuildLang::Objc,
};

static MAC: PlatformProfile = PlatformProfile {
    cpus: &[Cpu::Arm64, Cpu::X64],
    default_cpus: &[Cpu::Arm64, Cpu::X64],
    langs: &[BuildLang::Objc, BuildLang::C],
    default_lang: BuildLang::Objc,
};

static WIN: PlatformProfile = PlatformProfile {
    cpus: &[Cpu::X86, Cpu::X64],
    default_cpus: &[Cpu::X64],
    langs: &[BuildLang::C],
    default_lang: BuildLang::C,
};

impl TargetOs {
    /// Name used in output paths, archive names and GN arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetOs::Android => "android",
            TargetOs::Ios => "ios",
            TargetOs::Mac => "mac",
            TargetOs::Win => "win",
        }
    }

    /// Accepted CPUs and languages for this platform.
    pub fn profile(self) -> &'static PlatformProfile {
        match self {
            TargetOs::Android => &ANDROID,
            TargetOs::Ios => &IOS,
            TargetOs::Mac => &MAC,
            TargetOs::Win => &WIN,
        }
    }

    /// iOS and macOS produce XCFrameworks and dSYMs.
    pub fn is_darwin(self) -> bool {
        matches!(self, TargetOs::Ios | TargetOs::Mac)
    }
}

impl LibType {
    /// `shared` or `static`.
    pub fn as_str(self) -> &'static str {
        match self {
            LibType::Shared => "shared",
            LibType::Static => "static",
        }
    }
}

impl BuildLang {
    /// `java`, `objc` or `c`.
    pub fn as_str(self) -> &'static str {
        match self {
            BuildLang::Java => "java",
            BuildLang::Objc => "objc",
            BuildLang::C => "c",
        }
    }
}

impl BuildType {
    /// `debug` or `release`.
    pub fn as_str(self) -> &'static str {
        match self {
            BuildType::Debug => "debug",
            BuildType::Release => "release",
        }
    }
}

impl Sanitizer {
    /// GN argument enabling this sanitizer, e.g. `is_asan`.
    pub fn gn_arg(self) -> &'static str {
        match self {
            Sanitizer::Asan => "is_asan",
            Sanitizer::Lsan => "is_lsan",
            Sanitizer::Msan => "is_msan",
            Sanitizer::Tsan => "is_tsan",
            Sanitizer::Ubsan => "is_ubsan",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(TargetOs, LibType, BuildLang, BuildType);
