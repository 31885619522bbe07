//! CPU architecture types and utilities.

use super::TargetOs;
use std::fmt;

/// CPU architecture passed to `gn` as `target_cpu`.
///
/// Names follow GN conventions (`x64`, not `x86_64`). Use [`Cpu::abi`] for
/// the platform-specific ABI spelling used by `lipo` and symbol directories.
///
/// # Examples
///
/// ```
/// use gnbuild::bundler::{Cpu, TargetOs};
///
/// assert_eq!(Cpu::Arm.abi(TargetOs::Android), "armeabi-v7a");
/// assert_eq!(Cpu::X64.abi(TargetOs::Mac), "x86_64");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Cpu {
    /// 32-bit ARM (armv7)
    Arm,
    /// 64-bit ARM (AArch64)
    Arm64,
    /// 32-bit Intel
    X86,
    /// 64-bit Intel/AMD
    X64,
}

impl Cpu {
    /// GN spelling of the architecture.
    pub fn as_str(self) -> &'static str {
        match self {
            Cpu::Arm => "arm",
            Cpu::Arm64 => "arm64",
            Cpu::X86 => "x86",
            Cpu::X64 => "x64",
        }
    }

    /// Platform-specific ABI name of this architecture.
    ///
    /// | cpu   | ios / mac | android     | win   |
    /// |-------|-----------|-------------|-------|
    /// | arm   | armv7     | armeabi-v7a | arm   |
    /// | arm64 | arm64     | arm64-v8a   | arm64 |
    /// | x86   | i386      | x86         | x86   |
    /// | x64   | x86_64    | x86_64      | x64   |
    pub fn abi(self, target_os: TargetOs) -> &'static str {
        match (self, target_os) {
            (Cpu::Arm, TargetOs::Ios | TargetOs::Mac) => "armv7",
            (Cpu::Arm, TargetOs::Android) => "armeabi-v7a",
            (Cpu::Arm, TargetOs::Win) => "arm",

            (Cpu::Arm64, TargetOs::Android) => "arm64-v8a",
            (Cpu::Arm64, _) => "arm64",

            (Cpu::X86, TargetOs::Ios | TargetOs::Mac) => "i386",
            (Cpu::X86, _) => "x86",

            (Cpu::X64, TargetOs::Win) => "x64",
            (Cpu::X64, _) => "x86_64",
        }
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
