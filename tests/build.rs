//! End-to-end runs against stand-in `gn` and `ninja` scripts.
#![cfg(unix)]

use assert_cmd::prelude::*;
use gnbuild::bundler::toolchain::host_platform;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

const FAKE_GN: &str = r#"#!/bin/sh
echo "gn $*" >> "$GNBUILD_TEST_LOG"
for arg in "$@"; do
  case "$arg" in
    */_out/*) mkdir -p "$arg" ;;
  esac
done
"#;

const FAKE_NINJA: &str = r#"#!/bin/sh
echo "ninja $*" >> "$GNBUILD_TEST_LOG"
case " $* " in
  *" compdb "*) echo '[{"directory":".","file":"src/lib.cc","command":"cc -c src/lib.cc"}]' ;;
esac
"#;

const FAILING_GN: &str = "#!/bin/sh\necho 'ERROR at //BUILD.gn:1:1' >&2\nexit 3\n";

struct Project {
    dir: TempDir,
}

impl Project {
    fn new(gn: &str, ninja: &str) -> Self {
        let dir = tempdir().unwrap();
        let tools = dir.path().join("buildtools").join(host_platform());
        fs::create_dir_all(&tools).unwrap();
        write_script(&tools.join("gn"), gn);
        write_script(&tools.join("ninja"), ninja);
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn log(&self) -> PathBuf {
        self.root().join("calls.log")
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("gnbuild").unwrap();
        cmd.env("GNBUILD_TEST_LOG", self.log())
            .env_remove("GNBUILD_PROJECT_NAME")
            .env_remove("GNBUILD_BUNDLE_ID_PREFIX")
            .env_remove("GNBUILD_VERSION")
            .arg("--project-root")
            .arg(self.root());
        cmd
    }
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn only_gen_writes_compile_database_per_cpu() {
    let project = Project::new(FAKE_GN, FAKE_NINJA);

    project
        .command()
        .args(["--mac", "--only-gen", "--cpu", "arm64", "x64"])
        .args(["--build-version", "1.2.3-main-240101-120000-g6ff87c4924"])
        .assert()
        .success();

    let out = project.root().join("_out/mac-shared-objc/release");
    for cpu in ["arm64", "x64"] {
        let db = fs::read_to_string(out.join(cpu).join("compile_commands.json")).unwrap();
        assert!(db.contains("src/lib.cc"));
    }
    assert!(!out.join("__products").exists());

    let calls = project.calls();
    assert_eq!(calls.len(), 4, "{calls:?}");
    assert!(calls[0].starts_with("gn gen --check -v"));
    assert!(calls[0].contains(r#"target_cpu="arm64""#));
    assert!(calls[0].contains(r#"target_os="mac""#));
    assert!(calls[0].contains("build_mac_objc_shared=true"));
    assert!(calls[1].contains("-t compdb cc cxx objc objcxx asm"));
    assert!(calls[2].contains(r#"target_cpu="x64""#));
    assert!(calls.iter().all(|c| !c.starts_with("ninja -v")));
}

#[test]
fn debug_static_c_build_arguments() {
    let project = Project::new(FAKE_GN, FAKE_NINJA);

    project
        .command()
        .args(["--ios", "--debug", "--lib-type", "static", "--lang", "c"])
        .args(["--cpu", "arm64", "--only-gen", "--ios-no-bitcode"])
        .args(["--sanitizer", "asan", "--build-version", "0.1.0-heads"])
        .assert()
        .success();

    assert!(
        project
            .root()
            .join("_out/ios-static-c/debug/arm64/compile_commands.json")
            .is_file()
    );

    let calls = project.calls();
    let gen_call = &calls[0];
    assert!(gen_call.contains("is_official_build=false"));
    assert!(gen_call.contains("enable_ios_bitcode=false"));
    assert!(gen_call.contains("build_ios_common_static=true"));
    assert!(gen_call.contains("is_asan=true"));
}

#[test]
fn failing_generator_stops_the_pipeline() {
    let project = Project::new(FAILING_GN, FAKE_NINJA);

    project
        .command()
        .args(["--mac", "--cpu", "x64", "--build-version", "1.0.0-main"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("gn gen failed with exit code 3"));

    assert!(project.calls().is_empty());
    assert!(
        !project
            .root()
            .join("_out/mac-shared-objc/release/x64/compile_commands.json")
            .exists()
    );
}
