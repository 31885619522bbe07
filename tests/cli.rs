use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn gnbuild() -> Command {
    let mut cmd = Command::cargo_bin("gnbuild").unwrap();
    cmd.env_remove("GNBUILD_PROJECT_ROOT")
        .env_remove("GNBUILD_PROJECT_NAME")
        .env_remove("GNBUILD_BUNDLE_ID_PREFIX")
        .env_remove("GNBUILD_VERSION");
    cmd
}

#[test]
fn missing_target_os_fails_before_any_output() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;

    gnbuild()
        .arg("--project-root")
        .arg(root.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing required argument: --target-os"));

    assert!(!root.path().join("_out").exists());
    Ok(())
}

#[test]
fn conflicting_targets_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;

    gnbuild()
        .args(["--ios", "--mac", "--project-root"])
        .arg(root.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Conflicting arguments"));
    Ok(())
}

#[test]
fn java_outside_android_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;

    gnbuild()
        .args(["--ios", "--lang", "java", "--project-root"])
        .arg(root.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Java build lang only available for Android.",
        ));
    Ok(())
}

#[test]
fn invalid_cpu_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;

    gnbuild()
        .args(["--mac", "--cpu", "x86", "--project-root"])
        .arg(root.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("x86 is not a valid cpu for mac"));
    assert!(!root.path().join("_out").exists());
    Ok(())
}

#[test]
fn android_has_no_build_arguments() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;

    gnbuild()
        .args(["--android", "--project-root"])
        .arg(root.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unsupported target"));
    Ok(())
}

#[test]
fn missing_toolchain_is_a_configuration_error() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;

    gnbuild()
        .args(["--mac", "--build-version", "1.0.0-main", "--project-root"])
        .arg(root.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("build tool not found"));
    assert!(!root.path().join("_out").exists());
    Ok(())
}

#[test]
fn print_semver_reads_version_file() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    fs::write(
        root.path().join("version.json"),
        r#"{ "major": 1, "minor": 2, "patch": 3 }"#,
    )?;

    gnbuild()
        .args(["--print-version", "semver", "--project-root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::eq("1.2.3\n"));
    Ok(())
}

#[test]
fn print_semver_without_version_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;

    gnbuild()
        .args(["--print-version", "semver", "--project-root"])
        .arg(root.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("version.json"));
    Ok(())
}

#[test]
fn project_root_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    fs::write(
        root.path().join("version.json"),
        r#"{ "major": 0, "minor": 9, "patch": 1 }"#,
    )?;

    gnbuild()
        .env("GNBUILD_PROJECT_ROOT", root.path())
        .args(["--print-version", "semver"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.9.1"));
    Ok(())
}
