//! External tool execution.
//!
//! Every subprocess goes through [`run_streaming`] or [`run_captured`] so a
//! non-zero exit always becomes [`Error::ToolFailed`] with the tool name,
//! exit code and captured output.

use crate::bundler::error::{Error, Result};
use std::process::Output;
use tokio::process::Command;

/// Renders a command line for logging.
pub fn display_command(command: &Command) -> String {
    let std_cmd = command.as_std();
    std::iter::once(std_cmd.get_program())
        .chain(std_cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs a tool with inherited stdio and waits for it to exit.
///
/// Output goes straight to the terminal, so a failure carries no captured
/// output.
pub async fn run_streaming(tool: &str, command: &mut Command) -> Result<()> {
    log::info!("[*] Execute command: {}", display_command(command));

    let status = command.status().await.map_err(|e| Error::CommandFailed {
        command: tool.to_string(),
        error: e,
    })?;

    if !status.success() {
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            code: status.code(),
            output: String::new(),
        });
    }

    Ok(())
}

/// Runs a tool, capturing stdout and stderr.
///
/// On failure stderr is reported (stdout if stderr is empty).
pub async fn run_captured(tool: &str, command: &mut Command) -> Result<Output> {
    log::debug!("[*] Execute command: {}", display_command(command));

    let output = command.output().await.map_err(|e| Error::CommandFailed {
        command: tool.to_string(),
        error: e,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let captured = if stderr.trim().is_empty() {
            String::from_utf8_lossy(&output.stdout).into_owned()
        } else {
            stderr.into_owned()
        };
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            code: output.status.code(),
            output: captured,
        });
    }

    Ok(output)
}

/// Runs a tool and returns its trimmed stdout as UTF-8 (lossy).
pub async fn run_stdout(tool: &str, command: &mut Command) -> Result<String> {
    let output = run_captured(tool, command).await?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captured_failure_reports_code_and_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo boom >&2; exit 3"]);
        let err = run_captured("sh", &mut cmd).await.unwrap_err();
        match err {
            Error::ToolFailed { tool, code, output } => {
                assert_eq!(tool, "sh");
                assert_eq!(code, Some(3));
                assert_eq!(output.trim(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn stdout_is_trimmed() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "printf '  heads/main-1-gabc \\n'"]);
        assert_eq!(run_stdout("sh", &mut cmd).await.unwrap(), "heads/main-1-gabc");
    }

    #[tokio::test]
    async fn missing_program_is_command_failed() {
        let mut cmd = Command::new("definitely-not-a-real-tool-gnbuild");
        let err = run_streaming("missing", &mut cmd).await.unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[test]
    fn command_line_rendering() {
        let mut cmd = Command::new("xcrun");
        cmd.args(["lipo", "-info", "/tmp/lib.a"]);
        assert_eq!(display_command(&cmd), "xcrun lipo -info /tmp/lib.a");
    }
}
