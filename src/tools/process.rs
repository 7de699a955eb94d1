//! MB-013: Blocking local subprocess execution.

use super::{split_command, ToolOutput};
use crate::core::error::{BuildError, Result, Status};
use crate::core::task::exit_status;
use std::path::Path;
use std::process::{Command, Stdio};

fn command(cmd: &[String], cwd: &Path) -> Result<(Command, String)> {
    let (program, args) = split_command(cmd)?;
    let mut command = Command::new(program);
    command.args(args).current_dir(cwd);
    Ok((command, program.to_string()))
}

/// Run a tool with inherited stdio and wait for it. Returns its exit status;
/// a process killed by a signal reports the generic failure status.
pub fn run_tool(cmd: &[String], cwd: &Path) -> Result<Status> {
    let (mut command, program) = command(cmd, cwd)?;
    tracing::debug!(cwd = %cwd.display(), command = %super::display_command(cmd), "spawning tool");
    let status = command
        .stdin(Stdio::null())
        .status()
        .map_err(|e| BuildError::Tool {
            tool: program,
            message: format!("failed to spawn: {}", e),
        })?;
    Ok(exit_status(status.code()))
}

/// Run a tool capturing stdout and stderr, and wait for it.
pub fn capture_tool(cmd: &[String], cwd: &Path) -> Result<ToolOutput> {
    let (mut command, program) = command(cmd, cwd)?;
    tracing::debug!(cwd = %cwd.display(), command = %super::display_command(cmd), "spawning tool (captured)");
    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| BuildError::Tool {
            tool: program,
            message: format!("failed to spawn: {}", e),
        })?;

    Ok(ToolOutput {
        exit_code: output.status.code(),
        stdout: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_mb013_run_tool_status() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run_tool(&sh("exit 0"), dir.path()).unwrap(), 0);
        assert_eq!(run_tool(&sh("exit 42"), dir.path()).unwrap(), 42);
    }

    #[test]
    fn test_mb013_run_tool_uses_cwd() {
        let dir = tempfile::tempdir().unwrap();
        run_tool(&sh("echo hi > marker.txt"), dir.path()).unwrap();
        assert!(dir.path().join("marker.txt").exists());
    }

    #[test]
    fn test_mb013_run_tool_signal_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let status = run_tool(&sh("kill -9 $$"), dir.path()).unwrap();
        assert_eq!(status, 1);
    }

    #[test]
    fn test_mb013_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = vec!["muffin-build-no-such-tool".to_string()];
        match run_tool(&cmd, dir.path()) {
            Err(BuildError::Tool { tool, .. }) => assert_eq!(tool, "muffin-build-no-such-tool"),
            other => panic!("expected tool error, got {:?}", other),
        }
    }

    #[test]
    fn test_mb013_capture_tool_streams() {
        let dir = tempfile::tempdir().unwrap();
        let out = capture_tool(&sh("printf min; echo warn >&2"), dir.path()).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, b"min");
        assert_eq!(out.stderr.trim(), "warn");
    }
}
