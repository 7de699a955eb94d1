//! MB-012: External tool execution. Parser generator, bundler, minifier.
//!
//! Tools run as blocking subprocesses from an argv vector (no shell). The
//! orchestrator waits for exit before the next task starts, so every output
//! file is complete by the time a dependent task stats it.

pub mod process;

use crate::core::error::{BuildError, Result};

/// Output from a captured tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Split a configured command into program and arguments.
pub fn split_command(cmd: &[String]) -> Result<(&str, &[String])> {
    match cmd.split_first() {
        Some((program, args)) if !program.trim().is_empty() => Ok((program.as_str(), args)),
        _ => Err(BuildError::Tool {
            tool: "(none)".to_string(),
            message: "empty command line".to_string(),
        }),
    }
}

/// Human-readable command line for trace output.
pub fn display_command(cmd: &[String]) -> String {
    cmd.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mb012_split_command() {
        let cmd = vec!["npx".to_string(), "rollup".to_string()];
        let (program, args) = split_command(&cmd).unwrap();
        assert_eq!(program, "npx");
        assert_eq!(args, &["rollup".to_string()]);
    }

    #[test]
    fn test_mb012_split_empty_command() {
        assert!(split_command(&[]).is_err());
        assert!(split_command(&[" ".to_string()]).is_err());
    }

    #[test]
    fn test_mb012_output_success() {
        let ok = ToolOutput { exit_code: Some(0), stdout: b"x".to_vec(), stderr: String::new() };
        assert!(ok.success());
        let fail = ToolOutput { exit_code: Some(1), stdout: vec![], stderr: "err".into() };
        assert!(!fail.success());
        let sig = ToolOutput { exit_code: None, stdout: vec![], stderr: String::new() };
        assert!(!sig.success());
    }

    #[test]
    fn test_mb012_display_command() {
        let cmd = vec!["npx".to_string(), "minify".to_string(), "a.js".to_string()];
        assert_eq!(display_command(&cmd), "npx minify a.js");
    }
}
