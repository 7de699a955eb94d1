//! MB-006: Build tasks. A named action with declared inputs and output.

use super::error::{Result, Status, FAILURE};
use std::fmt;
use std::path::PathBuf;

/// Zero-argument action returning a status (0 = success).
pub type Action<'a> = Box<dyn FnMut() -> Status + 'a>;

/// A unit of work guarded by the staleness check.
pub struct Task<'a> {
    /// Human-readable task name, used in trace lines
    pub name: String,

    /// Artifact produced; `None` for tasks that always run
    pub output: Option<PathBuf>,

    /// Declared dependencies, checked in order
    pub inputs: Vec<PathBuf>,

    action: Action<'a>,
}

impl<'a> Task<'a> {
    /// A cached task producing `output` from `inputs`.
    pub fn new(
        name: &str,
        output: impl Into<PathBuf>,
        inputs: Vec<PathBuf>,
        action: impl FnMut() -> Status + 'a,
    ) -> Self {
        Self {
            name: name.to_string(),
            output: Some(output.into()),
            inputs,
            action: Box::new(action),
        }
    }

    /// A task with no tracked output; it runs on every invocation.
    pub fn uncached(name: &str, action: impl FnMut() -> Status + 'a) -> Self {
        Self {
            name: name.to_string(),
            output: None,
            inputs: Vec::new(),
            action: Box::new(action),
        }
    }

    /// Run the action unconditionally.
    pub fn run(&mut self) -> Status {
        (self.action)()
    }

    /// Trace line naming dependencies and output: `[a, b] -> out`.
    pub fn describe(&self) -> String {
        let inputs = self
            .inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        match &self.output {
            Some(out) => format!("[{}] -> {}", inputs, out.display()),
            None => format!("[{}] -> (uncached)", inputs),
        }
    }
}

impl fmt::Debug for Task<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// Convert a fallible step into a status, reporting the error.
pub fn status_of(task: &str, result: Result<()>) -> Status {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("[{}] ERROR: {}", task, e);
            e.status()
        }
    }
}

/// Status for a process exit code; signals map to the generic failure.
pub fn exit_status(code: Option<i32>) -> Status {
    code.unwrap_or(FAILURE)
}
