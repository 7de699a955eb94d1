//! MB-007: Staleness detection. Decide whether a task's output is current.
//!
//! An output is stale when it is missing, when the build definition is at
//! least as new as it, or when any declared input is at least as new as it.
//! Ties always regenerate. An input that cannot be stat'ed is an error, never
//! a silent skip.

use super::error::{BuildError, Result};
use super::task::Task;
use super::types::Decision;
use std::path::Path;
use std::time::SystemTime;

/// Last-modified time of a path.
pub fn mtime(path: &Path) -> std::io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}

/// Timestamp of the build definition: the newest of the running executable
/// and the config file. Unreadable candidates are ignored; if none can be
/// read the epoch is returned, so only inputs decide staleness.
pub fn definition_mtime(config: Option<&Path>) -> SystemTime {
    let exe = std::env::current_exe().ok();
    exe.as_deref()
        .into_iter()
        .chain(config)
        .filter_map(|p| mtime(p).ok())
        .max()
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Decide whether `task` must run. Reads only filesystem timestamps.
pub fn decide(task: &Task, definition: SystemTime) -> Result<Decision> {
    let Some(output) = task.output.as_deref() else {
        return Ok(Decision::Uncached);
    };

    let out_time = match mtime(output) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!(task = %task.name, output = %output.display(), error = %e, "output missing");
            return Ok(Decision::MissingOutput);
        }
    };

    if definition >= out_time {
        return Ok(Decision::DefinitionChanged);
    }

    for input in &task.inputs {
        let in_time = mtime(input).map_err(|source| BuildError::MissingDependency {
            path: input.clone(),
            source,
        })?;
        if in_time >= out_time {
            return Ok(Decision::InputChanged {
                path: input.clone(),
            });
        }
    }

    Ok(Decision::Fresh)
}
