//! MB-017: Static file copy. Always runs, not cached.

use super::Project;
use crate::core::error::{BuildError, Result};
use crate::core::task::{status_of, Task};

/// Copy each configured static file from src to dist.
pub fn copy_static_files(project: &Project) -> Result<()> {
    for file in &project.config.static_files {
        let from = project.src(file);
        let to = project.dist(file);
        std::fs::copy(&from, &to).map_err(|e| BuildError::io(&from, e))?;
        tracing::debug!(from = %from.display(), to = %to.display(), "copied");
    }
    Ok(())
}

pub fn copy_task(project: &Project) -> Task<'_> {
    Task::uncached("copy_static_files", move || {
        status_of("copy_static_files", copy_static_files(project))
    })
}
