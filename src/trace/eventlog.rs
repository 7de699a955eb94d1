//! MB-011: Append-only JSONL build trace.

use crate::core::error::{BuildError, Result};
use crate::core::types::{BuildEvent, TimestampedEvent};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the trace inside the build directory.
pub const EVENT_LOG: &str = "events.jsonl";

/// RFC 3339 UTC timestamp with second precision.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Generate a run ID.
pub fn generate_run_id() -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default()
        .unsigned_abs();
    format!("b-{:012x}", nanos & 0xFFFF_FFFF_FFFF)
}

/// Derive the event log path for a build directory.
pub fn event_log_path(build_dir: &Path) -> PathBuf {
    build_dir.join(EVENT_LOG)
}

/// Append one event to the log at `path`.
pub fn append_event(path: &Path, event: BuildEvent) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }

    let te = TimestampedEvent {
        ts: now_rfc3339(),
        event,
    };
    let json = serde_json::to_string(&te).map_err(|e| BuildError::Serialize(e.to_string()))?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| BuildError::io(path, e))?;

    writeln!(file, "{}", json).map_err(|e| BuildError::io(path, e))?;

    Ok(())
}

/// Read every event back, oldest first.
pub fn read_events(path: &Path) -> Result<Vec<TimestampedEvent>> {
    let content = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(|e| BuildError::Serialize(e.to_string())))
        .collect()
}

/// Event sink for one build. A disabled log drops every event.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record an event. Trace failures never fail the build.
    pub fn record(&self, event: BuildEvent) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = append_event(path, event) {
            tracing::warn!(error = %e, "cannot write build trace");
        }
    }
}
