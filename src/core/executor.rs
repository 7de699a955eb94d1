//! MB-008: Pipeline executor. Run tasks in order, stop at the first failure.
//!
//! Each task goes through: trace line → staleness decision → action (or
//! cache hit) → record. A non-zero status ends the run and becomes the
//! pipeline's status. Artifacts written by earlier tasks are kept; the next
//! invocation skips them through the staleness check.

use super::error::{BuildError, Status, FAILURE};
use super::staleness;
use super::task::Task;
use super::types::{BuildEvent, Decision, PipelineReport, TaskRecord};
use crate::trace::eventlog::{self, EventLog};
use crate::trace::hasher;
use std::time::{Instant, SystemTime};

/// Per-invocation settings shared by every task.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Timestamp of the build definition (see [`staleness::definition_mtime`])
    pub definition_mtime: SystemTime,

    /// Run every cached task regardless of timestamps
    pub force: bool,

    /// JSONL trace sink
    pub log: EventLog,
}

impl BuildContext {
    pub fn new(definition_mtime: SystemTime) -> Self {
        Self {
            definition_mtime,
            force: false,
            log: EventLog::disabled(),
        }
    }
}

/// Decide, run if stale, and record a single task.
pub fn run_task(task: &mut Task, ctx: &BuildContext) -> TaskRecord {
    println!("[{}] {}", task.name, task.describe());

    let decision = match staleness::decide(task, ctx.definition_mtime) {
        Ok(Decision::Fresh) if ctx.force => Decision::Forced,
        Ok(d) => d,
        Err(e) => return record_error(task, ctx, &e),
    };

    if !decision.should_run() {
        println!("[{}] using cache", task.name);
        ctx.log.record(BuildEvent::TaskCached {
            task: task.name.clone(),
        });
        return TaskRecord {
            task: task.name.clone(),
            decision: Some(decision),
            status: 0,
        };
    }

    tracing::debug!(task = %task.name, reason = %decision, "running");
    let start = Instant::now();
    let status = task.run();
    let duration = start.elapsed().as_secs_f64();

    if status == 0 {
        let output_hash = task
            .output
            .as_deref()
            .and_then(|out| hasher::hash_file(out).ok());
        ctx.log.record(BuildEvent::TaskCompleted {
            task: task.name.clone(),
            decision: decision.clone(),
            status,
            duration_seconds: duration,
            output_hash,
        });
    } else {
        ctx.log.record(BuildEvent::TaskFailed {
            task: task.name.clone(),
            status,
            error: format!("{} exited with status {}", task.name, status),
        });
    }

    TaskRecord {
        task: task.name.clone(),
        decision: Some(decision),
        status,
    }
}

fn record_error(task: &Task, ctx: &BuildContext, error: &BuildError) -> TaskRecord {
    eprintln!("[{}] ERROR: {}", task.name, error);
    let status = error.status();
    ctx.log.record(BuildEvent::TaskFailed {
        task: task.name.clone(),
        status,
        error: error.to_string(),
    });
    TaskRecord {
        task: task.name.clone(),
        decision: None,
        status,
    }
}

/// Run tasks left to right. Stops at the first non-zero status and returns
/// it; later tasks are never attempted.
pub fn run(tasks: Vec<Task>, ctx: &BuildContext) -> PipelineReport {
    let start = Instant::now();
    let run_id = eventlog::generate_run_id();
    ctx.log.record(BuildEvent::BuildStarted {
        run_id: run_id.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    let mut report = PipelineReport::default();
    for mut task in tasks {
        let record = run_task(&mut task, ctx);
        let status = record.status;
        report.records.push(record);
        if status != 0 {
            report.status = status;
            break;
        }
    }

    ctx.log.record(BuildEvent::BuildCompleted {
        run_id,
        status: report.status,
        tasks_run: report.ran().len() as u32,
        tasks_cached: report.cached().len() as u32,
        total_seconds: start.elapsed().as_secs_f64(),
    });

    report
}

/// Staleness decision for every task, without running anything.
///
/// Unlike [`run`], a missing dependency does not stop the plan; later tasks
/// are still evaluated against the current filesystem.
pub fn plan(tasks: &[Task], ctx: &BuildContext) -> Vec<(String, Result<Decision, BuildError>)> {
    tasks
        .iter()
        .map(|task| {
            let decision = match staleness::decide(task, ctx.definition_mtime) {
                Ok(Decision::Fresh) if ctx.force => Ok(Decision::Forced),
                other => other,
            };
            (task.name.clone(), decision)
        })
        .collect()
}

/// Pipeline status for a plan: 0 if every decision could be made.
pub fn plan_status(plan: &[(String, Result<Decision, BuildError>)]) -> Status {
    if plan.iter().all(|(_, d)| d.is_ok()) {
        0
    } else {
        FAILURE
    }
}
