//! MB-001: Configuration, decision, and trace types.
//!
//! Defines the YAML schema of `muffin-build.yaml`, the staleness decisions
//! produced for each task, and the events written to the JSONL build trace.
//! Config types derive Serialize/Deserialize for YAML roundtripping.

use super::error::Status;
use super::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "muffin-build.yaml";

// ============================================================================
// Top-level muffin-build.yaml
// ============================================================================

/// Root configuration. Every field is optional; defaults describe the
/// standard Muffin project layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Schema version (must be "1.0")
    #[serde(default = "default_version")]
    pub version: String,

    /// Project directory layout
    #[serde(default)]
    pub paths: ProjectPaths,

    /// Files copied verbatim from src to dist
    #[serde(default = "default_static_files")]
    pub static_files: Vec<String>,

    /// External tool command lines
    #[serde(default)]
    pub tools: Tools,

    /// Write the JSONL build trace
    #[serde(default = "default_true")]
    pub trace: bool,

    /// Vocabulary override (built-in Muffin vocabulary when absent)
    #[serde(default)]
    pub vocabulary: Option<Vocabulary>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            paths: ProjectPaths::default(),
            static_files: default_static_files(),
            tools: Tools::default(),
            trace: true,
            vocabulary: None,
        }
    }
}

impl BuildConfig {
    /// The vocabulary this build renders from.
    pub fn vocabulary(&self) -> Vocabulary {
        self.vocabulary.clone().unwrap_or_else(Vocabulary::muffin)
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_static_files() -> Vec<String> {
    ["index.html", "muffin.css", "favicon.ico"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Directory layout, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPaths {
    /// Hand-written sources and generated JS modules
    #[serde(default = "default_src")]
    pub src: PathBuf,

    /// Intermediate artifacts
    #[serde(default = "default_build")]
    pub build: PathBuf,

    /// Deployable output
    #[serde(default = "default_dist")]
    pub dist: PathBuf,
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self {
            src: default_src(),
            build: default_build(),
            dist: default_dist(),
        }
    }
}

fn default_src() -> PathBuf {
    PathBuf::from("src")
}

fn default_build() -> PathBuf {
    PathBuf::from("build")
}

fn default_dist() -> PathBuf {
    PathBuf::from("dist")
}

/// External tool argv vectors. Tools run with `src` as working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tools {
    #[serde(default = "default_parser_generator")]
    pub parser_generator: Vec<String>,

    #[serde(default = "default_bundler")]
    pub bundler: Vec<String>,

    #[serde(default = "default_minifier")]
    pub minifier: Vec<String>,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            parser_generator: default_parser_generator(),
            bundler: default_bundler(),
            minifier: default_minifier(),
        }
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn default_parser_generator() -> Vec<String> {
    argv(&[
        "npx",
        "lezer-generator",
        "../build/muffin.grammar",
        "-o",
        "parser.js",
        "--noTerms",
    ])
}

fn default_bundler() -> Vec<String> {
    argv(&[
        "npx",
        "rollup",
        "frontend.js",
        "-f",
        "iife",
        "-o",
        "../build/muffin.bundle.js",
        "-p",
        "@rollup/plugin-node-resolve",
        "--output.name",
        "muffin",
    ])
}

fn default_minifier() -> Vec<String> {
    argv(&["npx", "minify", "../build/muffin.bundle.js"])
}

// ============================================================================
// Staleness decisions
// ============================================================================

/// Why a task runs, or why it does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Decision {
    /// Output does not exist (or cannot be stat'ed).
    MissingOutput,
    /// The orchestrator definition is newer than the output.
    DefinitionChanged,
    /// A declared input is as new as or newer than the output.
    InputChanged { path: PathBuf },
    /// Caller asked to ignore the cache.
    Forced,
    /// Task declares no output and always runs.
    Uncached,
    /// Output is up to date.
    Fresh,
}

impl Decision {
    /// Whether the task's action must run.
    pub fn should_run(&self) -> bool {
        !matches!(self, Self::Fresh)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOutput => write!(f, "output missing"),
            Self::DefinitionChanged => write!(f, "build definition changed"),
            Self::InputChanged { path } => write!(f, "{} changed", path.display()),
            Self::Forced => write!(f, "forced"),
            Self::Uncached => write!(f, "always runs"),
            Self::Fresh => write!(f, "up to date"),
        }
    }
}

/// Structured outcome of one task invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task name
    pub task: String,

    /// Staleness decision; `None` when the check itself failed
    pub decision: Option<Decision>,

    /// Status the task reported
    pub status: Status,
}

impl TaskRecord {
    /// Whether the task was skipped as a cache hit.
    pub fn cached(&self) -> bool {
        self.decision == Some(Decision::Fresh)
    }
}

/// Result of running a pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// First non-zero task status, or 0
    pub status: Status,

    /// One record per task that was attempted, in order
    pub records: Vec<TaskRecord>,
}

impl PipelineReport {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Names of tasks whose action actually ran.
    pub fn ran(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.decision.as_ref().is_some_and(Decision::should_run))
            .map(|r| r.task.as_str())
            .collect()
    }

    /// Names of tasks served from cache.
    pub fn cached(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.cached())
            .map(|r| r.task.as_str())
            .collect()
    }
}

// ============================================================================
// Build trace events
// ============================================================================

/// Event written to the JSONL build trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BuildEvent {
    BuildStarted {
        run_id: String,
        version: String,
    },
    TaskCached {
        task: String,
    },
    TaskCompleted {
        task: String,
        decision: Decision,
        status: Status,
        duration_seconds: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output_hash: Option<String>,
    },
    TaskFailed {
        task: String,
        status: Status,
        error: String,
    },
    BuildCompleted {
        run_id: String,
        status: Status,
        tasks_run: u32,
        tasks_cached: u32,
        total_seconds: f64,
    },
}

/// Timestamped event wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampedEvent {
    pub ts: String,
    #[serde(flatten)]
    pub event: BuildEvent,
}
