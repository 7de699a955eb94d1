//! MB-018: CLI subcommands. Build, plan, grammar, autocomplete, validate, init, clean.

use crate::core::error::{BuildError, Result, Status, FAILURE};
use crate::core::executor::{self, BuildContext};
use crate::core::types::{BuildConfig, CONFIG_FILE};
use crate::core::{autocomplete, grammar, parser, staleness};
use crate::steps::{self, Project};
use crate::trace::eventlog::{self, EventLog};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

/// Options shared by commands that operate on a project.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Path to muffin-build.yaml (default: <root>/muffin-build.yaml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Default for ProjectArgs {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            config: None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the build pipeline (default)
    Build {
        #[command(flatten)]
        project: ProjectArgs,

        /// Rebuild every task regardless of timestamps
        #[arg(long)]
        force: bool,
    },

    /// Show which tasks would run, without running them
    Plan {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Render the grammar template to stdout
    Grammar {
        #[command(flatten)]
        project: ProjectArgs,

        /// Template to render (default: <src>/muffin.grammar.in)
        #[arg(short, long)]
        template: Option<PathBuf>,
    },

    /// Print the autocomplete module to stdout
    Autocomplete {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print all completions as JSON instead of the JS module
        #[arg(long)]
        json: bool,
    },

    /// Validate config, vocabulary, and grammar template
    Validate {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Write a default muffin-build.yaml
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Remove the build and dist directories
    Clean {
        #[command(flatten)]
        project: ProjectArgs,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Self::Build {
            project: ProjectArgs::default(),
            force: false,
        }
    }
}

/// Dispatch a CLI command. Returns the process exit status.
pub fn dispatch(cmd: Commands) -> Result<Status> {
    match cmd {
        Commands::Build { project, force } => cmd_build(&project, force),
        Commands::Plan { project } => cmd_plan(&project),
        Commands::Grammar { project, template } => cmd_grammar(&project, template.as_deref()),
        Commands::Autocomplete { project, json } => cmd_autocomplete(&project, json),
        Commands::Validate { project } => cmd_validate(&project),
        Commands::Init { path } => cmd_init(&path),
        Commands::Clean { project } => cmd_clean(&project),
    }
}

/// Load config and compute the build definition timestamp.
fn open_project(args: &ProjectArgs) -> Result<(Project, BuildContext)> {
    let (config, config_path) = parser::load_config(&args.root, args.config.as_deref())?;
    let errors = parser::validate_config(&config);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        return Err(BuildError::Config("validation failed".to_string()));
    }

    let project = Project::new(&args.root, config);
    let mut ctx = BuildContext::new(staleness::definition_mtime(config_path.as_deref()));
    if project.config.trace {
        ctx.log = EventLog::new(Some(eventlog::event_log_path(&project.build_dir())));
    }
    Ok((project, ctx))
}

fn cmd_build(args: &ProjectArgs, force: bool) -> Result<Status> {
    let (project, mut ctx) = open_project(args)?;
    ctx.force = force;
    project.ensure_dirs()?;

    let vocabulary = project.config.vocabulary();
    let tasks = steps::muffin_pipeline(&project, &vocabulary);
    let report = executor::run(tasks, &ctx);

    println!();
    let ran = report.ran().len();
    let cached = report.cached().len();
    if report.success() {
        println!("Build complete: {} ran, {} cached.", ran, cached);
    } else {
        let failed = report
            .records
            .last()
            .map(|r| r.task.as_str())
            .unwrap_or("?");
        println!(
            "Build FAILED at {} (status {}): {} ran, {} cached.",
            failed, report.status, ran, cached
        );
    }
    Ok(report.status)
}

fn cmd_plan(args: &ProjectArgs) -> Result<Status> {
    let (project, ctx) = open_project(args)?;
    let vocabulary = project.config.vocabulary();
    let tasks = steps::muffin_pipeline(&project, &vocabulary);
    let plan = executor::plan(&tasks, &ctx);

    let mut stale = 0;
    for (task, (name, decision)) in tasks.iter().zip(&plan) {
        let target = task
            .output
            .as_deref()
            .map(|p| steps::relative(&project, p).display().to_string())
            .unwrap_or_else(|| "-".to_string());
        match decision {
            Ok(d) if d.should_run() => {
                stale += 1;
                println!("  + {} → {} ({})", name, target, d);
            }
            Ok(d) => println!("    {} → {} ({})", name, target, d),
            Err(e) => println!("  ! {} → {} (ERROR: {})", name, target, e),
        }
    }
    println!();
    println!("Plan: {} to run, {} up to date.", stale, plan.len() - stale);
    Ok(executor::plan_status(&plan))
}

fn cmd_grammar(args: &ProjectArgs, template: Option<&Path>) -> Result<Status> {
    let (project, _ctx) = open_project(args)?;
    let path = template
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project.grammar_template());
    let source = std::fs::read_to_string(&path).map_err(|e| BuildError::io(&path, e))?;
    let rendered = grammar::render(&source, &project.config.vocabulary());
    for placeholder in &rendered.missing {
        eprintln!("  WARNING: {} not found in {}", placeholder, path.display());
    }
    print!("{}", rendered.text);
    Ok(0)
}

fn cmd_autocomplete(args: &ProjectArgs, json: bool) -> Result<Status> {
    let (project, _ctx) = open_project(args)?;
    let vocabulary = project.config.vocabulary();
    if json {
        let names = autocomplete::all_names(&vocabulary);
        let out = serde_json::to_string_pretty(&names)
            .map_err(|e| BuildError::Serialize(e.to_string()))?;
        println!("{}", out);
    } else {
        print!("{}", autocomplete::render_module(&vocabulary));
    }
    Ok(0)
}

fn cmd_validate(args: &ProjectArgs) -> Result<Status> {
    let (config, _) = parser::load_config(&args.root, args.config.as_deref())?;
    let project = Project::new(&args.root, config);

    let mut errors = parser::validate_config(&project.config);
    if project.config.vocabulary.is_none() {
        errors.extend(parser::validate_vocabulary(&project.config.vocabulary()));
    }

    let template = project.grammar_template();
    match std::fs::read_to_string(&template) {
        Ok(text) => errors.extend(parser::validate_template(&text)),
        Err(e) => eprintln!("  WARNING: cannot read {}: {}", template.display(), e),
    }

    if errors.is_empty() {
        let v = project.config.vocabulary();
        println!(
            "OK: {} key phrases, {} identifier pairs, {} static files",
            v.key_phrases.len(),
            v.identifier_pairs.len(),
            project.config.static_files.len()
        );
        Ok(0)
    } else {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        eprintln!("{} validation error(s)", errors.len());
        Ok(FAILURE)
    }
}

fn cmd_init(path: &Path) -> Result<Status> {
    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        return Err(BuildError::Config(format!(
            "{} already exists",
            config_path.display()
        )));
    }
    std::fs::create_dir_all(path).map_err(|e| BuildError::io(path, e))?;

    let yaml = serde_yaml_ng::to_string(&BuildConfig::default())
        .map_err(|e| BuildError::Serialize(e.to_string()))?;
    std::fs::write(&config_path, yaml).map_err(|e| BuildError::io(&config_path, e))?;

    println!("Initialized muffin-build config at {}", config_path.display());
    Ok(0)
}

fn cmd_clean(args: &ProjectArgs) -> Result<Status> {
    let (config, _) = parser::load_config(&args.root, args.config.as_deref())?;
    let project = Project::new(&args.root, config);
    for dir in steps::clean(&project)? {
        println!("Removed {}", dir.display());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(root: &Path) -> ProjectArgs {
        ProjectArgs {
            root: root.to_path_buf(),
            config: None,
        }
    }

    /// A project whose external tools are small shell commands.
    fn fake_project(root: &Path) {
        let src = root.join("src");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(
            src.join("muffin.grammar.in"),
            "@top Recipe { }\nOp { %operators% }\nOrd { %ordinal% }\nKw { %misc_keywords% }\nId { %identifiers% }\n",
        )
        .unwrap();
        for f in ["frontend.js", "editor.js", "muffin.js", "index.html", "muffin.css", "favicon.ico"] {
            std::fs::write(src.join(f), format!("// {}\n", f)).unwrap();
        }
        let yaml = r#"
version: "1.0"
tools:
  parser_generator: [sh, -c, "cp ../build/muffin.grammar parser.js"]
  bundler: [sh, -c, "cat frontend.js editor.js muffin.js parser.js autocomplete.js > ../build/muffin.bundle.js"]
  minifier: [sh, -c, "tr -d ' ' < ../build/muffin.bundle.js"]
"#;
        std::fs::write(root.join(CONFIG_FILE), yaml).unwrap();
    }

    #[test]
    fn test_mb018_build_then_cached() {
        let dir = tempfile::tempdir().unwrap();
        fake_project(dir.path());

        let status = cmd_build(&args(dir.path()), false).unwrap();
        assert_eq!(status, 0);
        let min = dir.path().join("dist/muffin.bundle.min.js");
        let first = std::fs::read(&min).unwrap();
        assert!(!first.is_empty());
        assert!(dir.path().join("dist/favicon.ico").exists());
        assert!(dir.path().join("build/events.jsonl").exists());

        let status = cmd_build(&args(dir.path()), false).unwrap();
        assert_eq!(status, 0);
        assert_eq!(std::fs::read(&min).unwrap(), first);

        let events = eventlog::read_events(&dir.path().join("build/events.jsonl")).unwrap();
        let last = events.last().unwrap();
        assert!(matches!(
            last.event,
            crate::core::types::BuildEvent::BuildCompleted { status: 0, .. }
        ));
    }

    #[test]
    fn test_mb018_build_tool_failure_status() {
        let dir = tempfile::tempdir().unwrap();
        fake_project(dir.path());
        let yaml = "tools:\n  parser_generator: [sh, -c, \"exit 4\"]\n";
        std::fs::write(dir.path().join(CONFIG_FILE), yaml).unwrap();
        let status = cmd_build(&args(dir.path()), false).unwrap();
        assert_eq!(status, 4);
        // Grammar from the successful first task stays on disk
        assert!(dir.path().join("build/muffin.grammar").exists());
        assert!(!dir.path().join("src/autocomplete.js").exists());
    }

    #[test]
    fn test_mb018_plan_on_fresh_project() {
        let dir = tempfile::tempdir().unwrap();
        fake_project(dir.path());
        // Nothing built yet: every output is missing, so inputs are never stat'ed
        assert_eq!(cmd_plan(&args(dir.path())).unwrap(), 0);
    }

    #[test]
    fn test_mb018_validate_fake_project() {
        let dir = tempfile::tempdir().unwrap();
        fake_project(dir.path());
        assert_eq!(cmd_validate(&args(dir.path())).unwrap(), 0);
    }

    #[test]
    fn test_mb018_validate_reports_template_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        fake_project(dir.path());
        std::fs::write(dir.path().join("src/muffin.grammar.in"), "%operators%").unwrap();
        assert_eq!(cmd_validate(&args(dir.path())).unwrap(), FAILURE);
    }

    #[test]
    fn test_mb018_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cmd_init(dir.path()).unwrap(), 0);
        let (config, _) = parser::load_config(dir.path(), None).unwrap();
        assert_eq!(config.version, "1.0");
        assert!(cmd_init(dir.path()).is_err());
    }

    #[test]
    fn test_mb018_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "version: \"9\"\n").unwrap();
        assert!(matches!(
            cmd_build(&args(dir.path()), false),
            Err(BuildError::Config(_))
        ));
    }

    #[test]
    fn test_mb018_clean() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("build")).unwrap();
        assert_eq!(cmd_clean(&args(dir.path())).unwrap(), 0);
        assert!(!dir.path().join("build").exists());
    }
}
