//! MB-016: Front-end tool steps. Parser generator, bundler, minifier.

use super::Project;
use crate::core::error::{BuildError, Result, Status, FAILURE};
use crate::core::task::{status_of, Task};
use crate::tools::{self, process};
use std::io::Write;
use std::path::Path;

/// `build/muffin.grammar` → `src/parser.js` via the parser generator.
pub fn parser_task(project: &Project) -> Task<'_> {
    Task::new(
        "build_parser",
        project.parser_module(),
        vec![project.grammar()],
        move || run_step("build_parser", &project.config.tools.parser_generator, project),
    )
}

/// Front-end sources → `build/muffin.bundle.js` via the bundler.
pub fn bundle_task(project: &Project) -> Task<'_> {
    Task::new(
        "build_bundle",
        project.bundle(),
        project.bundle_inputs(),
        move || run_step("build_bundle", &project.config.tools.bundler, project),
    )
}

/// `build/muffin.bundle.js` → `dist/muffin.bundle.min.js` via the minifier.
pub fn minify_task(project: &Project) -> Task<'_> {
    Task::new(
        "minify_bundle",
        project.minified_bundle(),
        vec![project.bundle()],
        move || {
            let output = project.minified_bundle();
            status_of(
                "minify_bundle",
                minify(&project.config.tools.minifier, &project.src_dir(), &output),
            )
        },
    )
}

fn run_step(name: &str, cmd: &[String], project: &Project) -> Status {
    match process::run_tool(cmd, &project.src_dir()) {
        Ok(status) => {
            if status != 0 {
                eprintln!(
                    "[{}] {} exited with status {}",
                    name,
                    tools::display_command(cmd),
                    status
                );
            }
            status
        }
        Err(e) => status_of(name, Err(e)),
    }
}

/// Run the minifier and write its stdout to `output`. Any stderr output or
/// an empty stdout counts as failure; stderr is forwarded, never dropped.
pub fn minify(cmd: &[String], cwd: &Path, output: &Path) -> Result<()> {
    let out = process::capture_tool(cmd, cwd)?;
    let tool = tools::display_command(cmd);

    if !out.stderr.is_empty() {
        let _ = std::io::stderr().write_all(out.stderr.as_bytes());
        return Err(BuildError::Tool {
            tool,
            message: "wrote to stderr".to_string(),
        });
    }
    if !out.success() {
        return Err(BuildError::Tool {
            tool,
            message: format!("exited with status {}", out.exit_code.unwrap_or(FAILURE)),
        });
    }
    if out.stdout.is_empty() {
        return Err(BuildError::Tool {
            tool,
            message: "produced no output".to_string(),
        });
    }

    std::fs::write(output, &out.stdout).map_err(|e| BuildError::io(output, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::executor::{run, BuildContext};
    use crate::core::staleness::tests::at;
    use crate::core::types::BuildConfig;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    fn project_with(tools: impl FnOnce(&mut BuildConfig)) -> (tempfile::TempDir, Project) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BuildConfig::default();
        tools(&mut config);
        let project = Project::new(dir.path(), config);
        std::fs::create_dir_all(project.src_dir()).unwrap();
        project.ensure_dirs().unwrap();
        (dir, project)
    }

    #[test]
    fn test_mb016_minify_writes_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("min.js");
        minify(&sh("printf 'var a=1;'"), dir.path(), &out).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "var a=1;");
    }

    #[test]
    fn test_mb016_minify_empty_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("min.js");
        let err = minify(&sh("true"), dir.path(), &out).unwrap_err();
        assert!(err.to_string().contains("no output"));
        assert!(!out.exists());
    }

    #[test]
    fn test_mb016_minify_stderr_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("min.js");
        let err = minify(&sh("printf x; echo oops >&2"), dir.path(), &out).unwrap_err();
        assert!(matches!(err, BuildError::Tool { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_mb016_parser_status_propagates() {
        let (_dir, project) = project_with(|c| c.tools.parser_generator = sh("exit 3"));
        std::fs::write(project.grammar(), "g").unwrap();
        let report = run(vec![parser_task(&project)], &BuildContext::new(at(0)));
        assert_eq!(report.status, 3);
    }

    #[test]
    fn test_mb016_parser_runs_in_src() {
        let (_dir, project) =
            project_with(|c| c.tools.parser_generator = sh("cat ../build/muffin.grammar > parser.js"));
        std::fs::write(project.grammar(), "grammar text").unwrap();
        let report = run(vec![parser_task(&project)], &BuildContext::new(at(0)));
        assert_eq!(report.status, 0);
        assert_eq!(
            std::fs::read_to_string(project.parser_module()).unwrap(),
            "grammar text"
        );
    }

    #[test]
    fn test_mb016_bundle_missing_source_is_fatal() {
        let (_dir, project) = project_with(|c| c.tools.bundler = sh("exit 0"));
        // Output exists, so inputs are stat'ed; none of them exist
        std::fs::write(project.bundle(), "b").unwrap();
        let report = run(vec![bundle_task(&project)], &BuildContext::new(at(0)));
        assert_eq!(report.status, 1);
        assert_eq!(report.records[0].decision, None);
    }

    #[test]
    fn test_mb016_minify_task_end_to_end() {
        let (_dir, project) = project_with(|c| c.tools.minifier = sh("tr -d ' ' < ../build/muffin.bundle.js"));
        std::fs::write(project.bundle(), "var a = 1;").unwrap();
        let report = run(vec![minify_task(&project)], &BuildContext::new(at(0)));
        assert_eq!(report.status, 0);
        assert_eq!(
            std::fs::read_to_string(project.minified_bundle()).unwrap(),
            "vara=1;"
        );
    }
}
