//! Build steps of the Muffin project, wired as pipeline tasks.
//!
//! Order: grammar → parser → autocomplete → bundle → minify → static files.

pub mod frontend;
pub mod generate;
pub mod statics;

use crate::core::error::{BuildError, Result};
use crate::core::task::Task;
use crate::core::types::BuildConfig;
use crate::core::vocabulary::Vocabulary;
use std::path::{Path, PathBuf};

/// Hand-written and generated modules the bundler reads.
pub const BUNDLE_SOURCES: [&str; 5] = [
    "frontend.js",
    "editor.js",
    "muffin.js",
    "parser.js",
    "autocomplete.js",
];

/// A project root plus its build configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: BuildConfig,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: BuildConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.src)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.build)
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.dist)
    }

    pub fn src(&self, name: &str) -> PathBuf {
        self.src_dir().join(name)
    }

    pub fn build(&self, name: &str) -> PathBuf {
        self.build_dir().join(name)
    }

    pub fn dist(&self, name: &str) -> PathBuf {
        self.dist_dir().join(name)
    }

    pub fn grammar_template(&self) -> PathBuf {
        self.src("muffin.grammar.in")
    }

    pub fn grammar(&self) -> PathBuf {
        self.build("muffin.grammar")
    }

    pub fn parser_module(&self) -> PathBuf {
        self.src("parser.js")
    }

    pub fn autocomplete_module(&self) -> PathBuf {
        self.src("autocomplete.js")
    }

    pub fn bundle(&self) -> PathBuf {
        self.build("muffin.bundle.js")
    }

    pub fn minified_bundle(&self) -> PathBuf {
        self.dist("muffin.bundle.min.js")
    }

    pub fn bundle_inputs(&self) -> Vec<PathBuf> {
        BUNDLE_SOURCES.iter().map(|f| self.src(f)).collect()
    }

    /// Create the build and dist directories; existing ones are fine.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.build_dir(), self.dist_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| BuildError::io(&dir, e))?;
        }
        Ok(())
    }
}

/// The full Muffin build, in execution order.
pub fn muffin_pipeline<'a>(project: &'a Project, vocabulary: &'a Vocabulary) -> Vec<Task<'a>> {
    vec![
        generate::grammar_task(project, vocabulary),
        frontend::parser_task(project),
        generate::autocomplete_task(project, vocabulary),
        frontend::bundle_task(project),
        frontend::minify_task(project),
        statics::copy_task(project),
    ]
}

/// Remove generated build and dist directories.
pub fn clean(project: &Project) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for dir in [project.build_dir(), project.dist_dir()] {
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| BuildError::io(&dir, e))?;
            removed.push(dir);
        }
    }
    Ok(removed)
}

/// Relative display path for trace output.
pub fn relative<'p>(project: &Project, path: &'p Path) -> &'p Path {
    path.strip_prefix(&project.root).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mb014_project_paths() {
        let p = Project::new("/work", BuildConfig::default());
        assert_eq!(p.grammar_template(), PathBuf::from("/work/src/muffin.grammar.in"));
        assert_eq!(p.grammar(), PathBuf::from("/work/build/muffin.grammar"));
        assert_eq!(p.minified_bundle(), PathBuf::from("/work/dist/muffin.bundle.min.js"));
        assert_eq!(p.bundle_inputs().len(), 5);
        assert_eq!(p.bundle_inputs()[3], PathBuf::from("/work/src/parser.js"));
        assert_eq!(relative(&p, &p.grammar()), Path::new("build/muffin.grammar"));
    }

    #[test]
    fn test_mb014_pipeline_order() {
        let p = Project::new("/work", BuildConfig::default());
        let v = Vocabulary::muffin();
        let names: Vec<_> = muffin_pipeline(&p, &v)
            .iter()
            .map(|t| t.name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                "build_grammar",
                "build_parser",
                "build_autocomplete",
                "build_bundle",
                "minify_bundle",
                "copy_static_files",
            ]
        );
    }

    #[test]
    fn test_mb014_ensure_dirs_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let p = Project::new(dir.path(), BuildConfig::default());
        p.ensure_dirs().unwrap();
        p.ensure_dirs().unwrap();
        assert!(p.build_dir().is_dir());
        assert!(p.dist_dir().is_dir());
    }

    #[test]
    fn test_mb014_clean_removes_generated_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let p = Project::new(dir.path(), BuildConfig::default());
        p.ensure_dirs().unwrap();
        std::fs::write(p.grammar(), "g").unwrap();
        let removed = clean(&p).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!p.build_dir().exists());
        assert!(clean(&p).unwrap().is_empty());
    }
}
