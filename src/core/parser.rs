//! MB-009: Config loading and validation.
//!
//! Parses muffin-build.yaml and validates structural constraints:
//! - Version must be "1.0"
//! - Tool command lines must not be empty
//! - Vocabulary phrases must be non-empty and unique within their category
//! - The grammar template must carry each placeholder exactly once

use super::error::{BuildError, Result};
use super::grammar::PLACEHOLDERS;
use super::types::{BuildConfig, CONFIG_FILE};
use super::vocabulary::Vocabulary;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

fn error(message: String) -> ValidationError {
    ValidationError { message }
}

/// Parse a muffin-build.yaml file from disk.
pub fn parse_config_file(path: &Path) -> Result<BuildConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| BuildError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    parse_config(&content)
}

/// Parse a muffin-build.yaml from a string.
pub fn parse_config(yaml: &str) -> Result<BuildConfig> {
    serde_yaml_ng::from_str(yaml).map_err(|e| BuildError::Config(format!("YAML parse error: {}", e)))
}

/// Load the config for a project.
///
/// An explicit path must exist. Otherwise `muffin-build.yaml` in `root` is
/// used when present, and the built-in defaults when not. Returns the file
/// that was read, if any, so it can count towards the build definition.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<(BuildConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let default = root.join(CONFIG_FILE);
            if !default.exists() {
                tracing::debug!(root = %root.display(), "no config file, using defaults");
                return Ok((BuildConfig::default(), None));
            }
            default
        }
    };
    let config = parse_config_file(&path)?;
    Ok((config, Some(path)))
}

/// Validate a parsed config. Returns a list of errors (empty = valid).
pub fn validate_config(config: &BuildConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.version != "1.0" {
        errors.push(error(format!(
            "version must be \"1.0\", got \"{}\"",
            config.version
        )));
    }

    for (name, cmd) in [
        ("parser_generator", &config.tools.parser_generator),
        ("bundler", &config.tools.bundler),
        ("minifier", &config.tools.minifier),
    ] {
        if cmd.first().is_none_or(|p| p.trim().is_empty()) {
            errors.push(error(format!("tools.{} has no command", name)));
        }
    }

    for file in &config.static_files {
        if file.trim().is_empty() || Path::new(file).is_absolute() {
            errors.push(error(format!(
                "static file '{}' must be a relative path under src",
                file
            )));
        }
    }

    if let Some(ref vocabulary) = config.vocabulary {
        errors.extend(validate_vocabulary(vocabulary));
    }

    errors
}

fn check_phrases(category: &str, phrases: &[&String], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for phrase in phrases {
        if phrase.trim().is_empty() {
            errors.push(error(format!("{} contains an empty phrase", category)));
        } else if !seen.insert(phrase.as_str()) {
            errors.push(error(format!(
                "{} lists '{}' more than once",
                category, phrase
            )));
        }
    }
}

/// Validate a vocabulary: no empty phrases, no duplicates within a category.
pub fn validate_vocabulary(vocabulary: &Vocabulary) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let lists = [
        ("key_phrases", &vocabulary.key_phrases),
        ("special_keywords", &vocabulary.special_keywords),
        ("ordinal_suffixes", &vocabulary.ordinal_suffixes),
        ("operators", &vocabulary.operators),
        ("measures", &vocabulary.measures),
    ];
    for (category, phrases) in lists {
        check_phrases(category, &phrases.iter().collect::<Vec<_>>(), &mut errors);
    }

    let identifiers: Vec<&String> = vocabulary
        .identifier_pairs
        .iter()
        .flat_map(|p| [&p.singular, &p.plural])
        .collect();
    check_phrases("identifier_pairs", &identifiers, &mut errors);

    errors
}

/// Check that a grammar template carries each placeholder exactly once.
///
/// A missing placeholder usually means the template and vocabulary are out
/// of step; a repeated one would only have its first occurrence replaced.
pub fn validate_template(template: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for placeholder in PLACEHOLDERS {
        match template.matches(placeholder).count() {
            0 => errors.push(error(format!("template has no {} placeholder", placeholder))),
            1 => {}
            n => errors.push(error(format!(
                "template has {} occurrences of {}; only the first is replaced",
                n, placeholder
            ))),
        }
    }
    errors
}
