//! MB-005: Editor autocomplete tables.
//!
//! Produces the `autocomplete.js` module consumed by the editor front end.
//! Entry order follows the vocabulary's declared order, which the editor
//! uses for suggestion ranking.

use super::error::{BuildError, Result};
use super::grammar::string_literal;
use super::vocabulary::Vocabulary;
use serde::Serialize;
use std::path::Path;

/// Completion class understood by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionType {
    Keyword,
    Variable,
    Constant,
}

impl CompletionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Variable => "variable",
            Self::Constant => "constant",
        }
    }
}

/// A single completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: CompletionType,
}

impl Completion {
    fn new(label: &str, kind: CompletionType) -> Self {
        Self {
            label: label.to_string(),
            kind,
        }
    }

    /// JS object literal: `{label: "Bowl", type: "variable"}`.
    pub fn to_js(&self) -> String {
        format!(
            "{{label: {}, type: {}}}",
            string_literal(&self.label),
            string_literal(self.kind.as_str())
        )
    }
}

/// Special keywords, key phrases, then measures.
pub fn keyword_table(vocabulary: &Vocabulary) -> Vec<Completion> {
    vocabulary
        .special_keywords
        .iter()
        .chain(&vocabulary.key_phrases)
        .chain(&vocabulary.measures)
        .map(|label| Completion::new(label, CompletionType::Keyword))
        .collect()
}

/// Singular forms as variables, plural forms as constants, pair by pair.
pub fn identifier_table(vocabulary: &Vocabulary) -> Vec<Completion> {
    vocabulary
        .identifier_pairs
        .iter()
        .flat_map(|pair| {
            [
                Completion::new(&pair.singular, CompletionType::Variable),
                Completion::new(&pair.plural, CompletionType::Constant),
            ]
        })
        .collect()
}

/// Every suggestable name: keywords followed by identifiers.
pub fn all_names(vocabulary: &Vocabulary) -> Vec<Completion> {
    let mut names = keyword_table(vocabulary);
    names.extend(identifier_table(vocabulary));
    names
}

fn js_array(entries: &[Completion]) -> String {
    entries
        .iter()
        .map(Completion::to_js)
        .collect::<Vec<_>>()
        .join(",")
}

/// Render the `autocomplete.js` ES module.
pub fn render_module(vocabulary: &Vocabulary) -> String {
    format!(
        "export const keywords = [{}];\n\
         export const identifiers = [{}];\n\
         export const allNames = keywords.concat(identifiers);\n",
        js_array(&keyword_table(vocabulary)),
        js_array(&identifier_table(vocabulary)),
    )
}

/// Write the autocomplete module to `output`.
pub fn build_autocomplete(output: &Path, vocabulary: &Vocabulary) -> Result<()> {
    std::fs::write(output, render_module(vocabulary)).map_err(|e| BuildError::io(output, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::IdentifierPair;

    #[test]
    fn test_mb005_keyword_table_order() {
        let v = Vocabulary::muffin();
        let table = keyword_table(&v);
        assert_eq!(table.len(), 3 + 26 + 1);
        assert_eq!(table[0].label, "recipe");
        assert_eq!(table[2].label, "method");
        assert_eq!(table[3].label, "set up");
        assert_eq!(table.last().unwrap().label, "grams of");
        assert!(table.iter().all(|c| c.kind == CompletionType::Keyword));
    }

    #[test]
    fn test_mb005_identifier_table_pairs() {
        let v = Vocabulary::muffin();
        let table = identifier_table(&v);
        assert_eq!(table.len(), 20);
        assert_eq!(table[0], Completion::new("Bowl", CompletionType::Variable));
        assert_eq!(table[1], Completion::new("Bowls", CompletionType::Constant));
        assert_eq!(
            table[19],
            Completion::new("Baking Dishes", CompletionType::Constant)
        );
    }

    #[test]
    fn test_mb005_all_names_concatenates() {
        let v = Vocabulary::muffin();
        let all = all_names(&v);
        assert_eq!(all.len(), keyword_table(&v).len() + identifier_table(&v).len());
        assert_eq!(all[30].label, "Bowl");
    }

    #[test]
    fn test_mb005_render_module_shape() {
        let v = Vocabulary {
            special_keywords: vec!["recipe".to_string()],
            identifier_pairs: vec![IdentifierPair::new("Tray", "Trays")],
            ..Default::default()
        };
        let module = render_module(&v);
        assert_eq!(
            module,
            "export const keywords = [{label: \"recipe\", type: \"keyword\"}];\n\
             export const identifiers = [{label: \"Tray\", type: \"variable\"},{label: \"Trays\", type: \"constant\"}];\n\
             export const allNames = keywords.concat(identifiers);\n"
        );
    }

    #[test]
    fn test_mb005_render_module_escapes_labels() {
        let v = Vocabulary {
            key_phrases: vec!["say \"hi\"".to_string()],
            ..Default::default()
        };
        let module = render_module(&v);
        assert!(module.contains(r#"{label: "say \"hi\"", type: "keyword"}"#));
    }

    #[test]
    fn test_mb005_empty_vocabulary() {
        let module = render_module(&Vocabulary::default());
        assert!(module.starts_with("export const keywords = [];\n"));
    }

    #[test]
    fn test_mb005_build_autocomplete_writes() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("autocomplete.js");
        build_autocomplete(&out, &Vocabulary::muffin()).unwrap();
        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.contains("allNames"));
        assert!(content.contains("\"Muffin Cup\""));
    }

    #[test]
    fn test_mb005_completion_serializes_like_editor_entry() {
        let json = serde_json::to_string(&Completion::new("Bowl", CompletionType::Variable)).unwrap();
        assert_eq!(json, r#"{"label":"Bowl","type":"variable"}"#);
    }
}
