//! MB-004: Grammar template rendering.
//!
//! `muffin.grammar.in` carries four placeholders that are replaced with
//! alternations built from the vocabulary:
//! - `%operators%` and `%ordinal%`: plain string literals, declared order
//! - `%misc_keywords%` and `%identifiers%`: `@specialize` tokens, sorted
//!
//! Each placeholder is replaced at most once and replacements are never
//! re-scanned.

use super::error::{BuildError, Result};
use super::vocabulary::Vocabulary;
use std::fmt::Write as _;
use std::path::Path;

pub const OPERATORS: &str = "%operators%";
pub const ORDINAL: &str = "%ordinal%";
pub const MISC_KEYWORDS: &str = "%misc_keywords%";
pub const IDENTIFIERS: &str = "%identifiers%";

/// Placeholders in application order.
pub const PLACEHOLDERS: [&str; 4] = [OPERATORS, ORDINAL, MISC_KEYWORDS, IDENTIFIERS];

/// Token class for vocabulary words re-tagged from the generic word token.
pub const KEYWORD_TOKEN: &str = "Keyword";
pub const IDENTIFIER_TOKEN: &str = "Identifier";

/// Render a double-quoted string literal.
///
/// The output is also a valid JSON string literal.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Join phrases as `"a"|"b"|...`, keeping iteration order.
pub fn alternation<I, S>(phrases: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    phrases
        .into_iter()
        .map(|p| string_literal(p.as_ref()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Join words as `@specialize<Token, "a">|...`, keeping iteration order.
///
/// Unlike [`alternation`], each word becomes a specialized token of class
/// `token` rather than an anonymous literal.
pub fn specialized_alternation<I, S>(words: I, token: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| format!("@specialize<{}, {}>", token, string_literal(w.as_ref())))
        .collect::<Vec<_>>()
        .join("|")
}

/// Template text being rewritten: literal runs interleaved with fragments
/// that were already substituted and must not be searched again.
#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Fragment(String),
}

#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn new(text: &str) -> Self {
        Self {
            segments: vec![Segment::Literal(text.to_string())],
        }
    }

    /// Replace the first occurrence of `placeholder` in the literal text.
    /// Returns false, leaving the text untouched, if there is none.
    pub fn replace_once(&mut self, placeholder: &str, replacement: &str) -> bool {
        let hit = self.segments.iter().enumerate().find_map(|(idx, seg)| match seg {
            Segment::Literal(text) => text
                .split_once(placeholder)
                .map(|(before, after)| (idx, before.to_string(), after.to_string())),
            Segment::Fragment(_) => None,
        });
        let Some((idx, before, after)) = hit else {
            return false;
        };
        self.segments.splice(
            idx..=idx,
            [
                Segment::Literal(before),
                Segment::Fragment(replacement.to_string()),
                Segment::Literal(after),
            ],
        );
        true
    }

    pub fn into_text(self) -> String {
        self.segments
            .into_iter()
            .map(|seg| match seg {
                Segment::Literal(s) | Segment::Fragment(s) => s,
            })
            .collect()
    }
}

/// Rendered grammar text and the placeholders the template lacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub missing: Vec<&'static str>,
}

/// The four placeholder fragments for a vocabulary, in application order.
pub fn fragments(vocabulary: &Vocabulary) -> [(&'static str, String); 4] {
    [
        (OPERATORS, alternation(&vocabulary.operators)),
        (ORDINAL, alternation(&vocabulary.ordinal_suffixes)),
        (
            MISC_KEYWORDS,
            specialized_alternation(&vocabulary.misc_keyword_words(), KEYWORD_TOKEN),
        ),
        (
            IDENTIFIERS,
            specialized_alternation(&vocabulary.identifier_words(), IDENTIFIER_TOKEN),
        ),
    ]
}

/// Substitute the vocabulary into a grammar template.
pub fn render(template: &str, vocabulary: &Vocabulary) -> Rendered {
    let mut doc = Template::new(template);
    let mut missing = Vec::new();
    for (placeholder, fragment) in fragments(vocabulary) {
        if !doc.replace_once(placeholder, &fragment) {
            missing.push(placeholder);
        }
    }
    Rendered {
        text: doc.into_text(),
        missing,
    }
}

/// Read the template, render it, and write the grammar.
pub fn build_grammar(template: &Path, output: &Path, vocabulary: &Vocabulary) -> Result<Rendered> {
    let source = std::fs::read_to_string(template).map_err(|e| BuildError::io(template, e))?;
    let rendered = render(&source, vocabulary);
    for placeholder in &rendered.missing {
        tracing::warn!(
            template = %template.display(),
            placeholder,
            "placeholder not found in template"
        );
    }
    std::fs::write(output, &rendered.text).map_err(|e| BuildError::io(output, e))?;
    Ok(rendered)
}
