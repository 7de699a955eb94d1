//! MB-003: Vocabulary model. The Muffin language's categorized phrases.
//!
//! Lists keep their declared order, which drives autocomplete ranking and
//! the order of plain alternations. The two derived word sets are
//! `BTreeSet`s: order carries no meaning for them, and sorted iteration keeps
//! rendered grammar text byte-identical across runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named thing with a singular and a plural spelling (`Bowl` / `Bowls`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[String; 2]", into = "[String; 2]")]
pub struct IdentifierPair {
    pub singular: String,
    pub plural: String,
}

impl IdentifierPair {
    pub fn new(singular: &str, plural: &str) -> Self {
        Self {
            singular: singular.to_string(),
            plural: plural.to_string(),
        }
    }
}

impl From<[String; 2]> for IdentifierPair {
    fn from([singular, plural]: [String; 2]) -> Self {
        Self { singular, plural }
    }
}

impl From<IdentifierPair> for [String; 2] {
    fn from(pair: IdentifierPair) -> Self {
        [pair.singular, pair.plural]
    }
}

/// Immutable vocabulary consumed by the grammar and autocomplete generators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Multi-word statement phrases (`pour contents of`)
    #[serde(default)]
    pub key_phrases: Vec<String>,

    /// Reserved words the grammar template spells out itself
    #[serde(default)]
    pub special_keywords: Vec<String>,

    /// Suffixes accepted after step numbers (`1st`, `2nd`)
    #[serde(default)]
    pub ordinal_suffixes: Vec<String>,

    /// Punctuation operators
    #[serde(default)]
    pub operators: Vec<String>,

    /// Measurement phrases (`grams of`)
    #[serde(default)]
    pub measures: Vec<String>,

    /// Container kinds: bowls first, then molds
    #[serde(default)]
    pub identifier_pairs: Vec<IdentifierPair>,
}

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Split phrases into their individual words.
fn words<'a>(phrases: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    phrases
        .into_iter()
        .flat_map(|p| p.split(' '))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

impl Vocabulary {
    /// The Muffin language vocabulary.
    ///
    /// Must stay in sync with the phrases the language runtime recognizes.
    pub fn muffin() -> Self {
        let bowls = [
            ("Bowl", "Bowls"),
            ("Glass Bowl", "Glass Bowls"),
            ("Mixing Bowl", "Mixing Bowls"),
            ("Plastic Bowl", "Plastic Bowls"),
        ];
        let molds = [
            ("Cake Mold", "Cake Molds"),
            ("Muffin Cup", "Muffin Cups"),
            ("Loaf Pan", "Loaf Pans"),
            ("Toast Mold", "Toast Molds"),
            ("Pizza Pan", "Pizza Pans"),
            ("Baking Dish", "Baking Dishes"),
        ];

        Self {
            key_phrases: phrases(&[
                "set up",
                "set up a",
                "add",
                "into",
                "add water to",
                "at a",
                "ratio",
                "pour half of contents of",
                "remove",
                "from",
                "if",
                "is empty",
                "is not empty",
                "proceed to step",
                "place",
                "in the oven and bake at",
                "clean",
                "pour contents of",
                "go back to step",
                "serves",
                "brand",
                "remove a layer from",
                "and dump into",
                "microwave",
                "serve with",
                "in grill mode",
            ]),
            // Spelled out directly in muffin.grammar.in
            special_keywords: phrases(&["recipe", "ingredients", "method"]),
            ordinal_suffixes: phrases(&["st", "nd", "rd", "th"]),
            operators: phrases(&[",", ":"]),
            measures: phrases(&["grams of"]),
            identifier_pairs: bowls
                .iter()
                .chain(molds.iter())
                .map(|(s, p)| IdentifierPair::new(s, p))
                .collect(),
        }
    }

    /// Every word of every singular and plural identifier phrase.
    pub fn identifier_words(&self) -> BTreeSet<String> {
        words(
            self.identifier_pairs
                .iter()
                .flat_map(|p| [&p.singular, &p.plural]),
        )
    }

    /// Every word of every measure and key phrase.
    pub fn misc_keyword_words(&self) -> BTreeSet<String> {
        words(self.measures.iter().chain(self.key_phrases.iter()))
    }
}
