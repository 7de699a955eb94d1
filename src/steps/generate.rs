//! MB-015: Generated sources. Grammar and autocomplete data.

use super::Project;
use crate::core::task::{status_of, Task};
use crate::core::vocabulary::Vocabulary;
use crate::core::{autocomplete, grammar};

/// `src/muffin.grammar.in` → `build/muffin.grammar`.
pub fn grammar_task<'a>(project: &'a Project, vocabulary: &'a Vocabulary) -> Task<'a> {
    let template = project.grammar_template();
    let output = project.grammar();
    Task::new(
        "build_grammar",
        output.clone(),
        vec![template.clone()],
        move || {
            let result = grammar::build_grammar(&template, &output, vocabulary).map(|_| ());
            status_of("build_grammar", result)
        },
    )
}

/// Vocabulary → `src/autocomplete.js`. No declared inputs: only a missing
/// output or a newer build definition regenerates it.
pub fn autocomplete_task<'a>(project: &'a Project, vocabulary: &'a Vocabulary) -> Task<'a> {
    let output = project.autocomplete_module();
    Task::new("build_autocomplete", output.clone(), vec![], move || {
        status_of(
            "build_autocomplete",
            autocomplete::build_autocomplete(&output, vocabulary),
        )
    })
}
