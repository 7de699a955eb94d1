//! Core build logic. Vocabulary, templating, staleness, tasks, execution.

pub mod autocomplete;
pub mod error;
pub mod executor;
pub mod grammar;
pub mod parser;
pub mod staleness;
pub mod task;
pub mod types;
pub mod vocabulary;
