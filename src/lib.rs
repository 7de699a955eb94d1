//! muffin-build, an incremental build orchestrator for the Muffin language tooling.
//!
//! Generates the grammar and autocomplete tables from one vocabulary, drives
//! the external parser generator, bundler, and minifier, and skips any step
//! whose output is newer than everything it depends on.

pub mod cli;
pub mod core;
pub mod steps;
pub mod tools;
pub mod trace;
