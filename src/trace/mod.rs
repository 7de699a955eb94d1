//! Build trace. JSONL event log and BLAKE3 artifact hashing.

pub mod eventlog;
pub mod hasher;
