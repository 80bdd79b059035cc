//! Line diffing
//!
//! - `diff_algorithm`: Myers' diff for line-by-line comparison
//! - `hunk`: grouping of edit scripts into context hunks
//! - `patch`: unified diff of a staged blob against its working copy

pub mod diff_algorithm;
pub mod hunk;
pub mod patch;
