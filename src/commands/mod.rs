//! Command implementations, one `impl Repository` block per command
//!
//! `plumbing` exposes the object store and index directly; `porcelain`
//! composes them into the staging and commit workflow.

pub mod plumbing;
pub mod porcelain;
