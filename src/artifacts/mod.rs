//! Data structures and algorithms
//!
//! - `diff`: Myers' diff and unified hunks
//! - `index`: Index file records (header, entries, checksum)
//! - `objects`: Object types (blob, tree, commit)
//! - `status`: Working tree status inspection

pub mod diff;
pub mod index;
pub mod objects;
pub mod status;
