//! Working tree status inspection
//!
//! Compares the working directory against the index.
//!
//! - `inspector`: content comparison for a single tracked path
//! - `status_info`: classification of all paths into changed, new and deleted

pub mod inspector;
pub mod status_info;
