//! Core repository components
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Staging area tracking the expected state of each path
//! - `refs`: HEAD and the single branch pointer
//! - `repository`: Handle tying the areas to one working directory
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
