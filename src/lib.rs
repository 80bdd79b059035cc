//! twig: a minimal content-addressed version control backend
//!
//! - `areas`: the on-disk stores (objects, index, refs) and the working directory
//! - `artifacts`: codecs and algorithms over those stores
//! - `commands`: user-level operations as methods on [`areas::repository::Repository`]
//! - `errors`: the structural error taxonomy

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
