//! Plumbing commands (low-level object and index access)
//!
//! - `hash-object`: compute an object ID and optionally store the object
//! - `cat-file`: print a stored object resolved by digest or prefix
//! - `ls-files`: list staged entries
//! - `write-tree`: store the index as a flat tree
//! - `ls-tree`: list the entries of a tree

pub mod cat_file;
pub mod hash_object;
pub mod ls_files;
pub mod ls_tree;
pub mod write_tree;
