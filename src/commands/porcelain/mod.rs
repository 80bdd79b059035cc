//! Porcelain commands (user-facing workflow)
//!
//! - `init`: create an empty repository
//! - `add`: stage files and directories
//! - `commit`: record the staged tree on the branch
//! - `status`: classify working-copy paths against the index
//! - `diff`: unified diff from the index to the working copy
//! - `log`: walk the branch history

pub mod add;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod status;
