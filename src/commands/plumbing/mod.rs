//! Plumbing commands (low-level Git operations)
//!
//! ## Commands
//!
//! - `diff-tree`: Show the changes a commit introduced over its first parent
//! - `ls-tree`: List contents of a tree object

pub mod diff_tree;
pub mod ls_tree;
