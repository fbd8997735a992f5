//! Git data structures and algorithms
//!
//! - `database`: Database entry types
//! - `diff`: Tree diffing and change classification
//! - `history`: Commit snapshots and parent resolution
//! - `objects`: Git object types (blob, tree, commit)

pub mod database;
pub mod diff;
pub mod history;
pub mod objects;
