//! Commits as diffable snapshots
//!
//! - `snapshot`: a commit's tree and parents, and the `CommitSource` seam
//! - `root_policy`: which snapshot a commit is compared against

pub mod root_policy;
pub mod snapshot;
