//! Tree comparison
//!
//! - `tree_diff`: merge-join walk over two trees producing change entries
//! - `change`: change entries, actions and the action filter
//! - `report`: classified, ordered results and their summary

pub mod change;
pub mod report;
pub mod tree_diff;
