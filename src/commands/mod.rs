//! Command implementations
//!
//! Both commands are plumbing: they read objects and print them in git's
//! machine-readable formats.

pub mod plumbing;
