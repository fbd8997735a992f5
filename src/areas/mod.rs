//! Core repository components
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `repository`: Commit resolution and command entry points

pub mod database;
pub mod repository;
