//! Shared utilities for pathgate
//!
//! Filesystem timestamp probing and logging setup used by the other crates
//! in the workspace.

pub mod file_times;
pub mod tracing;

pub use file_times::*;
