//! The pathgate gateway
//!
//! `Gateway::find_path` answers "what is the shortest path between two
//! cities?" by making sure the pathfinder executable is freshly built,
//! running one console session against it and parsing what it printed.
//! Every outcome, including infrastructure failures, comes back as a
//! `PathResult` value.

pub mod gateway;

pub use gateway::Gateway;
pub use pathgate_core::{FailureKind, PathResult};
