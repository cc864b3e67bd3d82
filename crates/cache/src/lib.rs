//! Build cache for the pathfinder executable
//!
//! Before every query the gateway asks this crate whether the compiled
//! pathfinder is older than its source and, if so, recompiles it. The check
//! is an unsynchronized comparison of modification times; concurrent callers
//! that both see a stale binary will both rebuild.

pub mod build_cache;
pub mod build_state;
pub mod errors;

pub use build_cache::{BuildCache, BuildOutcome};
pub use build_state::BuildState;
pub use errors::{BuildError, Result};
