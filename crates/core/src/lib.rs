//! Core domain types, errors, and constants for `pathgate`.
//!
//! ## Key Components
//!
//! - **`errors`**: the crate-level `Error` enum and `Result` alias used by the
//!   configuration and filesystem layers.
//! - **`types`**: the values that flow through one gateway call: the
//!   `CommandSession` written to the pathfinder, the `ExecutionOutcome` it
//!   produces, and the `PathResult` handed back to callers.
//! - **`constants`**: protocol tokens, default timeouts, environment variable
//!   names and the static city list.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    types::*,
};
