//! Process invocation for pathgate
//!
//! Spawns the pathfinder, feeds it one scripted `CommandSession` over stdin
//! and collects its output under a hard deadline.

pub mod session_runner;

pub use session_runner::*;
