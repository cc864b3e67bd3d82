//! Transcript parsing for pathgate
//!
//! The pathfinder prints a menu prompt, a marker-delimited route listing and
//! a summary line with no framing of any kind. This crate recovers the route
//! from that text, tells an explicit "no path" answer apart from output it
//! cannot make sense of, and tolerates stray lines in between.

pub mod errors;
pub mod parser;

pub use errors::TranscriptError;
pub use parser::{parse_transcript, ParsedTranscript, Route, TranscriptParser};
