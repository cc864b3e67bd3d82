use crate::errors::TranscriptError;
use lazy_static::lazy_static;
use pathgate_core::{
    PathResult, NO_PATH_MARKER, NO_PATH_MESSAGE, PATH_END_MARKER, PATH_START_MARKER,
};
use regex::Regex;
use tracing::warn;

lazy_static! {
    /// `Total cost: 200`, anywhere on a line
    static ref TOTAL_COST_REGEX: Regex =
        Regex::new(r"Total cost:\s*(\d+)").expect("total cost pattern is valid");
    /// `Ahmedabad (0)`: the name is everything before the last `(<digits>)`
    static ref ROW_REGEX: Regex =
        Regex::new(r"^\s*(.*\S)\s*\((\d+)\)").expect("route row pattern is valid");
}

/// A route recovered from the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: Vec<String>,
    /// One value per row, exactly as printed
    pub hop_distances: Vec<u64>,
    pub total_distance: u64,
}

/// A transcript that was understood
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTranscript {
    Route(Route),
    NoPath { message: String },
}

impl From<ParsedTranscript> for PathResult {
    fn from(parsed: ParsedTranscript) -> Self {
        match parsed {
            ParsedTranscript::Route(route) => PathResult::Success {
                path: route.path,
                hop_distances: route.hop_distances,
                total_distance: route.total_distance,
            },
            ParsedTranscript::NoPath { message } => PathResult::NoPath { message },
        }
    }
}

/// Where the scanner is relative to the route listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Before any `PATH_START`
    SeekStart,
    /// The line right after `PATH_START`, a header that is skipped
    Header,
    /// Inside the listing, collecting `<name> (<distance>)` rows
    Rows,
    /// `PATH_END` seen; only the summary is of interest now
    Closed,
}

/// Line-oriented parser for pathfinder output
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptParser {
    strict_total_cost: bool,
}

impl TranscriptParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// When strict, a listing without a `Total cost` line is rejected
    /// instead of reporting a total of zero.
    pub fn with_strict_total_cost(strict: bool) -> Self {
        Self {
            strict_total_cost: strict,
        }
    }

    /// Parse one transcript. The same text always yields the same result.
    pub fn parse(&self, text: &str) -> Result<ParsedTranscript, TranscriptError> {
        let mut state = ScanState::SeekStart;
        let mut path = Vec::new();
        let mut hop_distances = Vec::new();
        let mut total_cost = None;
        let mut saw_no_path = false;

        for line in text.lines() {
            if line.contains(NO_PATH_MARKER) {
                saw_no_path = true;
            }

            if line.contains(PATH_START_MARKER) {
                // A later listing replaces an earlier one
                path.clear();
                hop_distances.clear();
                state = ScanState::Header;
                continue;
            }

            if line.contains(PATH_END_MARKER) {
                if matches!(state, ScanState::Header | ScanState::Rows) {
                    state = ScanState::Closed;
                }
                continue;
            }

            if let Some(cost) = TOTAL_COST_REGEX
                .captures(line)
                .and_then(|caps| caps[1].parse::<u64>().ok())
            {
                total_cost = Some(cost);
                continue;
            }

            match state {
                ScanState::Header => state = ScanState::Rows,
                ScanState::Rows => {
                    if let Some((name, distance)) = parse_row(line) {
                        path.push(name);
                        hop_distances.push(distance);
                    }
                }
                ScanState::SeekStart | ScanState::Closed => {}
            }
        }

        match state {
            ScanState::Closed => {
                if path.is_empty() {
                    return Err(TranscriptError::EmptyPath);
                }
                let total_distance = match total_cost {
                    Some(total) => total,
                    None if self.strict_total_cost => {
                        return Err(TranscriptError::MissingTotalCost)
                    }
                    None => {
                        warn!(cities = path.len(), "route listing has no total cost, reporting 0");
                        0
                    }
                };
                Ok(ParsedTranscript::Route(Route {
                    path,
                    hop_distances,
                    total_distance,
                }))
            }
            _ if saw_no_path => Ok(ParsedTranscript::NoPath {
                message: NO_PATH_MESSAGE.to_string(),
            }),
            ScanState::Header | ScanState::Rows => Err(TranscriptError::Unterminated),
            ScanState::SeekStart => Err(TranscriptError::Unrecognized),
        }
    }
}

/// Parse a transcript with the default, lenient settings
pub fn parse_transcript(text: &str) -> Result<ParsedTranscript, TranscriptError> {
    TranscriptParser::new().parse(text)
}

fn parse_row(line: &str) -> Option<(String, u64)> {
    let caps = ROW_REGEX.captures(line)?;
    let distance = caps[2].parse::<u64>().ok()?;
    Some((caps[1].trim().to_string(), distance))
}
