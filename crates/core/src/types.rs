use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::constants::{MENU_EXIT, MENU_SHORTEST_PATH};
use crate::errors::{Error, Result};

/// The scripted input for one pathfinder query.
///
/// Four lines are written in order: the menu selection, the origin, the
/// destination and the exit selection. A session is built per request and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSession {
    menu_selection: String,
    from_city: String,
    to_city: String,
    exit_selection: String,
}

impl CommandSession {
    /// Build a session from explicit protocol tokens.
    ///
    /// Every value must fit on a single line; anything containing a line
    /// break or NUL would be read by the pathfinder as extra commands.
    pub fn new(
        menu_selection: impl Into<String>,
        from_city: impl Into<String>,
        to_city: impl Into<String>,
        exit_selection: impl Into<String>,
    ) -> Result<Self> {
        let session = Self {
            menu_selection: menu_selection.into(),
            from_city: from_city.into(),
            to_city: to_city.into(),
            exit_selection: exit_selection.into(),
        };

        for (field, value) in [
            ("menu selection", &session.menu_selection),
            ("origin city", &session.from_city),
            ("destination city", &session.to_city),
            ("exit selection", &session.exit_selection),
        ] {
            ensure_single_line(field, value)?;
        }

        Ok(session)
    }

    /// Build a shortest-path session with the default menu tokens
    pub fn shortest_path(from_city: impl Into<String>, to_city: impl Into<String>) -> Result<Self> {
        Self::new(MENU_SHORTEST_PATH, from_city, to_city, MENU_EXIT)
    }

    #[must_use]
    pub fn from_city(&self) -> &str {
        &self.from_city
    }

    #[must_use]
    pub fn to_city(&self) -> &str {
        &self.to_city
    }

    /// The protocol lines in the order they are sent
    #[must_use]
    pub fn lines(&self) -> [&str; 4] {
        [
            &self.menu_selection,
            &self.from_city,
            &self.to_city,
            &self.exit_selection,
        ]
    }

    /// Render the session as the exact bytes written to the child's stdin
    #[must_use]
    pub fn to_stdin(&self) -> String {
        let mut input = String::new();
        for line in self.lines() {
            input.push_str(line);
            input.push('\n');
        }
        input
    }
}

fn ensure_single_line(field: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r', '\0']) {
        return Err(Error::invalid_input(
            field,
            "must not contain line breaks or NUL characters",
        ));
    }
    Ok(())
}

/// What happened when the pathfinder was run once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The process ran to completion; the exit code is `None` when it was
    /// terminated by a signal.
    Completed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The process did not finish before the deadline and was killed.
    TimedOut { after: Duration },
    /// The process could not be started.
    SpawnFailed { message: String },
    /// The process started but its exit status could not be collected.
    Aborted { message: String },
}

impl ExecutionOutcome {
    /// Whether the process completed with exit code zero
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(
            self,
            ExecutionOutcome::Completed {
                exit_code: Some(0),
                ..
            }
        )
    }
}

/// Why the gateway could not produce an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    BuildFailed,
    SpawnFailed,
    TimedOut,
    ProcessError,
    ParseError,
    InvalidInput,
}

impl FailureKind {
    /// Human-readable reason reported alongside this kind
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            FailureKind::BuildFailed => "build failed",
            FailureKind::SpawnFailed => "failed to start pathfinder",
            FailureKind::TimedOut => "pathfinder timed out",
            FailureKind::ProcessError => "process exited with error",
            FailureKind::ParseError => "unrecognized pathfinder output",
            FailureKind::InvalidInput => "invalid city name",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// The answer to one `find_path` query.
///
/// `NoPath` is a successful query with a negative answer; `Failure` means
/// no answer could be obtained at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PathResult {
    Success {
        path: Vec<String>,
        hop_distances: Vec<u64>,
        total_distance: u64,
    },
    NoPath {
        message: String,
    },
    Failure {
        kind: FailureKind,
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl PathResult {
    /// Create a failure whose reason is derived from its kind
    #[must_use]
    pub fn failure(kind: FailureKind, detail: Option<String>) -> Self {
        PathResult::Failure {
            kind,
            reason: kind.reason().to_string(),
            detail,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, PathResult::Success { .. })
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, PathResult::Failure { .. })
    }

    /// The failure kind, if this is a failure
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            PathResult::Failure { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
