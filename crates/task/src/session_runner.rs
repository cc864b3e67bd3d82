use async_trait::async_trait;
use pathgate_core::{CommandSession, ExecutionOutcome, MAX_CAPTURED_OUTPUT};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Runs one pathfinder session.
///
/// Implementations never fail: every problem is reported through the
/// returned `ExecutionOutcome`. Interpreting the exit code is left to the
/// caller.
#[async_trait]
pub trait SessionRunner: Send + Sync {
    async fn run(
        &self,
        executable: &Path,
        session: &CommandSession,
        deadline: Duration,
    ) -> ExecutionOutcome;
}

/// Production implementation that spawns a real child process
#[derive(Debug, Clone)]
pub struct SystemSessionRunner {
    working_dir: Option<PathBuf>,
    output_limit: usize,
}

impl Default for SystemSessionRunner {
    fn default() -> Self {
        Self {
            working_dir: None,
            output_limit: MAX_CAPTURED_OUTPUT,
        }
    }
}

impl SystemSessionRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the child with `dir` as its current directory
    pub fn with_working_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// Keep at most `bytes` of each output stream
    #[must_use]
    pub fn with_output_limit(mut self, bytes: usize) -> Self {
        self.output_limit = bytes;
        self
    }
}

#[async_trait]
impl SessionRunner for SystemSessionRunner {
    async fn run(
        &self,
        executable: &Path,
        session: &CommandSession,
        deadline: Duration,
    ) -> ExecutionOutcome {
        let mut cmd = Command::new(executable);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(executable = %executable.display(), error = %e, "failed to spawn pathfinder");
                return ExecutionOutcome::SpawnFailed {
                    message: format!("failed to start '{}': {e}", executable.display()),
                };
            }
        };

        debug!(pid = ?child.id(), executable = %executable.display(), "pathfinder started");

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let input = session.to_stdin();
        let start = Instant::now();

        // Stdin is written while both output pipes drain so that a child
        // blocked on a full pipe cannot stall the write.
        let collected = timeout(deadline, async {
            let ((), stdout, stderr, status) = tokio::join!(
                write_session(stdin, input.as_bytes()),
                read_stream(stdout, self.output_limit),
                read_stream(stderr, self.output_limit),
                child.wait(),
            );
            status.map(|status| (status, stdout, stderr))
        })
        .await;

        match collected {
            Ok(Ok((status, stdout, stderr))) => {
                debug!(status = %status, elapsed = ?start.elapsed(), "pathfinder finished");
                ExecutionOutcome::Completed {
                    exit_code: status.code(),
                    stdout,
                    stderr,
                }
            }
            Ok(Err(e)) => {
                warn!(executable = %executable.display(), error = %e, "lost track of pathfinder");
                terminate(&mut child).await;
                ExecutionOutcome::Aborted {
                    message: format!("failed to wait for '{}': {e}", executable.display()),
                }
            }
            Err(_) => {
                warn!(executable = %executable.display(), timeout = ?deadline, "pathfinder timed out, killing it");
                terminate(&mut child).await;
                ExecutionOutcome::TimedOut { after: deadline }
            }
        }
    }
}

/// Write the session and close stdin. A child that exits without reading
/// its input is not an error here; its output decides the result.
async fn write_session(stdin: Option<ChildStdin>, input: &[u8]) {
    let Some(mut stdin) = stdin else {
        return;
    };

    if let Err(e) = stdin.write_all(input).await {
        debug!(error = %e, "pathfinder stopped reading its input");
        return;
    }
    if let Err(e) = stdin.shutdown().await {
        debug!(error = %e, "failed to close pathfinder input");
    }
}

/// Read a pipe to the end, keeping the first `limit` bytes.
///
/// Bytes past the limit are drained and dropped so the child never blocks
/// on a full pipe. Whatever arrived before a read error is kept.
async fn read_stream<R>(stream: Option<R>, limit: usize) -> String
where
    R: AsyncRead + Unpin,
{
    let Some(mut stream) = stream else {
        return String::new();
    };

    let mut buffer = Vec::new();
    let limit = u64::try_from(limit).unwrap_or(u64::MAX);
    if let Err(e) = (&mut stream).take(limit).read_to_end(&mut buffer).await {
        debug!(error = %e, bytes = buffer.len(), "pathfinder output ended early");
        return String::from_utf8_lossy(&buffer).into_owned();
    }

    match tokio::io::copy(&mut stream, &mut tokio::io::sink()).await {
        Ok(0) => {}
        Ok(dropped) => warn!(kept = buffer.len(), dropped, "pathfinder output truncated"),
        Err(e) => debug!(error = %e, "pathfinder output ended early"),
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Kill and reap the child so that nothing outlives the call
async fn terminate(child: &mut Child) {
    if let Err(e) = child.kill().await {
        warn!(pid = ?child.id(), error = %e, "failed to kill pathfinder");
    }
}

/// Runner that replays a fixed outcome and records every session it receives
#[cfg(any(test, feature = "testing"))]
pub struct ScriptedSessionRunner {
    outcome: ExecutionOutcome,
    sessions: std::sync::Mutex<Vec<CommandSession>>,
}

#[cfg(any(test, feature = "testing"))]
impl ScriptedSessionRunner {
    pub fn new(outcome: ExecutionOutcome) -> Self {
        Self {
            outcome,
            sessions: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// A runner whose pathfinder exits cleanly after printing `stdout`
    pub fn with_stdout(stdout: &str) -> Self {
        Self::new(ExecutionOutcome::Completed {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    /// Sessions received so far, in call order
    pub fn sessions(&self) -> Vec<CommandSession> {
        match self.sessions.lock() {
            Ok(sessions) => sessions.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn calls(&self) -> usize {
        self.sessions().len()
    }
}

#[cfg(any(test, feature = "testing"))]
#[async_trait]
impl SessionRunner for ScriptedSessionRunner {
    async fn run(
        &self,
        _executable: &Path,
        session: &CommandSession,
        _deadline: Duration,
    ) -> ExecutionOutcome {
        match self.sessions.lock() {
            Ok(mut sessions) => sessions.push(session.clone()),
            Err(poisoned) => poisoned.into_inner().push(session.clone()),
        }
        self.outcome.clone()
    }
}
