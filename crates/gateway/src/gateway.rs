use pathgate_cache::{BuildCache, BuildOutcome, Result as BuildResult};
use pathgate_config::GatewayConfig;
use pathgate_core::{CommandSession, ExecutionOutcome, FailureKind, PathResult};
use pathgate_task::{SessionRunner, SystemSessionRunner};
use pathgate_transcript::TranscriptParser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Shortest-path queries answered by an external pathfinder executable.
///
/// Each call rebuilds the executable if needed, runs one fresh child process
/// and parses its transcript. Nothing is cached between calls, and there is
/// no retry: the first failure is returned to the caller.
pub struct Gateway {
    build_cache: BuildCache,
    runner: Arc<dyn SessionRunner>,
    parser: TranscriptParser,
    executable_path: PathBuf,
    run_timeout: Duration,
    menu_selection: String,
    exit_selection: String,
}

impl Gateway {
    /// Create a gateway that spawns real processes
    pub fn new(config: &GatewayConfig) -> Self {
        let runner = match config.resolved_working_dir() {
            Some(dir) => SystemSessionRunner::with_working_dir(dir),
            None => SystemSessionRunner::new(),
        };
        Self::with_runner(config, Arc::new(runner))
    }

    /// Create a gateway with a custom session runner
    pub fn with_runner(config: &GatewayConfig, runner: Arc<dyn SessionRunner>) -> Self {
        Self {
            build_cache: BuildCache::from_config(config),
            runner,
            parser: TranscriptParser::with_strict_total_cost(config.strict_total_cost),
            executable_path: config.resolved_executable_path(),
            run_timeout: config.run_timeout,
            menu_selection: config.menu_selection.clone(),
            exit_selection: config.exit_selection.clone(),
        }
    }

    /// Run only the build step
    pub async fn ensure_built(&self) -> BuildResult<BuildOutcome> {
        self.build_cache.ensure_fresh().await
    }

    /// Find the shortest path between two cities.
    ///
    /// City names are passed to the pathfinder verbatim; only values that
    /// would break the line protocol are rejected, before anything is built
    /// or spawned.
    #[instrument(skip_all, fields(from = %from_city, to = %to_city))]
    pub async fn find_path(&self, from_city: &str, to_city: &str) -> PathResult {
        let session = match CommandSession::new(
            self.menu_selection.as_str(),
            from_city,
            to_city,
            self.exit_selection.as_str(),
        ) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "rejected city name");
                return PathResult::failure(FailureKind::InvalidInput, Some(e.to_string()));
            }
        };

        if let Err(e) = self.build_cache.ensure_fresh().await {
            error!(error = %e, "pathfinder build failed");
            return PathResult::failure(FailureKind::BuildFailed, Some(e.diagnostics()));
        }

        let outcome = self
            .runner
            .run(&self.executable_path, &session, self.run_timeout)
            .await;

        let result = self.interpret(outcome);
        match &result {
            PathResult::Success { total_distance, path, .. } => {
                info!(cities = path.len(), total_distance, "path found");
            }
            PathResult::NoPath { .. } => info!("no path between cities"),
            PathResult::Failure { kind, .. } => warn!(kind = ?kind, "path query failed"),
        }
        result
    }

    fn interpret(&self, outcome: ExecutionOutcome) -> PathResult {
        match outcome {
            ExecutionOutcome::SpawnFailed { message } => {
                PathResult::failure(FailureKind::SpawnFailed, Some(message))
            }
            ExecutionOutcome::Aborted { message } => {
                PathResult::failure(FailureKind::ProcessError, Some(message))
            }
            ExecutionOutcome::TimedOut { after } => PathResult::failure(
                FailureKind::TimedOut,
                Some(format!("no answer within {after:?}")),
            ),
            ExecutionOutcome::Completed {
                exit_code,
                stdout: _,
                stderr,
            } if exit_code != Some(0) => {
                warn!(exit_code = ?exit_code, stderr = %stderr.trim(), "pathfinder exited with error");
                PathResult::failure(FailureKind::ProcessError, Some(stderr))
            }
            ExecutionOutcome::Completed { stdout, .. } => match self.parser.parse(&stdout) {
                Ok(parsed) => parsed.into(),
                Err(e) => {
                    warn!(error = %e, "could not parse pathfinder output");
                    PathResult::failure(FailureKind::ParseError, Some(e.to_string()))
                }
            },
        }
    }
}
