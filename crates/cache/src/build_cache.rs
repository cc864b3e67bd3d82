use crate::build_state::BuildState;
use crate::errors::{BuildError, Result};
use pathgate_config::{CompileCommand, GatewayConfig};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// What `ensure_fresh` had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The executable was already newer than its source
    UpToDate,
    /// The compiler ran and produced a new executable
    Rebuilt,
}

/// Keeps the pathfinder executable in step with its source
#[derive(Debug, Clone)]
pub struct BuildCache {
    source_path: PathBuf,
    executable_path: PathBuf,
    compile_command: CompileCommand,
    build_timeout: Duration,
    working_dir: Option<PathBuf>,
}

impl BuildCache {
    pub fn new(
        source_path: impl Into<PathBuf>,
        executable_path: impl Into<PathBuf>,
        compile_command: CompileCommand,
        build_timeout: Duration,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            executable_path: executable_path.into(),
            compile_command,
            build_timeout,
            working_dir: None,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            source_path: config.resolved_source_path(),
            executable_path: config.resolved_executable_path(),
            compile_command: config.compile_command.clone(),
            build_timeout: config.build_timeout,
            working_dir: config.resolved_working_dir(),
        }
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[must_use]
    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    /// Current modification times of source and executable
    #[must_use]
    pub fn state(&self) -> BuildState {
        BuildState::probe(&self.source_path, &self.executable_path)
    }

    /// Rebuild the executable if it is missing or stale.
    ///
    /// The compiler runs at most once per call and is bounded by the build
    /// timeout. Its stderr is carried in `BuildError::Compile` on failure.
    pub async fn ensure_fresh(&self) -> Result<BuildOutcome> {
        let state = self.state();

        if !state.needs_rebuild() {
            if !state.source.exists {
                warn!(
                    executable = %self.executable_path.display(),
                    source = %self.source_path.display(),
                    "source file missing, using prebuilt executable"
                );
            } else {
                debug!(executable = %self.executable_path.display(), "executable is up to date");
            }
            return Ok(BuildOutcome::UpToDate);
        }

        if state.nothing_to_build() {
            return Err(BuildError::SourceMissing {
                source_path: self.source_path.clone(),
                executable_path: self.executable_path.clone(),
            });
        }

        self.compile().await?;

        if !self.executable_path.exists() {
            return Err(BuildError::MissingOutput {
                path: self.executable_path.clone(),
            });
        }

        Ok(BuildOutcome::Rebuilt)
    }

    async fn compile(&self) -> Result<()> {
        let args = self
            .compile_command
            .render_args(&self.source_path, &self.executable_path);

        info!(
            compiler = %self.compile_command.program,
            args = ?args,
            "rebuilding pathfinder executable"
        );

        let mut cmd = Command::new(&self.compile_command.program);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let start = Instant::now();
        let output = match timeout(self.build_timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                error!(compiler = %self.compile_command.program, error = %e, "failed to start compiler");
                return Err(BuildError::CompilerSpawn {
                    program: self.compile_command.program.clone(),
                    source: e,
                });
            }
            Err(_) => {
                error!(timeout = ?self.build_timeout, "compiler timed out");
                return Err(BuildError::TimedOut {
                    after: self.build_timeout,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            error!(status = %output.status, stderr = %stderr.trim(), "compilation failed");
            return Err(BuildError::Compile {
                exit_code: output.status.code(),
                stderr,
            });
        }

        info!(elapsed = ?start.elapsed(), "pathfinder executable rebuilt");
        Ok(())
    }
}
