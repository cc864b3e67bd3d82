use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Reasons the pathfinder executable could not be made fresh
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(
        "source file '{}' not found and no executable at '{}'",
        .source_path.display(),
        .executable_path.display()
    )]
    SourceMissing {
        source_path: PathBuf,
        executable_path: PathBuf,
    },

    #[error("failed to start compiler '{program}': {source}")]
    CompilerSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", format_compile_error(.exit_code, .stderr))]
    Compile {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("compiler did not finish within {after:?}")]
    TimedOut { after: Duration },

    #[error("compiler succeeded but produced no executable at '{}'", .path.display())]
    MissingOutput { path: PathBuf },
}

impl BuildError {
    /// Text to surface to callers: the compiler's own diagnostics when it
    /// produced any, otherwise this error's message.
    #[must_use]
    pub fn diagnostics(&self) -> String {
        match self {
            BuildError::Compile { stderr, .. } if !stderr.trim().is_empty() => stderr.clone(),
            other => other.to_string(),
        }
    }
}

fn format_compile_error(exit_code: &Option<i32>, stderr: &str) -> String {
    let status = match exit_code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    };
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("compiler failed with {status}")
    } else {
        format!("compiler failed with {status}: {stderr}")
    }
}
