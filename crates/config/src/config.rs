//! Gateway configuration types
//!
//! The configuration is immutable once built and is cheap to clone, so each
//! gateway component keeps its own copy of the values it needs.

use pathgate_core::{
    Error, Result, DEFAULT_BUILD_TIMEOUT, DEFAULT_COMPILER, DEFAULT_EXECUTABLE_PATH,
    DEFAULT_RUN_TIMEOUT, DEFAULT_SOURCE_PATH, MENU_EXIT, MENU_SHORTEST_PATH, OUTPUT_PLACEHOLDER,
    SOURCE_PLACEHOLDER,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The compiler invocation used to rebuild the pathfinder.
///
/// `{source}` and `{output}` in any argument are replaced with the source
/// and executable paths when the command is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for CompileCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_COMPILER.to_string(),
            args: vec![
                "-o".to_string(),
                OUTPUT_PLACEHOLDER.to_string(),
                SOURCE_PLACEHOLDER.to_string(),
            ],
        }
    }
}

impl CompileCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a shell-style command line such as `g++ -O2 -o {output} {source}`
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut words = shlex::split(command_line).ok_or_else(|| {
            Error::configuration(format!("unbalanced quoting in compile command '{command_line}'"))
        })?;

        if words.is_empty() {
            return Err(Error::configuration("compile command is empty"));
        }

        let program = words.remove(0);
        let command = Self::new(program, words);
        command.validate()?;
        Ok(command)
    }

    /// Check that the command names a program and both placeholders
    pub fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(Error::configuration("compile command has no program"));
        }

        for placeholder in [SOURCE_PLACEHOLDER, OUTPUT_PLACEHOLDER] {
            if !self.args.iter().any(|arg| arg.contains(placeholder)) {
                return Err(Error::configuration(format!(
                    "compile command must reference {placeholder}"
                )));
            }
        }

        Ok(())
    }

    /// Substitute the placeholders and return the arguments to pass
    #[must_use]
    pub fn render_args(&self, source: &Path, output: &Path) -> Vec<String> {
        let source = source.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(SOURCE_PLACEHOLDER, &source)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

/// Where the effective configuration last came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
    /// Command line argument
    CommandLine,
}

/// Settings for one gateway instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Pathfinder source file
    pub source_path: PathBuf,
    /// Compiled pathfinder executable
    pub executable_path: PathBuf,
    /// Compiler invocation used when the executable is stale
    pub compile_command: CompileCommand,
    /// Directory relative paths are resolved against, and the child's cwd
    pub working_dir: Option<PathBuf>,
    /// Deadline for one pathfinder session
    pub run_timeout: Duration,
    /// Deadline for one compiler run
    pub build_timeout: Duration,
    /// Menu token that selects shortest-path search
    pub menu_selection: String,
    /// Menu token that quits the pathfinder
    pub exit_selection: String,
    /// Treat a transcript without `Total cost` as unparseable
    pub strict_total_cost: bool,
    /// Configuration source for debugging
    pub source: ConfigSource,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            executable_path: PathBuf::from(DEFAULT_EXECUTABLE_PATH),
            compile_command: CompileCommand::default(),
            working_dir: None,
            run_timeout: DEFAULT_RUN_TIMEOUT,
            build_timeout: DEFAULT_BUILD_TIMEOUT,
            menu_selection: MENU_SHORTEST_PATH.to_string(),
            exit_selection: MENU_EXIT.to_string(),
            strict_total_cost: false,
            source: ConfigSource::Default,
        }
    }
}

impl GatewayConfig {
    /// The source path as an absolute path
    #[must_use]
    pub fn resolved_source_path(&self) -> PathBuf {
        self.resolve(&self.source_path)
    }

    /// The executable path as an absolute path.
    ///
    /// A bare name such as `inventory` must never reach `Command::new`
    /// unresolved, or it would be looked up on `PATH`.
    #[must_use]
    pub fn resolved_executable_path(&self) -> PathBuf {
        self.resolve(&self.executable_path)
    }

    /// The working directory as an absolute path, if one is set
    #[must_use]
    pub fn resolved_working_dir(&self) -> Option<PathBuf> {
        self.working_dir.as_deref().map(absolute)
    }

    /// Relative paths are taken from the working directory, or from the
    /// current directory when none is set.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.resolved_working_dir() {
            Some(dir) => dir.join(path),
            None => absolute(path),
        }
    }

    /// Reject settings the gateway cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.run_timeout.is_zero() {
            return Err(Error::configuration("run timeout must be greater than zero"));
        }
        if self.build_timeout.is_zero() {
            return Err(Error::configuration("build timeout must be greater than zero"));
        }
        if self.source_path.as_os_str().is_empty() {
            return Err(Error::configuration("source path is empty"));
        }
        if self.executable_path.as_os_str().is_empty() {
            return Err(Error::configuration("executable path is empty"));
        }
        validate_menu_token("menu selection", &self.menu_selection)?;
        validate_menu_token("exit selection", &self.exit_selection)?;
        self.compile_command.validate()
    }
}

/// Join a relative path onto the current directory. If the current
/// directory is unavailable the path is anchored at `.` instead, which still
/// keeps it off the `PATH` lookup.
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => Path::new(".").join(path),
    }
}

fn validate_menu_token(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::configuration(format!("{name} is empty")));
    }
    if value.contains(['\n', '\r', '\0']) {
        return Err(Error::configuration(format!(
            "{name} must be a single line, got {value:?}"
        )));
    }
    Ok(())
}

/// Builder for creating gateway configurations
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: GatewayConfig::default(),
        }
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.source_path = path.into();
        self
    }

    pub fn with_executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.executable_path = path.into();
        self
    }

    pub fn with_compile_command(mut self, command: CompileCommand) -> Self {
        self.config.compile_command = command;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.working_dir = Some(dir.into());
        self
    }

    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.config.run_timeout = timeout;
        self
    }

    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.config.build_timeout = timeout;
        self
    }

    pub fn with_menu_tokens(
        mut self,
        menu_selection: impl Into<String>,
        exit_selection: impl Into<String>,
    ) -> Self {
        self.config.menu_selection = menu_selection.into();
        self.config.exit_selection = exit_selection.into();
        self
    }

    pub fn with_strict_total_cost(mut self, strict: bool) -> Self {
        self.config.strict_total_cost = strict;
        self
    }

    pub fn with_source(mut self, source: ConfigSource) -> Self {
        self.config.source = source;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<GatewayConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for GatewayConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_compile_command_renders_gpp() {
        let command = CompileCommand::default();
        assert_eq!(command.program, "g++");
        let args = command.render_args(Path::new("inventory.cpp"), Path::new("inventory"));
        assert_eq!(args, vec!["-o", "inventory", "inventory.cpp"]);
    }

    #[test]
    fn test_parse_compile_command_with_quotes() {
        let command = CompileCommand::parse("clang++ -O2 -o '{output}' \"{source}\"").unwrap();
        assert_eq!(command.program, "clang++");
        let args = command.render_args(Path::new("src dir/main.cpp"), Path::new("bin/route"));
        assert_eq!(args, vec!["-O2", "-o", "bin/route", "src dir/main.cpp"]);
    }

    #[test]
    fn test_parse_rejects_bad_commands() {
        assert!(CompileCommand::parse("").is_err());
        assert!(CompileCommand::parse("g++ -o '{output}").is_err());
        assert!(CompileCommand::parse("g++ -o {output}").is_err());
        assert!(CompileCommand::parse("g++ {source}").is_err());
    }

    #[test]
    fn test_placeholders_inside_arguments() {
        let command = CompileCommand::parse("cc -o{output} {source}").unwrap();
        let args = command.render_args(Path::new("a.c"), Path::new("a.out"));
        assert_eq!(args, vec!["-oa.out", "a.c"]);
    }

    #[test]
    fn test_paths_resolve_against_working_dir() {
        let config = GatewayConfigBuilder::new()
            .with_working_dir("/srv/pathfinder")
            .with_executable_path("/opt/bin/inventory")
            .build()
            .unwrap();

        assert_eq!(
            config.resolved_source_path(),
            PathBuf::from("/srv/pathfinder/inventory.cpp")
        );
        assert_eq!(
            config.resolved_executable_path(),
            PathBuf::from("/opt/bin/inventory")
        );
    }

    #[test]
    fn test_default_paths_resolve_against_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let config = GatewayConfigBuilder::new().build().unwrap();

        assert_eq!(config.resolved_source_path(), cwd.join("inventory.cpp"));
        assert_eq!(config.resolved_executable_path(), cwd.join("inventory"));
        assert!(config.resolved_executable_path().is_absolute());
        assert_eq!(config.resolved_working_dir(), None);
    }

    #[test]
    fn test_relative_working_dir_is_anchored_once() {
        let cwd = std::env::current_dir().unwrap();
        let config = GatewayConfigBuilder::new()
            .with_working_dir("work")
            .build()
            .unwrap();

        assert_eq!(config.resolved_working_dir(), Some(cwd.join("work")));
        assert_eq!(
            config.resolved_executable_path(),
            cwd.join("work").join("inventory")
        );
        assert_eq!(
            config.resolved_source_path(),
            cwd.join("work").join("inventory.cpp")
        );
    }

    #[test]
    fn test_builder_rejects_bad_menu_tokens() {
        for (menu, exit) in [("", "0"), ("8", "  "), ("8\n0", "0"), ("8", "0\r")] {
            let result = GatewayConfigBuilder::new()
                .with_menu_tokens(menu, exit)
                .build();
            assert!(
                matches!(result, Err(Error::Configuration { .. })),
                "accepted menu={menu:?} exit={exit:?}"
            );
        }
    }

    #[test]
    fn test_builder_rejects_zero_timeouts() {
        assert!(GatewayConfigBuilder::new()
            .with_run_timeout(Duration::ZERO)
            .build()
            .is_err());
        assert!(GatewayConfigBuilder::new()
            .with_build_timeout(Duration::ZERO)
            .build()
            .is_err());
    }
}
