//! Layered configuration loading
//!
//! Precedence, lowest first: defaults, the JSON config file, `PATHGATE_*`
//! environment variables, command-line overrides.

use crate::config::{CompileCommand, ConfigSource, GatewayConfig};
use pathgate_core::{
    Error, Result, ResultExt, PATHGATE_BUILD_TIMEOUT_VAR, PATHGATE_COMPILE_COMMAND_VAR,
    PATHGATE_CONFIG_VAR, PATHGATE_EXECUTABLE_VAR, PATHGATE_RUN_TIMEOUT_VAR, PATHGATE_SOURCE_VAR,
    PATHGATE_STRICT_TOTAL_VAR, PATHGATE_WORKDIR_VAR,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// A partial configuration. Every layer produces one of these and only the
/// fields it sets are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub source_path: Option<PathBuf>,
    pub executable_path: Option<PathBuf>,
    /// Shell-style compile command line
    pub compile_command: Option<String>,
    pub working_dir: Option<PathBuf>,
    pub run_timeout_ms: Option<u64>,
    pub build_timeout_ms: Option<u64>,
    pub menu_selection: Option<String>,
    pub exit_selection: Option<String>,
    pub strict_total_cost: Option<bool>,
}

impl ConfigOverrides {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Configuration loader that handles precedence
pub struct GatewayConfigLoader;

impl GatewayConfigLoader {
    /// Load configuration from defaults, the config file and the environment
    pub fn load() -> Result<GatewayConfig> {
        let mut config = GatewayConfig::default();

        if let Some(path) = Self::config_file_path() {
            if let Some(file_overrides) = Self::load_from_file(&path)? {
                config = Self::merge(config, &file_overrides, ConfigSource::ConfigFile(path))?;
            }
        }

        let env_overrides = Self::overrides_from_env(|key| std::env::var(key).ok())?;
        if !env_overrides.is_empty() {
            config = Self::merge(
                config,
                &env_overrides,
                ConfigSource::EnvironmentVariable("PATHGATE_*".to_string()),
            )?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply command line arguments (highest precedence)
    pub fn apply_cli_overrides(
        config: GatewayConfig,
        overrides: &ConfigOverrides,
    ) -> Result<GatewayConfig> {
        if overrides.is_empty() {
            return Ok(config);
        }
        let config = Self::merge(config, overrides, ConfigSource::CommandLine)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. A missing file is not an error.
    pub fn load_from_file(path: &Path) -> Result<Option<ConfigOverrides>> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read config file", e))?;

        let overrides: ConfigOverrides = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;

        debug!(path = %path.display(), "loaded config file");
        Ok(Some(overrides))
    }

    /// Collect overrides from `PATHGATE_*` variables through `lookup`
    pub fn overrides_from_env<F>(lookup: F) -> Result<ConfigOverrides>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = ConfigOverrides::default();

        if let Some(value) = lookup(PATHGATE_SOURCE_VAR) {
            overrides.source_path = Some(PathBuf::from(value));
        }

        if let Some(value) = lookup(PATHGATE_EXECUTABLE_VAR) {
            overrides.executable_path = Some(PathBuf::from(value));
        }

        if let Some(value) = lookup(PATHGATE_COMPILE_COMMAND_VAR) {
            overrides.compile_command = Some(value);
        }

        if let Some(value) = lookup(PATHGATE_WORKDIR_VAR) {
            overrides.working_dir = Some(PathBuf::from(value));
        }

        if let Some(value) = lookup(PATHGATE_RUN_TIMEOUT_VAR) {
            overrides.run_timeout_ms = Some(parse_millis(PATHGATE_RUN_TIMEOUT_VAR, &value)?);
        }

        if let Some(value) = lookup(PATHGATE_BUILD_TIMEOUT_VAR) {
            overrides.build_timeout_ms = Some(parse_millis(PATHGATE_BUILD_TIMEOUT_VAR, &value)?);
        }

        if let Some(value) = lookup(PATHGATE_STRICT_TOTAL_VAR) {
            overrides.strict_total_cost = Some(parse_flag(PATHGATE_STRICT_TOTAL_VAR, &value)?);
        }

        Ok(overrides)
    }

    /// The configuration file location.
    ///
    /// `PATHGATE_CONFIG` wins; otherwise `$XDG_CONFIG_HOME/pathgate/config.json`,
    /// falling back to the platform config directory.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var(PATHGATE_CONFIG_VAR) {
            return Some(PathBuf::from(explicit));
        }

        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg_config_home) => PathBuf::from(xdg_config_home),
            Err(_) => dirs::config_dir()?,
        };

        Some(config_dir.join("pathgate").join("config.json"))
    }

    /// Apply the fields set in `overrides` on top of `base`
    pub fn merge(
        mut base: GatewayConfig,
        overrides: &ConfigOverrides,
        source: ConfigSource,
    ) -> Result<GatewayConfig> {
        if let Some(path) = &overrides.source_path {
            base.source_path = path.clone();
        }
        if let Some(path) = &overrides.executable_path {
            base.executable_path = path.clone();
        }
        if let Some(command_line) = &overrides.compile_command {
            base.compile_command = CompileCommand::parse(command_line)?;
        }
        if let Some(dir) = &overrides.working_dir {
            base.working_dir = Some(dir.clone());
        }
        if let Some(ms) = overrides.run_timeout_ms {
            base.run_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = overrides.build_timeout_ms {
            base.build_timeout = Duration::from_millis(ms);
        }
        if let Some(token) = &overrides.menu_selection {
            base.menu_selection = token.clone();
        }
        if let Some(token) = &overrides.exit_selection {
            base.exit_selection = token.clone();
        }
        if let Some(strict) = overrides.strict_total_cost {
            base.strict_total_cost = strict;
        }

        base.source = source;
        Ok(base)
    }
}

fn parse_millis(variable: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|e| {
        Error::configuration(format!(
            "{variable} must be a whole number of milliseconds, got '{value}': {e}"
        ))
    })
}

fn parse_flag(variable: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::configuration(format!(
            "{variable} must be true or false, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let overrides = GatewayConfigLoader::overrides_from_env(lookup_from(&[
            (PATHGATE_SOURCE_VAR, "routes.cpp"),
            (PATHGATE_EXECUTABLE_VAR, "routes"),
            (PATHGATE_COMPILE_COMMAND_VAR, "clang++ -o {output} {source}"),
            (PATHGATE_RUN_TIMEOUT_VAR, "2500"),
            (PATHGATE_STRICT_TOTAL_VAR, "yes"),
        ]))
        .unwrap();

        assert_eq!(overrides.source_path, Some(PathBuf::from("routes.cpp")));
        assert_eq!(overrides.executable_path, Some(PathBuf::from("routes")));
        assert_eq!(overrides.run_timeout_ms, Some(2500));
        assert_eq!(overrides.build_timeout_ms, None);
        assert_eq!(overrides.strict_total_cost, Some(true));

        let config = GatewayConfigLoader::merge(
            GatewayConfig::default(),
            &overrides,
            ConfigSource::EnvironmentVariable("PATHGATE_*".to_string()),
        )
        .unwrap();
        assert_eq!(config.compile_command.program, "clang++");
        assert_eq!(config.run_timeout, Duration::from_millis(2500));
        assert!(config.strict_total_cost);
    }

    #[test]
    fn test_env_rejects_bad_numbers_and_flags() {
        assert!(GatewayConfigLoader::overrides_from_env(lookup_from(&[(
            PATHGATE_RUN_TIMEOUT_VAR,
            "ten seconds"
        )]))
        .is_err());
        assert!(GatewayConfigLoader::overrides_from_env(lookup_from(&[(
            PATHGATE_STRICT_TOTAL_VAR,
            "maybe"
        )]))
        .is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"executable_path": "bin/inventory", "build_timeout_ms": 30000, "menu_selection": "9"}"#,
        )
        .unwrap();

        let overrides = GatewayConfigLoader::load_from_file(&path).unwrap().unwrap();
        assert_eq!(overrides.executable_path, Some(PathBuf::from("bin/inventory")));
        assert_eq!(overrides.build_timeout_ms, Some(30000));
        assert_eq!(overrides.menu_selection.as_deref(), Some("9"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let result = GatewayConfigLoader::load_from_file(&temp_dir.path().join("absent.json"));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"run_timeout": 5}"#).unwrap();

        let err = GatewayConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("invalid config file"));
    }

    #[test]
    fn test_cli_overrides_are_validated() {
        let overrides = ConfigOverrides {
            run_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(
            GatewayConfigLoader::apply_cli_overrides(GatewayConfig::default(), &overrides).is_err()
        );

        let overrides = ConfigOverrides {
            executable_path: Some(PathBuf::from("/usr/local/bin/inventory")),
            ..Default::default()
        };
        let config =
            GatewayConfigLoader::apply_cli_overrides(GatewayConfig::default(), &overrides).unwrap();
        assert_eq!(config.source, ConfigSource::CommandLine);
        assert_eq!(
            config.executable_path,
            PathBuf::from("/usr/local/bin/inventory")
        );
    }

    #[test]
    #[serial]
    fn test_load_layers_file_then_env() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"source_path": "from-file.cpp", "run_timeout_ms": 4000}"#,
        )
        .unwrap();

        std::env::set_var(PATHGATE_CONFIG_VAR, &path);
        std::env::set_var(PATHGATE_RUN_TIMEOUT_VAR, "1500");

        let result = GatewayConfigLoader::load();

        std::env::remove_var(PATHGATE_CONFIG_VAR);
        std::env::remove_var(PATHGATE_RUN_TIMEOUT_VAR);

        let config = result.unwrap();
        assert_eq!(config.source_path, PathBuf::from("from-file.cpp"));
        assert_eq!(config.run_timeout, Duration::from_millis(1500));
        assert_eq!(
            config.source,
            ConfigSource::EnvironmentVariable("PATHGATE_*".to_string())
        );
    }

    #[test]
    #[serial]
    fn test_load_rejects_multiline_menu_token_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"menu_selection": "8\n0", "exit_selection": ""}"#).unwrap();

        std::env::set_var(PATHGATE_CONFIG_VAR, &path);
        let result = GatewayConfigLoader::load();
        std::env::remove_var(PATHGATE_CONFIG_VAR);

        let err = result.unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains("menu selection"));
    }

    #[test]
    fn test_cli_overrides_reject_empty_exit_token() {
        let overrides = ConfigOverrides {
            exit_selection: Some(String::new()),
            ..Default::default()
        };
        let err = GatewayConfigLoader::apply_cli_overrides(GatewayConfig::default(), &overrides)
            .unwrap_err();
        assert!(err.to_string().contains("exit selection"));
    }
}
