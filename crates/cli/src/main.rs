use clap::Parser;
use eyre::eyre;
use pathgate::Commands;
use pathgate_config::{ConfigOverrides, GatewayConfigLoader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(name = "pathgate")]
#[command(about = "Shortest-path queries against a compiled pathfinder", long_about = None)]
#[command(version)]
struct Cli {
    /// Pathfinder source file
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Pathfinder executable
    #[arg(long, global = true)]
    executable: Option<PathBuf>,

    /// Run timeout in milliseconds
    #[arg(long = "timeout-ms", global = true)]
    timeout_ms: Option<u64>,

    /// Fail when the transcript has no total cost line
    #[arg(long, global = true)]
    strict_total_cost: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_path: self.source.clone(),
            executable_path: self.executable.clone(),
            run_timeout_ms: self.timeout_ms,
            strict_total_cost: self.strict_total_cost.then_some(true),
            ..ConfigOverrides::default()
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    pathgate_utils::tracing::init("info").map_err(|e| eyre!("failed to initialize logging: {e}"))?;

    let cli = Cli::parse();

    let config = GatewayConfigLoader::load()?;
    let config = GatewayConfigLoader::apply_cli_overrides(config, &cli.overrides())?;
    debug!(source = ?config.source, "configuration loaded");

    cli.command.execute(config).await
}
