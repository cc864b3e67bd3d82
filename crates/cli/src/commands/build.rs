use pathgate_cache::BuildOutcome;
use pathgate_config::GatewayConfig;
use pathgate_gateway::Gateway;
use std::process::ExitCode;

pub async fn execute(config: &GatewayConfig) -> eyre::Result<ExitCode> {
    let gateway = Gateway::new(config);
    let executable = config.resolved_executable_path();

    match gateway.ensure_built().await {
        Ok(BuildOutcome::UpToDate) => {
            println!("{} is up to date", executable.display());
            Ok(ExitCode::SUCCESS)
        }
        Ok(BuildOutcome::Rebuilt) => {
            println!("rebuilt {}", executable.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: build failed\n{}", e.diagnostics().trim_end());
            Ok(ExitCode::FAILURE)
        }
    }
}
