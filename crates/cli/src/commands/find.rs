use pathgate_config::GatewayConfig;
use pathgate_gateway::{Gateway, PathResult};
use std::fmt::Write as _;
use std::process::ExitCode;

pub async fn execute(
    config: &GatewayConfig,
    from: &str,
    to: &str,
    json: bool,
) -> eyre::Result<ExitCode> {
    let gateway = Gateway::new(config);
    let result = gateway.find_path(from, to).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.is_failure() {
        eprint!("{}", render(&result, from, to));
    } else {
        print!("{}", render(&result, from, to));
    }

    Ok(if result.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Human-readable rendering of a query result
pub fn render(result: &PathResult, from: &str, to: &str) -> String {
    let mut out = String::new();
    match result {
        PathResult::Success {
            path,
            hop_distances,
            total_distance,
        } => {
            let _ = writeln!(out, "Shortest path from {from} to {to}: {}", path.join(" -> "));
            for (city, distance) in path.iter().zip(hop_distances) {
                let _ = writeln!(out, "  {city} ({distance})");
            }
            let _ = writeln!(out, "Total distance: {total_distance}");
        }
        PathResult::NoPath { message } => {
            let _ = writeln!(out, "{message}");
        }
        PathResult::Failure { reason, detail, .. } => match detail {
            Some(detail) if !detail.trim().is_empty() => {
                let _ = writeln!(out, "error: {reason}\n{}", detail.trim_end());
            }
            _ => {
                let _ = writeln!(out, "error: {reason}");
            }
        },
    }
    out
}
