use pathgate_core::CITIES;
use std::process::ExitCode;

pub fn execute(json: bool) -> eyre::Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string_pretty(CITIES)?);
    } else {
        for city in CITIES {
            println!("{city}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
