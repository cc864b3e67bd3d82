//! Relative executable and working-directory paths.
//!
//! These tests change the process working directory, so they live in their
//! own test binary and run one at a time.
#![cfg(unix)]

use pathgate_config::{CompileCommand, GatewayConfigBuilder};
use pathgate_gateway::{Gateway, PathResult};
use serial_test::serial;
use std::fs::{self, File};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const PATHFINDER: &str = r#"#!/bin/sh
read choice
read from
read to
read quit
echo "PATH_START"
echo "Shortest path from $from to $to:"
echo "$from (0)"
echo "$to (75)"
echo "PATH_END"
echo "Total cost: 75"
"#;

const COMPILER: &str = "#!/bin/sh\ncp \"$2\" \"$1\" && chmod 755 \"$1\"\n";

/// Switches the process working directory until dropped
struct CurrentDir {
    previous: PathBuf,
}

impl CurrentDir {
    fn enter(dir: &Path) -> Self {
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self { previous }
    }
}

impl Drop for CurrentDir {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}

/// Install an executable through `cp` so no write handle to it stays open here
fn install_executable(path: &Path, body: &str) {
    let staged = path.with_extension("txt");
    fs::write(&staged, body).unwrap();
    let copied = std::process::Command::new("cp")
        .arg(&staged)
        .arg(path)
        .status()
        .unwrap();
    assert!(copied.success());
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn expected(from: &str, to: &str) -> PathResult {
    PathResult::Success {
        path: vec![from.to_string(), to.to_string()],
        hop_distances: vec![0, 75],
        total_distance: 75,
    }
}

#[tokio::test]
#[serial]
async fn test_default_executable_runs_from_current_dir() {
    let dir = TempDir::new().unwrap();
    install_executable(&dir.path().join("inventory"), PATHFINDER);
    let _cwd = CurrentDir::enter(dir.path());

    let config = GatewayConfigBuilder::new().build().unwrap();
    let gateway = Gateway::new(&config);

    let result = gateway.find_path("Bhuj", "Dwarka").await;
    assert_eq!(result, expected("Bhuj", "Dwarka"));
}

#[tokio::test]
#[serial]
async fn test_relative_working_dir_builds_and_runs_once_anchored() {
    let dir = TempDir::new().unwrap();
    let work = dir.path().join("work");
    fs::create_dir(&work).unwrap();
    fs::write(work.join("cc.sh"), COMPILER).unwrap();
    let source = work.join("pathfinder.sh");
    fs::write(&source, PATHFINDER).unwrap();
    File::options()
        .write(true)
        .open(&source)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(3600))
        .unwrap();
    let _cwd = CurrentDir::enter(dir.path());

    let config = GatewayConfigBuilder::new()
        .with_working_dir("work")
        .with_source_path("pathfinder.sh")
        .with_compile_command(CompileCommand::new(
            "sh",
            vec![
                "cc.sh".to_string(),
                "{output}".to_string(),
                "{source}".to_string(),
            ],
        ))
        .build()
        .unwrap();
    let gateway = Gateway::new(&config);

    let result = gateway.find_path("Surat", "Vapi").await;

    assert_eq!(result, expected("Surat", "Vapi"));
    assert!(work.join("inventory").exists());
    assert!(!work.join("work").exists());
}
