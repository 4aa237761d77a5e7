use std::io::Write;
use std::process::Command;

use clap::Parser;
use fleet_cli::{exit_code, run, Cli};

fn fleet_bin() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_fleet"));
    command.env_remove("FLEET_CONFIG").env_remove("FLEET_MANIFEST").env_remove("FLEET_LOG");
    command
}

fn run_args(args: &[&str]) -> (anyhow::Result<()>, String) {
    let cli = Cli::try_parse_from(args).expect("valid arguments");
    let mut out = Vec::new();
    let result = run(cli, &mut out);
    (result, String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn route_between_named_locations() {
    let (result, text) = run_args(&["fleet", "route", "Warehouse", "DeliveryHub"]);
    result.expect("route");
    assert!(text.contains("Shortest distance: 36 km"));
    assert!(text.contains("Path: Warehouse -> ServiceStation -> HighwayJunction -> DeliveryHub"));
}

#[test]
fn manifest_file_replaces_sample_fleet() {
    let mut manifest = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        manifest,
        r#"{{
            "locations": ["North", "South", "Island"],
            "roads": [{{ "from": "North", "to": "South", "km": 9 }}]
        }}"#
    )
    .expect("write");
    let path = manifest.path().to_str().expect("utf-8 path");

    let (result, text) = run_args(&["fleet", "--manifest", path, "route", "South", "North"]);
    result.expect("route");
    assert!(text.contains("Shortest distance: 9 km"));

    let (result, _) = run_args(&["fleet", "--manifest", path, "route", "North", "Island"]);
    assert_eq!(exit_code(&result.unwrap_err()), 8);
}

#[test]
fn batch_file_runs_in_one_session() {
    let mut script = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(script, "account register ravi@fleet.com pw Ravi").expect("write");
    writeln!(script, "account pending").expect("write");
    writeln!(script, "account approve ravi@fleet.com").expect("write");
    writeln!(script, "account login ravi@fleet.com pw").expect("write");
    let path = script.path().to_str().expect("utf-8 path");

    let (result, text) = run_args(&["fleet", "batch", path]);
    result.expect("batch");
    assert!(text.contains("U002 Ravi <ravi@fleet.com> EMPLOYEE PENDING"));
    assert!(text.contains("Welcome U002 Ravi <ravi@fleet.com> EMPLOYEE ACTIVE"));
    assert!(text.contains("Batch finished: 4 commands, 0 failed."));
}

#[test]
fn config_file_bounds_the_scheduler() {
    let mut config = tempfile::NamedTempFile::new().expect("temp file");
    write!(config, r#"{{ "engines": {{ "scheduler": {{ "capacity": 2 }} }} }}"#).expect("write");
    let path = config.path().to_str().expect("utf-8 path");

    let (result, _) = run_args(&["fleet", "--config", path, "maintenance", "add", "V101", "V102", "V103"]);
    assert_eq!(exit_code(&result.unwrap_err()), 6);
}

#[test]
fn empty_fleet_has_nothing_to_dispatch() {
    let (result, _) = run_args(&["fleet", "--empty", "driver", "dequeue"]);
    assert_eq!(exit_code(&result.unwrap_err()), 5);
}

#[test]
fn binary_reports_errors_through_exit_status() {
    let output = fleet_bin()
        .args(["vehicle", "find", "V999"])
        .output()
        .expect("run fleet");
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("vehicle `V999` not found"), "{stderr}");

    let output = fleet_bin()
        .args(["account", "login", "admin@fleet.com", "wrong"])
        .output()
        .expect("run fleet");
    assert_eq!(output.status.code(), Some(9));
}

#[test]
fn binary_demo_succeeds() {
    let output = fleet_bin().arg("demo").output().expect("run fleet");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("== Sorted vehicle index =="));
    assert!(stdout.contains("Demo finished:"));
}
