//! Integration tests for the bl_cli binary.
//!
//! Runs the compiled binary with a roster on stdin and checks the JSON it prints.

use serde_json::Value;
use std::io::Write;
use std::process::{Command, Output, Stdio};

const BL_VARS: [&str; 5] = [
    "BL_PLAYERS_FILE",
    "BL_SEED",
    "BL_SHUFFLE",
    "BL_OCCUPIED_TABLES",
    "BL_PRETTY",
];

/// Helper to run the binary with `args` and `stdin`
fn run(args: &[&str], stdin: &str) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_bl_cli"));
    for var in BL_VARS {
        command.env_remove(var);
    }
    let mut child = command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start bl_cli");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write roster");
    child.wait_with_output().expect("bl_cli did not finish")
}

fn roster(plain: usize, tarot: usize) -> String {
    let players: Vec<Value> = (0..plain)
        .map(|i| serde_json::json!({ "name": format!("p{i}") }))
        .chain((0..tarot).map(|i| {
            serde_json::json!({ "name": format!("t{i}"), "can_play_tarot": true })
        }))
        .collect();
    Value::Array(players).to_string()
}

fn parse(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "bl_cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_seats_roster_from_stdin() {
    let output = run(&["--seed", "3"], &roster(4, 5));
    let json = parse(&output);
    let tables = json.as_object().unwrap();

    assert_eq!(tables["panama"].as_array().unwrap().len(), 0);
    let mut sizes: Vec<usize> = tables
        .iter()
        .filter(|(name, _)| name.starts_with("Table "))
        .map(|(_, seats)| seats.as_array().unwrap().len())
        .collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![4, 5]);
}

#[test]
fn test_unshuffled_output_is_stable() {
    let first = parse(&run(&["--no-shuffle"], &roster(7, 0)));
    let second = parse(&run(&["--no-shuffle"], &roster(7, 0)));
    assert_eq!(first, second);
    assert_eq!(first["panama"][0]["name"], "p0");
    assert_eq!(first["Table 1"].as_array().unwrap().len(), 6);
}

#[test]
fn test_occupied_tables_are_skipped() {
    let json = parse(&run(&["--no-shuffle", "--occupied", "1,2"], &roster(4, 0)));
    assert!(json.get("Table 1").is_none());
    assert_eq!(json["Table 3"].as_array().unwrap().len(), 4);
}

#[test]
fn test_duplicate_players_fail() {
    let output = run(&[], r#"[{"name": "ana"}, {"name": "ana"}]"#);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ana"));
}

#[test]
fn test_help() {
    let output = run(&["--help"], "");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("USAGE"));
}
