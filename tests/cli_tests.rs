mod common;

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use spendsavvy_core::storage::JsonStore;

use common::temp_home;

fn spendsavvy(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spendsavvy").unwrap();
    cmd.env("SPENDSAVVY_HOME", home)
        .env("SPENDSAVVY_TODAY", "2024-01-21")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn added_id(output: &[u8]) -> String {
    let text = String::from_utf8(output.to_vec()).unwrap();
    text.trim().rsplit(' ').next().unwrap().to_string()
}

#[test]
fn add_and_report_flow() {
    let home = temp_home();
    spendsavvy(&home)
        .args(["add", "expense", "Rent", "100", "2024-01-01", "--repeat", "Weekly"])
        .assert()
        .success()
        .stdout(contains("Added expense"));
    spendsavvy(&home)
        .args([
            "add", "income", "Tips", "20", "2024-01-01", "--repeat", "Daily", "--until",
            "2024-01-03",
        ])
        .assert()
        .success();

    spendsavvy(&home)
        .args(["report", "--from", "2024-01-01", "--to", "2024-01-21"])
        .assert()
        .success()
        .stdout(contains("Total Expenses: $300.00"))
        .stdout(contains("Total Income:   $60.00"))
        .stdout(contains("Net:            -$240.00"))
        .stdout(contains("2024-01-01, 2024-01-08, 2024-01-15"));

    let store = JsonStore::new(Some(home.clone())).unwrap();
    assert!(store.user_path("default").exists());
}

#[test]
fn report_defaults_to_window_ending_today() {
    let home = temp_home();
    spendsavvy(&home)
        .args(["add", "income", "Bonus", "500", "2023-12-25"])
        .assert()
        .success();

    spendsavvy(&home)
        .arg("report")
        .assert()
        .success()
        .stdout(contains("Report 2023-12-23 to 2024-01-21"))
        .stdout(contains("Total Income:   $500.00"));
}

#[test]
fn report_json_output_parses() {
    let home = temp_home();
    spendsavvy(&home)
        .args(["add", "expense", "Gym", "30", "2024-01-02", "--repeat", "7", "--user", "ana"])
        .assert()
        .success();

    let output = spendsavvy(&home)
        .args(["report", "--from", "2024-01-01", "--to", "2024-01-31", "--user", "ana", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["window"]["start"], "2024-01-01");
    assert_eq!(value["expense"]["entries"][0]["occurrences"].as_array().unwrap().len(), 5);
}

#[test]
fn list_and_remove_entries() {
    let home = temp_home();
    let output = spendsavvy(&home)
        .args(["add", "expense", "Phone", "45", "2024-01-10", "--repeat", "30"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = added_id(&output.stdout);

    spendsavvy(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(contains(id.as_str()))
        .stdout(contains("repeat: Monthly"))
        .stdout(contains("next: 2024-02-09"));

    spendsavvy(&home)
        .args(["remove", id.as_str()])
        .assert()
        .success()
        .stdout(contains("Removed"));

    spendsavvy(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No entries recorded."));

    spendsavvy(&home)
        .args(["remove", id.as_str()])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn reversed_window_fails() {
    let home = temp_home();
    spendsavvy(&home)
        .args(["report", "--from", "2024-02-01", "--to", "2024-01-01"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Error: Invalid window"));
}

#[test]
fn invalid_input_is_reported() {
    let home = temp_home();
    spendsavvy(&home)
        .args(["add", "expense", "Rent", "100", "01/02/2024"])
        .assert()
        .failure()
        .stderr(contains("expected YYYY-MM-DD"));
    spendsavvy(&home)
        .args(["add", "expense", "Rent", "100", "2024-01-01", "--repeat", "Fortnightly"])
        .assert()
        .failure()
        .stderr(contains("Invalid repeat interval"));
    spendsavvy(&home)
        .arg("bogus")
        .assert()
        .failure()
        .stderr(contains("Unknown command").and(contains("Usage: spendsavvy")));
}

#[test]
fn version_prints_build_summary() {
    let home = temp_home();
    spendsavvy(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(format!("spendsavvy {}", env!("CARGO_PKG_VERSION"))));
}
