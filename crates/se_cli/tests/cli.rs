// End-to-end checks of the `se` binary: exit codes, report shape, logging.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

const TALLY: &str = r#"{
    "method": "sainte_lague",
    "total_seats": 7,
    "votes": [
        { "party": "A", "weight": 50 },
        { "party": "B", "weight": 30 },
        { "party": "C", "weight": 20 }
    ]
}"#;

fn se() -> Command {
    let mut cmd = Command::cargo_bin("se").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_tally(dir: &tempfile::TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("tally.json");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn prints_report_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tally(&dir, TALLY);

    se().arg("--input")
        .arg(&input)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""method":"sainte_lague""#))
        .stdout(predicate::str::contains(r#""party":"A","seats":4"#))
        .stdout(predicate::str::contains(r#""house_size":7"#));
}

#[test]
fn method_flag_overrides_file_token() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tally(&dir, TALLY);

    se().arg("--input")
        .arg(&input)
        .arg("--method")
        .arg("rock")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""method":"rock""#));
}

#[test]
fn writes_report_file_and_keeps_stdout_clean() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tally(&dir, TALLY);
    let out = dir.path().join("report.json");

    se().arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--pretty")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let report: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
    assert_eq!(report["seats"].as_array().unwrap().len(), 3);
    assert_eq!(report["seats"][0]["party"], "A");
    assert_eq!(report["seats"][0]["seats"], 4);
    assert_eq!(report["house_size"], 7);
}

#[test]
fn validate_only_stops_before_apportioning() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tally(&dir, TALLY);

    se().arg("--input")
        .arg(&input)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("input OK"));
}

#[test]
fn broken_json_exits_with_validation_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tally(&dir, "{ \"method\": ");

    se().arg("--input")
        .arg(&input)
        .arg("--quiet")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("se: error:"));
}

#[test]
fn unknown_method_in_file_exits_with_validation_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tally(
        &dir,
        r#"{ "method": "dhondt", "total_seats": 4,
             "votes": [ { "party": "A", "weight": 1 } ] }"#,
    );

    se().arg("--input")
        .arg(&input)
        .arg("--quiet")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown method"));
}

#[test]
fn bad_method_flag_is_a_usage_error() {
    se().arg("--input")
        .arg("tally.json")
        .arg("--method")
        .arg("dhondt")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown method"));
}

#[test]
fn missing_input_exits_with_io_code() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.json");

    se().arg("--input")
        .arg(&absent)
        .arg("--quiet")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("se: error: io"));
}

#[test]
fn quiet_silences_status_lines() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tally(&dir, TALLY);
    let out = dir.path().join("report.json");

    se().arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn warns_when_explicit_mandates_shadow_districts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tally(
        &dir,
        r#"{
            "method": "sainte_lague",
            "total_seats": 6,
            "votes": [
                { "party": "A", "weight": 50 },
                { "party": "B", "weight": 30 }
            ],
            "direct_mandates": [ { "party": "A", "count": 1 } ],
            "district_votes": [
                { "district": "D1", "votes": [ { "party": "B", "weight": 10 } ] }
            ]
        }"#,
    );

    se().arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("shadow"));
}
