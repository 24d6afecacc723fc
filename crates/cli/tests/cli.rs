use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/fixtures")
}

fn command(bin: &str) -> Command {
    let mut cmd = Command::cargo_bin(bin).expect("binary built");
    cmd.env_remove("RUST_LOG")
        .arg("--profile")
        .arg(fixtures().join("profile.yaml"))
        .arg("--templates")
        .arg(fixtures());
    cmd
}

#[test]
fn planner_reports_obsolescence_counts() {
    command("planner")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Drives (7 unlocked, 1 obsolete) ==="))
        .stdout(predicate::str::contains("=== Reactors (4 unlocked, 2 obsolete) ==="))
        .stdout(predicate::str::contains("=== Combos (8 unlocked, 3 obsolete;"))
        .stdout(predicate::str::contains("Hydrogen Resistojet x1").not());
}

#[test]
fn planner_lists_obsolete_entries_on_request() {
    command("planner")
        .arg("--show-obsolete")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hydrogen Resistojet x1"))
        .stdout(predicate::str::contains("[obsolete; beaten by Tungsten Resistojet x1]"));
}

#[test]
fn planner_exports_tables() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out");
    command("planner")
        .arg("--export-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    for file in ["drives.csv", "reactors.csv", "combos.csv", "report.json"] {
        assert!(out.join(file).is_file(), "{file} missing");
    }
}

#[test]
fn mission_lists_feasible_designs() {
    command("mission")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Mission Feasibility ==="))
        .stdout(predicate::str::contains("Antimatter Plasma x1 + Antimatter Reactor"))
        .stdout(predicate::str::contains("Tokamak Torch x1 + Tokamak"));
}

#[test]
fn mission_reports_when_nothing_fits() {
    command("mission")
        .args(["--delta-v", "5000", "--accel", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No drive + reactor combination meets"));
}

#[test]
fn mission_warns_on_non_positive_targets() {
    command("mission")
        .args(["--delta-v", "0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning:"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn mission_rejects_negative_payload_floor() {
    command("mission")
        .args(["--min-payload", "-10"])
        .assert()
        .success()
        .stderr(predicate::str::contains("minimum payload"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn mission_writes_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mission.json");
    command("mission")
        .arg("--report")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let text = std::fs::read_to_string(&path).expect("report written");
    let json: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(json["mission"]["target"]["delta_v_km_s"], 30.0);
    let designs = json["mission"]["designs"].as_array().expect("designs array");
    assert_eq!(designs.len(), 2);
    assert_eq!(designs[0]["drive"], "Antimatter Plasma x1");
    assert_eq!(json["combos"].as_array().map(Vec::len), Some(8));
}

#[test]
fn mission_writes_csv_to_stdout() {
    command("mission")
        .args(["--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("drive,reactor,payload_tons"))
        .stdout(predicate::str::contains("=== Mission").not());
}

#[test]
fn missing_templates_fail() {
    let empty = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("planner")
        .expect("binary built")
        .env("TI_TEMPLATES_DIR", empty.path())
        .current_dir(empty.path())
        .arg("--profile")
        .arg(fixtures().join("profile.yaml"))
        .arg("--templates")
        .arg(empty.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("TIPowerPlantTemplate.json"));
}
