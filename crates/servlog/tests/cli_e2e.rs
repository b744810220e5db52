//! End-to-end runs of the `servlog` binary. Every test gets its own data
//! directory and a config path that does not exist, so nothing on the host
//! leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn servlog(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("servlog").unwrap();
    cmd.env("SERVLOG_DATA", dir.join("data"))
        .env("SERVLOG_CONFIG", dir.join("missing.toml"))
        .env_remove("SERVLOG_ROOT_KEY")
        .env_remove("SERVLOG_AUTOSAVE_DELAY_MS")
        .env_remove("SERVLOG_LOG");
    cmd
}

fn json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout should be JSON")
}

/// Creates a complete draft and promotes it.
fn add_log(dir: &Path, car: &str, service_type: &str, start: &str) {
    servlog(dir).args(["draft", "new"]).assert().success();
    for (field, value) in [
        ("providerId", "ACME"),
        ("serviceOrder", "SO-1"),
        ("carId", car),
        ("odometer", "12000"),
        ("engineHours", "340"),
        ("startDate", start),
        ("type", service_type),
        ("serviceDescription", "Oil change"),
    ] {
        servlog(dir)
            .args(["draft", "set", field, value])
            .assert()
            .success();
    }
    servlog(dir)
        .arg("promote")
        .assert()
        .success()
        .stdout(predicate::str::contains("Service log created"));
}

#[test]
fn naked_run_lists_drafts() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No drafts"));
}

#[test]
fn draft_edits_persist_between_runs() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path())
        .args(["draft", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft created"));
    servlog(dir.path())
        .args(["draft", "set", "carId", "TRUCK-1"])
        .assert()
        .success();
    servlog(dir.path())
        .args(["draft", "set", "startDate", "2024-02-28"])
        .assert()
        .success();

    servlog(dir.path())
        .args(["draft", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TRUCK-1"))
        .stdout(predicate::str::contains("2024-02-29"))
        .stdout(predicate::str::contains("← Required"));
}

#[test]
fn end_date_cannot_be_set() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path()).args(["draft", "new"]).assert().success();
    servlog(dir.path())
        .args(["draft", "set", "endDate", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("endDate"));
}

#[test]
fn set_without_a_draft_fails() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path())
        .args(["draft", "set", "carId", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active draft"));
}

#[test]
fn incomplete_draft_is_not_promoted() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path()).args(["draft", "new"]).assert().success();
    servlog(dir.path())
        .arg("promote")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Cannot create service log"))
        .stdout(predicate::str::contains(
            "Please complete all required fields.",
        ));
    servlog(dir.path())
        .args(["log", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No service logs."));
}

#[test]
fn promoted_log_is_listed_and_filtered() {
    let dir = TempDir::new().unwrap();
    add_log(dir.path(), "TRUCK-1", "planned", "2024-01-15");
    add_log(dir.path(), "VAN-2", "emergency", "2024-03-01");

    servlog(dir.path())
        .args(["log", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TRUCK-1"))
        .stdout(predicate::str::contains("VAN-2"));

    servlog(dir.path())
        .args(["log", "list", "--type", "planned"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TRUCK-1"))
        .stdout(predicate::str::contains("VAN-2").not());

    servlog(dir.path())
        .args(["log", "list", "--from", "2024-02-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VAN-2"))
        .stdout(predicate::str::contains("TRUCK-1").not());

    servlog(dir.path())
        .args(["log", "list", "--search", "no-such-car"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No service logs match the current filters.",
        ));
}

#[test]
fn filtered_list_keeps_store_indexes() {
    let dir = TempDir::new().unwrap();
    add_log(dir.path(), "TRUCK-1", "planned", "2024-01-15");
    add_log(dir.path(), "VAN-2", "emergency", "2024-03-01");

    // Newest first: VAN-2 is 1, TRUCK-1 is 2, with or without a filter.
    let out = servlog(dir.path())
        .args(["--output", "json", "log", "list", "--type", "planned"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v = json(&out.stdout);
    assert_eq!(v["listedLogs"].as_array().unwrap().len(), 1);
    assert_eq!(v["listedLogs"][0]["index"], 2);
    assert_eq!(v["listedLogs"][0]["log"]["carId"], "TRUCK-1");
}

#[test]
fn bad_filter_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path())
        .args(["log", "list", "--type", "weekly"])
        .assert()
        .failure();
    servlog(dir.path())
        .args(["log", "list", "--from", "15/01/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn log_edit_validates_before_writing() {
    let dir = TempDir::new().unwrap();
    add_log(dir.path(), "TRUCK-1", "planned", "2024-01-15");

    servlog(dir.path())
        .args(["log", "edit", "1", "carId=TRUCK-7", "startDate=2024-06-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Service log updated"));

    servlog(dir.path())
        .args(["log", "edit", "1", "carId="])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Validation failed"));

    let out = servlog(dir.path())
        .args(["--output", "json", "log", "show", "1"])
        .output()
        .unwrap();
    let v = json(&out.stdout);
    assert_eq!(v["listedLogs"][0]["log"]["carId"], "TRUCK-7");
    assert_eq!(v["listedLogs"][0]["log"]["endDate"], "2024-06-02");
}

#[test]
fn deletes_need_confirmation_without_a_terminal() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path()).args(["draft", "new"]).assert().success();

    servlog(dir.path())
        .args(["draft", "delete"])
        .write_stdin("y\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    servlog(dir.path())
        .args(["draft", "delete", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft deleted"));

    servlog(dir.path())
        .args(["draft", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No drafts"));
}

#[test]
fn log_delete_with_yes() {
    let dir = TempDir::new().unwrap();
    add_log(dir.path(), "TRUCK-1", "planned", "2024-01-15");
    servlog(dir.path())
        .args(["log", "delete", "1", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Service log deleted"));
    servlog(dir.path())
        .args(["log", "show", "1"])
        .assert()
        .failure();
}

#[test]
fn json_output_for_drafts() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path()).args(["draft", "new"]).assert().success();
    servlog(dir.path()).args(["draft", "new"]).assert().success();

    let out = servlog(dir.path())
        .args(["draft", "list", "--output", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v = json(&out.stdout);
    let drafts = v["listedDrafts"].as_array().unwrap();
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0]["active"], true);
    assert_eq!(drafts[1]["active"], false);
}

#[test]
fn select_switches_the_active_draft() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path()).args(["draft", "new"]).assert().success();
    servlog(dir.path()).args(["draft", "new"]).assert().success();
    servlog(dir.path()).args(["draft", "select", "2"]).assert().success();
    servlog(dir.path())
        .args(["draft", "set", "carId", "OLDER"])
        .assert()
        .success();

    let out = servlog(dir.path())
        .args(["--output", "json", "draft", "list"])
        .output()
        .unwrap();
    let v = json(&out.stdout);
    assert_eq!(v["listedDrafts"][1]["active"], true);
    assert_eq!(v["listedDrafts"][1]["draft"]["carId"], "OLDER");

    servlog(dir.path())
        .args(["draft", "select", "9"])
        .assert()
        .failure();
}

#[test]
fn session_reads_commands_and_flushes_autosave() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path())
        .arg("session")
        .write_stdin("new\nset carId CAR-5\nset serviceDescription Brake pads and rotors\nlist\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft created"))
        .stdout(predicate::str::contains("CAR-5"));

    let out = servlog(dir.path())
        .args(["--output", "json", "draft", "show"])
        .output()
        .unwrap();
    let v = json(&out.stdout);
    let draft = &v["listedDrafts"][0]["draft"];
    assert_eq!(draft["carId"], "CAR-5");
    assert_eq!(draft["serviceDescription"], "Brake pads and rotors");
    assert_eq!(draft["savingStatus"], "saved");
}

#[test]
fn session_confirms_on_the_next_line() {
    let dir = TempDir::new().unwrap();
    servlog(dir.path())
        .arg("session")
        .write_stdin("new\nnew\nclear\nn\nlist\nclear\nyes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Delete all 2 drafts? [y/N]"))
        .stdout(predicate::str::contains("Cancelled."))
        .stdout(predicate::str::contains("All drafts cleared"));

    servlog(dir.path())
        .args(["draft", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No drafts"));
}

#[test]
fn config_reports_locations() {
    let dir = TempDir::new().unwrap();
    let out = servlog(dir.path())
        .args(["config", "--output", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v = json(&out.stdout);
    assert_eq!(v["config"]["autosave_delay_ms"], 500);
    assert_eq!(v["configFileFound"], false);
    assert!(v["document"].as_str().unwrap().ends_with("root.json"));
}

#[test]
fn data_flag_overrides_environment() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("elsewhere");
    servlog(dir.path())
        .args(["--data", other.to_str().unwrap(), "draft", "new"])
        .assert()
        .success();
    assert!(other.join("root.json").exists());
    assert!(!dir.path().join("data").join("root.json").exists());
}
