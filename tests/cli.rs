use std::fs;
use std::time::Duration;

use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn runs_to_step_limit() {
    let output = Command::cargo_bin("spatial_sir")
        .unwrap()
        .args(["--random-seed", "1", "--max-time-steps", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Halted at time step 3: maximum time steps reached"));
}

#[test]
fn writes_counts_report() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("params.json");
    fs::write(
        &config,
        r#"{
            "seed": 5,
            "infection_duration_steps": 2,
            "person_types": {
                "SUSCEPTIBLE": { "max_speed": 1, "initial_count": 0 },
                "INFECTED": { "max_speed": 1, "initial_count": 4 },
                "RECOVERED": { "max_speed": 1, "initial_count": 0 }
            }
        }"#,
    )
    .unwrap();
    let output_dir = temp_dir.path().join("out");

    Command::cargo_bin("spatial_sir")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout("Halted at time step 3: no infected agents remain (SUSCEPTIBLE=0, INFECTED=0, RECOVERED=4)\n");

    let report = fs::read_to_string(output_dir.join("counts.csv")).unwrap();
    assert_eq!(
        report,
        "time_step,susceptible,infected,recovered\n\
         0,0,4,0\n\
         1,0,4,0\n\
         2,0,4,0\n\
         3,0,0,4\n"
    );
}

#[test]
fn rejects_invalid_config() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("params.json");
    fs::write(&config, r#"{ "world_width": 0 }"#).unwrap();

    let output = Command::cargo_bin("spatial_sir")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("invalid configuration"));
}

#[cfg(target_os = "linux")]
#[test]
fn fails_when_report_cannot_be_written() {
    let temp_dir = tempdir().unwrap();
    std::os::unix::fs::symlink("/dev/full", temp_dir.path().join("counts.csv")).unwrap();

    let output = Command::cargo_bin("spatial_sir")
        .unwrap()
        .args(["--max-time-steps", "3", "--force-overwrite", "--output-dir"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("Halted"));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error"), "stderr was {stderr:?}");
}

#[test]
fn notes_when_no_halt_condition_can_be_met() {
    // The default parameters never halt: the initial case never recovers and there is no
    // step limit.
    let output = Command::cargo_bin("spatial_sir")
        .unwrap()
        .timeout(Duration::from_secs(2))
        .output()
        .unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no halt condition can be met"), "stderr was {stderr:?}");
}

#[test]
fn no_note_when_run_can_halt() {
    let output = Command::cargo_bin("spatial_sir")
        .unwrap()
        .args(["--max-time-steps", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}
