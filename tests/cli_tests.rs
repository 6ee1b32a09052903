//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ROWS: &[&str] = &[
    "      0.00 |   1.00 |      1000 |      2000 |      100 | 1.00e-02 | 2.00e-01 ||    0.100 | 00h00'01",
    "      0.00 |   2.00 |      1000 |      2000 |      100 | 1.00e-02 | 4.50e-02 ||    0.100 | 00h00'01",
    "      0.00 |   3.00 |      1000 |      2000 |      100 | 1.00e-02 | 7.10e-03 ||    0.100 | 00h00'01",
];

fn simregress(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("simregress").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("SIMREGRESS_REFS_PATH")
        .env_remove("SIMREGRESS_RESULTS_PATH")
        .env_remove("SIMREGRESS_BUILD_PATH");
    cmd
}

/// Lay out `refs/BCH/case.txt` recording a run of `sh bin/sim.sh`
fn write_reference(dir: &Path) {
    write_reference_at(dir, "refs/BCH/case.txt");
}

fn write_reference_at(dir: &Path, relative: &str) {
    let mut content = String::from(
        "Run command:\n\
         sh bin/sim.sh --sim-type \"BFER\" -K \"4\"\n\
         Trace:\n\
         # -------------------------------\n\
         # Simulation parameters\n\
         # -------------------------------\n\
         #  Es/N0 | Eb/N0 | FRA | BE | FE | BER | FER || THR | ET/RT\n",
    );
    for row in ROWS {
        content.push_str(row);
        content.push('\n');
    }
    content.push_str("# End of the simulation.\n");

    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Install `build/bin/sim.sh`; it is run through `sh` and never executed directly
fn write_simulator(dir: &Path, body: &str) {
    fs::create_dir_all(dir.join("build/bin")).unwrap();
    fs::write(dir.join("build/bin/sim.sh"), body).unwrap();
}

fn printing_simulator(rows: &[&str]) -> String {
    let mut script = String::from("echo \"# Simulation parameters\"\necho \"(II) starting\"\n");
    for row in rows {
        script.push_str(&format!("echo \"{row}\"\n"));
    }
    script.push_str("echo \"# End of the simulation.\"\n");
    script
}

#[test]
fn test_version_flag() {
    let temp_dir = TempDir::new().unwrap();
    simregress(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("simregress"));
}

#[test]
fn test_help_flag() {
    let temp_dir = TempDir::new().unwrap();
    simregress(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "A CLI tool for replaying simulation reference results",
        ))
        .stdout(predicate::str::contains("--weak-rate"));
}

#[test]
fn test_output_format_requires_dry_run() {
    let temp_dir = TempDir::new().unwrap();
    simregress(temp_dir.path())
        .args(["--output-format", "json"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_missing_config_error() {
    let temp_dir = TempDir::new().unwrap();
    simregress(temp_dir.path())
        .args(["--config", "nonexistent.yaml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_invalid_config_values() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("simregress.yaml"), "weak-rate: 2\n").unwrap();

    simregress(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Configuration validation failed"));
}

#[test]
fn test_results_path_is_a_file() {
    let temp_dir = TempDir::new().unwrap();
    write_reference(temp_dir.path());
    fs::write(temp_dir.path().join("results"), "").unwrap();

    simregress(temp_dir.path())
        .args(["--results-path", "results"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "The results path should not be an existing file",
        ));
}

#[test]
fn test_missing_refs_path() {
    let temp_dir = TempDir::new().unwrap();

    simregress(temp_dir.path())
        .args(["--refs-path", "nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist"))
        .stdout(predicate::str::contains("There is no simulation to replay."));

    assert!(temp_dir.path().join("test-regression-results").is_dir());
}

#[test]
fn test_dry_run_shell() {
    let temp_dir = TempDir::new().unwrap();
    write_reference(temp_dir.path());

    simregress(temp_dir.path())
        .args(["--dry-run", "--max-snr-time", "0", "--n-threads", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Test n°1 / 1 - BCH/case.txt"))
        .stdout(predicate::str::contains(
            "cd build && sh \\\n  bin/sim.sh \\\n  --sim-type \\\n  BFER \\\n  -K \\\n  4 \\\n",
        ))
        .stdout(predicate::str::contains(
            "  -t \\\n  2 \\\n  --sim-no-colors\n",
        ));

    assert!(!temp_dir.path().join("test-regression-results").exists());
}

#[test]
fn test_dry_run_json() {
    let temp_dir = TempDir::new().unwrap();
    write_reference(temp_dir.path());

    let output = simregress(temp_dir.path())
        .args(["--dry-run", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing[0]["id"], 1);
    assert_eq!(listing[0]["program"], "sh");
    assert_eq!(listing[0]["working_dir"], "build");
    assert_eq!(listing[0]["args"][0], "bin/sim.sh");
}

#[test]
fn test_refs_path_precedence() {
    let temp_dir = TempDir::new().unwrap();
    write_reference_at(temp_dir.path(), "yaml-refs/from-yaml.txt");
    write_reference_at(temp_dir.path(), "env-refs/from-env.txt");
    write_reference_at(temp_dir.path(), "flag-refs/from-flag.txt");
    fs::write(
        temp_dir.path().join("simregress.yaml"),
        "refs-path: yaml-refs\n",
    )
    .unwrap();

    simregress(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("from-yaml.txt"));

    simregress(temp_dir.path())
        .env("SIMREGRESS_REFS_PATH", "env-refs")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("from-env.txt"))
        .stdout(predicate::str::contains("from-yaml.txt").not());

    simregress(temp_dir.path())
        .env("SIMREGRESS_REFS_PATH", "env-refs")
        .args(["--dry-run", "--refs-path", "flag-refs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from-flag.txt"))
        .stdout(predicate::str::contains("from-env.txt").not())
        .stdout(predicate::str::contains("from-yaml.txt").not());
}

#[test]
fn test_build_and_results_paths_from_env() {
    let temp_dir = TempDir::new().unwrap();
    write_reference(temp_dir.path());

    simregress(temp_dir.path())
        .env("SIMREGRESS_BUILD_PATH", "env-build")
        .env("SIMREGRESS_RESULTS_PATH", "env-results")
        .args(["--refs-path", "nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build path     = env-build"))
        .stdout(predicate::str::contains("results path   = env-results"));

    assert!(temp_dir.path().join("env-results").is_dir());
}

#[cfg(unix)]
#[test]
fn test_verbose_prints_details() {
    let temp_dir = TempDir::new().unwrap();
    write_reference(temp_dir.path());
    write_simulator(temp_dir.path(), &printing_simulator(ROWS));

    simregress(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("STRONG PASSED."))
        .stdout(predicate::str::contains("---- Details:").not());

    simregress(temp_dir.path())
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "---- Details: 'valid SNR points' = 3 / 3",
        ))
        .stdout(predicate::str::contains("'first SNR point' = 1.00 dB"));
}

#[cfg(unix)]
#[test]
fn test_replay_strong_pass() {
    let temp_dir = TempDir::new().unwrap();
    write_reference(temp_dir.path());
    write_simulator(temp_dir.path(), &printing_simulator(ROWS));

    simregress(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting the test script..."))
        .stdout(predicate::str::contains("Test n°1 / 1 - BCH/case.txt"))
        .stdout(predicate::str::contains("STRONG PASSED."))
        .stdout(predicate::str::contains("All the tests PASSED !"));

    let result =
        fs::read_to_string(temp_dir.path().join("test-regression-results/BCH/case.txt")).unwrap();
    assert!(result.starts_with("# Simulation parameters\n"));
    assert!(!result.contains("WRONG!"));
    assert!(result.ends_with("# End of the simulation.\n"));
}

#[cfg(unix)]
#[test]
fn test_replay_failure_sets_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    write_reference(temp_dir.path());
    let drifted: Vec<String> = ROWS
        .iter()
        .map(|row| row.replace("2.00e-01", "6.00e-01").replace("4.50e-02", "9.50e-02"))
        .collect();
    let drifted: Vec<&str> = drifted.iter().map(String::as_str).collect();
    write_simulator(temp_dir.path(), &printing_simulator(&drifted));

    simregress(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("FAILED."))
        .stdout(predicate::str::contains("Some tests FAILED: n°1."));

    let result =
        fs::read_to_string(temp_dir.path().join("test-regression-results/BCH/case.txt")).unwrap();
    assert!(result.contains("WRONG! FER=2.00e-01"));
    assert!(result.contains("WRONG! FER=4.50e-02"));
}

#[cfg(unix)]
#[test]
fn test_replay_stderr_aborts() {
    let temp_dir = TempDir::new().unwrap();
    write_reference(temp_dir.path());
    write_simulator(temp_dir.path(), "echo \"(EE) unknown decoder\" >&2\n");

    simregress(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("ABORTED."))
        .stdout(predicate::str::contains("(EE) unknown decoder"));

    assert!(
        !temp_dir
            .path()
            .join("test-regression-results/BCH/case.txt")
            .exists()
    );
}
