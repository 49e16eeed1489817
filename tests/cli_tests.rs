//! Integration tests for the CLI interface
//!
//! Every test drives the real binary against a fake Hadoop installation
//! whose scripts append their invocation to a log file.

#![cfg(unix)]

mod common;

use assert_cmd::Command;
use common::FakeHadoop;
use predicates::prelude::*;

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::cargo_bin("hdctl").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_no_command_shows_usage() {
    let mut cmd = Command::cargo_bin("hdctl").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_policy_flag() {
    let hadoop = FakeHadoop::new();
    hadoop
        .hdctl()
        .args(["--policy", "retry", "start"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown failure policy"));
}

#[test]
fn test_start_runs_in_order_with_isolated_identity() {
    let hadoop = FakeHadoop::new();

    hadoop
        .hdctl()
        .arg("start")
        .assert()
        .success()
        .stdout(predicate::str::contains("All Hadoop services started."));

    let calls = hadoop.calls();
    assert_eq!(calls.len(), 3, "{calls:?}");
    assert_eq!(calls[0], "start-dfs.sh  | ident= conf=");
    assert_eq!(
        calls[1],
        format!(
            "hdfs --daemon start datanode | ident=dn2 conf={}",
            hadoop.secondary_conf_dir()
        )
    );
    assert_eq!(calls[2], "start-yarn.sh  | ident= conf=");
}

#[test]
fn test_stop_runs_in_reverse_order() {
    let hadoop = FakeHadoop::new();

    hadoop
        .hdctl()
        .arg("stop")
        .assert()
        .success()
        .stdout(predicate::str::contains("All Hadoop services stopped."));

    let calls = hadoop.calls();
    assert!(calls[0].starts_with("hdfs --daemon stop datanode | ident=dn2"));
    assert!(calls[1].starts_with("stop-yarn.sh"));
    assert!(calls[2].starts_with("stop-dfs.sh"));
}

#[test]
fn test_start_failure_halts_without_success_message() {
    let hadoop = FakeHadoop::new();
    hadoop.fail("sbin", "start-dfs.sh", 1);

    hadoop
        .hdctl()
        .arg("start")
        .assert()
        .code(5)
        .stdout(predicate::str::contains("All Hadoop services started.").not())
        .stderr(predicate::str::contains("start HDFS daemons"))
        .stderr(predicate::str::contains("exited with code 1"));

    assert_eq!(hadoop.calls().len(), 1);
}

#[test]
fn test_continue_policy_runs_everything_but_still_fails() {
    let hadoop = FakeHadoop::new();
    hadoop.fail("sbin", "start-dfs.sh", 1);

    hadoop
        .hdctl()
        .args(["--policy", "continue", "start"])
        .assert()
        .code(5)
        .stdout(predicate::str::contains("All Hadoop services started.").not());

    assert_eq!(hadoop.calls().len(), 3);
}

#[test]
fn test_policy_from_environment() {
    let hadoop = FakeHadoop::new();
    hadoop.fail("bin", "hdfs", 1);

    hadoop
        .hdctl()
        .env("HDCTL_POLICY", "continue")
        .arg("stop")
        .assert()
        .code(5);

    assert_eq!(hadoop.calls().len(), 3);
}

#[test]
fn test_import_uploads_and_lists() {
    let hadoop = FakeHadoop::new();
    hadoop.write_data(&["locations", "sensors", "measurements"]);

    hadoop
        .hdctl()
        .arg("import")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 items").count(2))
        .stdout(predicate::str::contains("JSON files imported into Hadoop!"));

    let calls = hadoop.calls();
    assert_eq!(calls.len(), 8);
    assert!(calls[0].starts_with("hdfs dfs -mkdir -p /air_quality/locations |"));
    assert!(calls[5].starts_with(
        "hdfs dfs -put -f data_clean/measurements.json /air_quality/measurements |"
    ));
    assert!(calls[7].starts_with("hdfs dfs -ls /air_quality/sensors |"));
    assert!(calls.iter().all(|c| c.ends_with("| ident= conf=")));
}

#[test]
fn test_import_twice_is_idempotent() {
    let hadoop = FakeHadoop::new();
    hadoop.write_data(&["locations", "sensors", "measurements"]);

    hadoop.hdctl().arg("import").assert().success();
    let first = hadoop.calls();
    hadoop.hdctl().arg("import").assert().success();
    let all = hadoop.calls();

    assert_eq!(all.len(), first.len() * 2);
    assert_eq!(&all[..first.len()], &all[first.len()..]);
}

#[test]
fn test_import_missing_measurements_is_reported() {
    let hadoop = FakeHadoop::new();
    hadoop.write_data(&["locations", "sensors"]);

    hadoop
        .hdctl()
        .arg("import")
        .assert()
        .code(5)
        .stdout(predicate::str::contains("JSON files imported into Hadoop!").not())
        .stderr(predicate::str::contains(
            "missing input file data_clean/measurements.json",
        ));

    let calls = hadoop.calls();
    assert_eq!(
        calls.iter().filter(|c| c.contains("-mkdir -p")).count(),
        3
    );
    assert_eq!(calls.iter().filter(|c| c.contains("-put -f")).count(), 2);
    assert!(!calls.iter().any(|c| c.contains("-ls")));
}

#[test]
fn test_dry_run_prints_plan_and_runs_nothing() {
    let hadoop = FakeHadoop::new();

    hadoop
        .hdctl()
        .args(["start", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan 'start' (3 steps)"))
        .stdout(predicate::str::contains("env: HADOOP_CONF_DIR="))
        .stdout(predicate::str::contains("HADOOP_IDENT_STRING=dn2"))
        .stdout(predicate::str::contains("All Hadoop services started.").not());

    assert!(hadoop.calls().is_empty());
}

#[test]
fn test_json_report() {
    let hadoop = FakeHadoop::new();
    hadoop.fail("sbin", "stop-yarn.sh", 3);

    let output = hadoop
        .hdctl()
        .args(["stop", "--json"])
        .assert()
        .code(5)
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["plan"], "stop");
    assert_eq!(report["policy"], "halt");
    assert_eq!(report["outcomes"][0]["status"], "succeeded");
    assert_eq!(report["outcomes"][1]["status"], "failed");
    assert_eq!(report["outcomes"][1]["exit_code"], 3);
    assert_eq!(report["outcomes"][2]["status"], "skipped");
}

#[test]
fn test_config_file_secondary_identity() {
    let hadoop = FakeHadoop::new();
    hadoop.write_config(
        r#"
[secondary_datanode]
conf_dir = "/srv/dn-b/conf"
ident = "dnb"
"#,
    );

    hadoop.hdctl().arg("start").assert().success();

    assert_eq!(
        hadoop.calls()[1],
        "hdfs --daemon start datanode | ident=dnb conf=/srv/dn-b/conf"
    );
}

#[test]
fn test_invalid_config_exits_with_config_code() {
    let hadoop = FakeHadoop::new();
    hadoop.write_config("policy = [\n");

    hadoop
        .hdctl()
        .arg("start")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration problem"));

    assert!(hadoop.calls().is_empty());
}

#[test]
fn test_config_command_prints_effective_settings() {
    let hadoop = FakeHadoop::new();

    hadoop
        .hdctl()
        .args(["--policy", "continue", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("policy = \"continue\""))
        .stdout(predicate::str::contains(format!(
            "hadoop_home = \"{}\"",
            hadoop.home().display()
        )))
        .stdout(predicate::str::contains("/air_quality/measurements"));
}

#[test]
fn test_pipeline_halts_on_first_failure() {
    let hadoop = FakeHadoop::new();
    hadoop.write_config(
        r#"
[pipeline]
pause = "0s"

[[pipeline.steps]]
description = "first"
command = "echo one"

[[pipeline.steps]]
description = "second"
command = "false"

[[pipeline.steps]]
description = "third"
command = "echo three"
"#,
    );

    hadoop
        .hdctl()
        .arg("pipeline")
        .assert()
        .code(5)
        .stdout(predicate::str::contains("=== first ==="))
        .stdout(predicate::str::contains("Running: echo one"))
        .stdout(predicate::str::contains("Completed: first"))
        .stdout(predicate::str::contains("three").not())
        .stdout(predicate::str::contains("Pipeline complete.").not())
        .stderr(predicate::str::contains("ERROR: Step failed: second"));
}

#[test]
fn test_pipeline_invokes_hdctl_itself() {
    let hadoop = FakeHadoop::new();
    let config = hadoop.write_config(
        r#"
[pipeline]
pause = "0s"

[[pipeline.steps]]
description = "Importing data into HDFS"
command = "hdctl import --dry-run"
"#,
    );

    hadoop
        .hdctl()
        .arg("--config")
        .arg(&config)
        .arg("pipeline")
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan 'import' (8 steps)"))
        .stdout(predicate::str::contains("Pipeline complete."));
}

const PIPELINE_IMPORT_ONLY: &str = r#"
[pipeline]
pause = "0s"

[[pipeline.steps]]
description = "Importing data into HDFS"
command = "hdctl import"
"#;

#[test]
fn test_pipeline_forwards_hadoop_home_flag() {
    let hadoop = FakeHadoop::new();
    hadoop.write_data(&["locations", "sensors", "measurements"]);
    let config = hadoop.write_config(PIPELINE_IMPORT_ONLY);

    hadoop
        .hdctl()
        .env_remove("HADOOP_HOME")
        .arg("--hadoop-home")
        .arg(hadoop.home())
        .arg("--config")
        .arg(&config)
        .arg("pipeline")
        .assert()
        .success()
        .stdout(predicate::str::contains("JSON files imported into Hadoop!"))
        .stdout(predicate::str::contains("Pipeline complete."));

    assert_eq!(hadoop.calls().len(), 8);
}

#[test]
fn test_pipeline_forwards_policy_flag() {
    let hadoop = FakeHadoop::new();
    hadoop.write_data(&["locations", "sensors"]);
    let config = hadoop.write_config(PIPELINE_IMPORT_ONLY);

    hadoop
        .hdctl()
        .args(["--policy", "continue", "--config"])
        .arg(&config)
        .arg("pipeline")
        .assert()
        .code(5)
        .stdout(predicate::str::contains("Pipeline complete.").not());

    // The nested import kept going past the missing measurements file
    let calls = hadoop.calls();
    assert_eq!(calls.len(), 7, "{calls:?}");
    assert_eq!(calls.iter().filter(|c| c.contains("-ls")).count(), 2);
}

#[test]
fn test_pipeline_forwards_verbosity() {
    let hadoop = FakeHadoop::new();
    hadoop.write_config(
        r#"
[pipeline]
pause = "0s"

[[pipeline.steps]]
description = "Preview import"
command = "hdctl import --dry-run"
"#,
    );

    hadoop
        .hdctl()
        .args(["-v", "pipeline"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Built plan 'import' with 8 steps"));
}

#[test]
fn test_timed_out_step_shows_output_so_far() {
    let hadoop = FakeHadoop::new();
    hadoop.write_config(
        r#"
step_timeout = "1s"

[pipeline]
pause = "0s"

[[pipeline.steps]]
description = "download"
command = "sh -c 'echo downloaded-part-1; sleep 3'"
"#,
    );

    hadoop
        .hdctl()
        .arg("pipeline")
        .assert()
        .code(5)
        .stdout(predicate::str::contains("=== download ==="))
        .stdout(predicate::str::contains("downloaded-part-1"))
        .stderr(predicate::str::contains("ERROR: Step failed: download (timed out)"));
}
