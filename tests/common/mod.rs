//! Shared fixtures for CLI integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Records one line per invocation: script name, arguments, and the two
/// identity variables as the child saw them.
const RECORDER: &str = r#"#!/bin/sh
echo "$(basename "$0") $* | ident=${HADOOP_IDENT_STRING:-} conf=${HADOOP_CONF_DIR:-}" >> "$HDCTL_TEST_LOG"
"#;

/// A throwaway Hadoop installation made of shell scripts
pub struct FakeHadoop {
    pub dir: TempDir,
}

impl FakeHadoop {
    pub fn new() -> Self {
        let fake = Self {
            dir: TempDir::new().unwrap(),
        };
        for script in ["start-dfs.sh", "start-yarn.sh", "stop-yarn.sh", "stop-dfs.sh"] {
            fake.install("sbin", script, "");
        }
        fake.install(
            "bin",
            "hdfs",
            r#"if [ "$2" = "-ls" ]; then echo "Found 1 items"; fi"#,
        );
        std::fs::create_dir_all(fake.work()).unwrap();
        fake
    }

    /// Replace a script body; the invocation is still recorded first
    pub fn install(&self, dir: &str, name: &str, body: &str) {
        let path = self.home().join(dir).join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, format!("{}{}\n", RECORDER, body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
    }

    pub fn fail(&self, dir: &str, name: &str, code: i32) {
        self.install(dir, name, &format!("exit {}", code));
    }

    pub fn home(&self) -> PathBuf {
        self.dir.path().join("hadoop")
    }

    /// Working directory for the hdctl process
    pub fn work(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("calls.log")
    }

    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn write_data(&self, names: &[&str]) {
        let dir = self.work().join("data_clean");
        std::fs::create_dir_all(&dir).unwrap();
        for name in names {
            std::fs::write(dir.join(format!("{}.json", name)), "{\"id\": 1}\n").unwrap();
        }
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.work().join("hdctl.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    /// `hdctl` pointed at this installation with a scrubbed environment
    pub fn hdctl(&self) -> Command {
        let mut cmd = Command::cargo_bin("hdctl").unwrap();
        cmd.current_dir(self.work())
            .env("HADOOP_HOME", self.home())
            .env("HDCTL_TEST_LOG", self.log_path())
            .env_remove("HADOOP_IDENT_STRING")
            .env_remove("HADOOP_CONF_DIR")
            .env_remove("HDCTL_CONFIG")
            .env_remove("HDCTL_POLICY")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn secondary_conf_dir(&self) -> String {
        Path::new(&self.home())
            .join("etc/hadoop-dn2")
            .display()
            .to_string()
    }
}
