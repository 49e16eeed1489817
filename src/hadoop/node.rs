//! Single-daemon control for an extra DataNode on the same host.
//!
//! Two DataNodes on one machine need separate configuration directories
//! (ports, data dirs) and separate identity strings, otherwise their pid and
//! log files collide under `$HADOOP_PID_DIR` / `$HADOOP_LOG_DIR`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::layout::HadoopLayout;
use crate::error::{ErrorCode, HdctlError};
use crate::subprocess::{ProcessCommand, ProcessCommandBuilder};

pub const HADOOP_CONF_DIR: &str = "HADOOP_CONF_DIR";
pub const HADOOP_IDENT_STRING: &str = "HADOOP_IDENT_STRING";

pub const DEFAULT_IDENT: &str = "dn2";
pub const DEFAULT_CONF_SUBDIR: &str = "etc/hadoop-dn2";

/// Configuration directory and identity string of one daemon process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub conf_dir: PathBuf,
    pub ident: String,
}

impl NodeIdentity {
    pub fn new(conf_dir: impl Into<PathBuf>, ident: impl Into<String>) -> Result<Self, HdctlError> {
        let identity = Self {
            conf_dir: conf_dir.into(),
            ident: ident.into(),
        };
        identity.validate()?;
        Ok(identity)
    }

    /// The second DataNode's identity for a given installation
    pub fn secondary_default(home: Option<&Path>) -> Self {
        let conf_dir = match home {
            Some(home) => home.join(DEFAULT_CONF_SUBDIR),
            None => PathBuf::from(DEFAULT_CONF_SUBDIR),
        };
        Self {
            conf_dir,
            ident: DEFAULT_IDENT.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), HdctlError> {
        if self.ident.is_empty()
            || self.ident.contains('/')
            || self.ident.chars().any(char::is_whitespace)
        {
            return Err(HdctlError::validation_with_code(
                ErrorCode::VALIDATION_INVALID_IDENT,
                format!(
                    "identity string {:?} must be non-empty without whitespace or '/'",
                    self.ident
                ),
                Some("secondary_datanode.ident".to_string()),
            ));
        }
        if self.conf_dir.as_os_str().is_empty() {
            return Err(HdctlError::validation_with_code(
                ErrorCode::VALIDATION_GENERIC,
                "configuration directory must not be empty",
                Some("secondary_datanode.conf_dir".to_string()),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonAction {
    Start,
    Stop,
}

impl fmt::Display for DaemonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaemonAction::Start => write!(f, "start"),
            DaemonAction::Stop => write!(f, "stop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonRole {
    DataNode,
}

impl fmt::Display for DaemonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaemonRole::DataNode => write!(f, "datanode"),
        }
    }
}

/// `hdfs --daemon <action> <role>` under an explicit identity.
///
/// The overrides ride on this one child process; the caller's environment
/// is left untouched.
pub fn daemon_command(
    layout: &HadoopLayout,
    action: DaemonAction,
    role: DaemonRole,
    identity: &NodeIdentity,
    timeout: Option<Duration>,
) -> ProcessCommand {
    ProcessCommandBuilder::new(&layout.hdfs())
        .args([
            "--daemon",
            action.to_string().as_str(),
            role.to_string().as_str(),
        ])
        .env(HADOOP_CONF_DIR, &identity.conf_dir.to_string_lossy())
        .env(HADOOP_IDENT_STRING, &identity.ident)
        .maybe_timeout(timeout)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_default_under_home() {
        let id = NodeIdentity::secondary_default(Some(Path::new("/opt/hadoop")));
        assert_eq!(id.conf_dir, PathBuf::from("/opt/hadoop/etc/hadoop-dn2"));
        assert_eq!(id.ident, "dn2");
        assert!(id.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_ident() {
        for bad in ["", "dn 2", "a/b"] {
            assert!(NodeIdentity::new("/conf", bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_daemon_command_carries_identity() {
        let layout = HadoopLayout::new(Some(PathBuf::from("/opt/hadoop")));
        let id = NodeIdentity::new("/opt/hadoop/etc/dn2", "dn2").unwrap();
        let cmd = daemon_command(&layout, DaemonAction::Start, DaemonRole::DataNode, &id, None);

        assert_eq!(cmd.program, "/opt/hadoop/bin/hdfs");
        assert_eq!(cmd.args, vec!["--daemon", "start", "datanode"]);
        assert_eq!(cmd.env.get(HADOOP_IDENT_STRING).map(String::as_str), Some("dn2"));
        assert_eq!(
            cmd.env.get(HADOOP_CONF_DIR).map(String::as_str),
            Some("/opt/hadoop/etc/dn2")
        );
    }
}
