use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use super::layout::HadoopLayout;
use crate::error::{ErrorCode, HdctlError};
use crate::subprocess::{ProcessCommand, ProcessCommandBuilder};

/// An absolute, normalized path inside HDFS
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HdfsPath(pub(crate) String);

impl HdfsPath {
    pub fn parse(raw: &str) -> Result<Self, HdctlError> {
        let invalid = |why: &str| {
            HdctlError::validation_with_code(
                ErrorCode::VALIDATION_INVALID_PATH,
                format!("{:?} {}", raw, why),
                None,
            )
        };

        if !raw.starts_with('/') {
            return Err(invalid("is not absolute"));
        }
        if raw == "/" {
            return Ok(Self(raw.to_string()));
        }

        let trimmed = raw.strip_suffix('/').unwrap_or(raw);
        for segment in trimmed[1..].split('/') {
            match segment {
                "" => return Err(invalid("contains an empty segment")),
                "." | ".." => return Err(invalid("contains a relative segment")),
                _ => {}
            }
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HdfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HdfsPath {
    type Err = HdctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HdfsPath {
    type Error = HdctlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HdfsPath> for String {
    fn from(path: HdfsPath) -> Self {
        path.0
    }
}

/// Builds `hdfs dfs` invocations
pub struct DfsCommands<'a> {
    layout: &'a HadoopLayout,
    timeout: Option<Duration>,
}

impl<'a> DfsCommands<'a> {
    pub fn new(layout: &'a HadoopLayout, timeout: Option<Duration>) -> Self {
        Self { layout, timeout }
    }

    fn dfs(&self) -> ProcessCommandBuilder {
        ProcessCommandBuilder::new(&self.layout.hdfs())
            .arg("dfs")
            .maybe_timeout(self.timeout)
    }

    /// `-mkdir -p`: creates parents, no-op when present
    pub fn mkdir(&self, dir: &HdfsPath) -> ProcessCommand {
        self.dfs().args(["-mkdir", "-p", dir.as_str()]).build()
    }

    /// `-put -f`: replaces an existing file of the same name
    pub fn put(&self, local: &Path, dir: &HdfsPath) -> ProcessCommand {
        let local = local.to_string_lossy();
        self.dfs()
            .args(["-put", "-f", &*local, dir.as_str()])
            .build()
    }

    pub fn ls(&self, dir: &HdfsPath) -> ProcessCommand {
        self.dfs().args(["-ls", dir.as_str()]).build()
    }
}
