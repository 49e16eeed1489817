use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod loader;
pub mod validator;

pub use loader::{load_config, load_config_with, CONFIG_ENV, DEFAULT_CONFIG_FILE, POLICY_ENV};
pub use validator::ConfigValidator;

use crate::hadoop::node::DEFAULT_IDENT;
use crate::hadoop::{HadoopLayout, HdfsPath, NodeIdentity};
use crate::plan::FailurePolicy;

/// Default HDFS root of the air-quality datasets
pub const DEFAULT_HDFS_ROOT: &str = "/air_quality";
/// Default local directory holding the cleaned JSON files
pub const DEFAULT_DATA_DIR: &str = "data_clean";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HdctlConfig {
    /// Hadoop installation root; `HADOOP_HOME` when unset here
    pub hadoop_home: Option<PathBuf>,

    pub policy: FailurePolicy,

    /// Upper bound on any single external command
    #[serde(with = "humantime_serde")]
    pub step_timeout: Option<Duration>,

    pub secondary_datanode: SecondaryDataNode,

    pub datasets: Vec<Dataset>,

    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecondaryDataNode {
    /// Defaults to `<hadoop_home>/etc/hadoop-dn2`
    pub conf_dir: Option<PathBuf>,
    pub ident: String,
}

impl Default for SecondaryDataNode {
    fn default() -> Self {
        Self {
            conf_dir: None,
            ident: DEFAULT_IDENT.to_string(),
        }
    }
}

/// One local JSON file and the HDFS directory it is uploaded into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    pub name: String,
    pub local_file: PathBuf,
    pub hdfs_dir: HdfsPath,
    /// List the directory after upload
    #[serde(default = "default_verify")]
    pub verify: bool,
}

fn default_verify() -> bool {
    true
}

impl Dataset {
    fn air_quality(name: &str, verify: bool) -> Self {
        Self {
            name: name.to_string(),
            local_file: PathBuf::from(DEFAULT_DATA_DIR).join(format!("{}.json", name)),
            hdfs_dir: HdfsPath(format!("{}/{}", DEFAULT_HDFS_ROOT, name)),
            verify,
        }
    }

    /// locations, sensors and measurements; the measurements directory is
    /// large and not listed
    pub fn defaults() -> Vec<Dataset> {
        vec![
            Self::air_quality("locations", true),
            Self::air_quality("sensors", true),
            Self::air_quality("measurements", false),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(with = "humantime_serde")]
    pub pause: Duration,
    pub steps: Vec<PipelineStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineStep {
    pub description: String,
    pub command: String,
}

impl PipelineStep {
    pub fn new(description: &str, command: &str) -> Self {
        Self {
            description: description.to_string(),
            command: command.to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pause: Duration::from_secs(1),
            steps: vec![
                PipelineStep::new("Downloading OpenAQ Data", "python3 data_download.py"),
                PipelineStep::new("Cleaning and normalizing data", "python3 data_clean.py"),
                PipelineStep::new("Importing data into HDFS", "hdctl import"),
                PipelineStep::new(
                    "Loading HDFS data into MongoDB (Spark)",
                    "python3 load_to_mongo.py",
                ),
                PipelineStep::new("Running analytics", "python3 analytics.py"),
            ],
        }
    }
}

impl Default for HdctlConfig {
    fn default() -> Self {
        Self {
            hadoop_home: None,
            policy: FailurePolicy::Halt,
            step_timeout: None,
            secondary_datanode: SecondaryDataNode::default(),
            datasets: Dataset::defaults(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl HdctlConfig {
    pub fn layout(&self) -> HadoopLayout {
        HadoopLayout::new(self.hadoop_home.clone())
    }

    /// Identity of the second DataNode, with defaults filled from the layout
    pub fn secondary_identity(&self) -> NodeIdentity {
        let mut identity = NodeIdentity::secondary_default(self.hadoop_home.as_deref());
        if let Some(dir) = &self.secondary_datanode.conf_dir {
            identity.conf_dir = dir.clone();
        }
        identity.ident = self.secondary_datanode.ident.clone();
        identity
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
