//! Layered configuration loading.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, environment
//! variables. CLI flags are applied by the caller on top of the result.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ConfigValidator, HdctlConfig};
use crate::error::{ErrorCode, HdctlError};

pub const DEFAULT_CONFIG_FILE: &str = "hdctl.toml";
pub const CONFIG_ENV: &str = "HDCTL_CONFIG";
pub const POLICY_ENV: &str = "HDCTL_POLICY";
pub const HADOOP_HOME_ENV: &str = "HADOOP_HOME";

/// Load configuration using the process environment
pub fn load_config(explicit: Option<&Path>) -> Result<HdctlConfig, HdctlError> {
    load_config_with(explicit, Path::new("."), |key| std::env::var(key).ok())
}

/// Load configuration with an injectable environment lookup.
///
/// `base_dir` is where the implicit `hdctl.toml` is looked for.
pub fn load_config_with<F>(
    explicit: Option<&Path>,
    base_dir: &Path,
    env: F,
) -> Result<HdctlConfig, HdctlError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match locate(explicit, base_dir, &env)? {
        Some(path) => read_file(&path)?,
        None => {
            debug!("No configuration file found, using defaults");
            HdctlConfig::default()
        }
    };

    apply_env(&mut config, &env)?;
    ConfigValidator::validate(&config)?;
    Ok(config)
}

fn locate<F>(
    explicit: Option<&Path>,
    base_dir: &Path,
    env: &F,
) -> Result<Option<PathBuf>, HdctlError>
where
    F: Fn(&str) -> Option<String>,
{
    let requested = explicit
        .map(Path::to_path_buf)
        .or_else(|| env(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));

    if let Some(path) = requested {
        if !path.is_file() {
            return Err(HdctlError::config_with_code(
                ErrorCode::CONFIG_NOT_FOUND,
                format!("configuration file {} does not exist", path.display()),
            ));
        }
        return Ok(Some(path));
    }

    let implicit = base_dir.join(DEFAULT_CONFIG_FILE);
    Ok(implicit.is_file().then_some(implicit))
}

fn read_file(path: &Path) -> Result<HdctlConfig, HdctlError> {
    debug!("Loading configuration from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| {
        HdctlError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("cannot read {}", path.display()),
        )
        .with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        HdctlError::config_with_code(
            ErrorCode::CONFIG_PARSE_ERROR,
            format!("{}: {}", path.display(), e.message()),
        )
        .with_source(e)
    })
}

fn apply_env<F>(config: &mut HdctlConfig, env: &F) -> Result<(), HdctlError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(home) = env(HADOOP_HOME_ENV).filter(|v| !v.is_empty()) {
        debug!("{} overrides hadoop_home: {}", HADOOP_HOME_ENV, home);
        config.hadoop_home = Some(PathBuf::from(home));
    }

    if let Some(policy) = env(POLICY_ENV).filter(|v| !v.is_empty()) {
        config.policy = policy
            .parse()
            .map_err(|e: HdctlError| e.with_context(format!("from {}", POLICY_ENV)))?;
    }

    Ok(())
}
