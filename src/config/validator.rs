use std::collections::HashSet;

use super::HdctlConfig;
use crate::error::{ErrorCode, HdctlError};

pub struct ConfigValidator;

impl ConfigValidator {
    /// Check the merged configuration and report every problem at once
    pub fn validate(config: &HdctlConfig) -> Result<(), HdctlError> {
        let mut problems = Vec::new();

        if let Err(e) = config.secondary_identity().validate() {
            problems.push(e.user_message());
        }

        if config.step_timeout.is_some_and(|t| t.is_zero()) {
            problems.push("step_timeout must be greater than zero".to_string());
        }

        problems.extend(Self::dataset_problems(config));
        problems.extend(Self::pipeline_problems(config));

        if problems.is_empty() {
            return Ok(());
        }

        Err(HdctlError::config_with_code(
            ErrorCode::CONFIG_VALIDATION_FAILED,
            format!("{} problem(s):\n  - {}", problems.len(), problems.join("\n  - ")),
        ))
    }

    fn dataset_problems(config: &HdctlConfig) -> Vec<String> {
        let mut problems = Vec::new();
        let mut names = HashSet::new();

        if config.datasets.is_empty() {
            problems.push("at least one dataset must be configured".to_string());
        }

        for dataset in &config.datasets {
            if dataset.name.trim().is_empty() {
                problems.push("dataset name cannot be empty".to_string());
            } else if !names.insert(dataset.name.as_str()) {
                problems.push(format!("dataset '{}' is defined twice", dataset.name));
            }
            if dataset.local_file.as_os_str().is_empty() {
                problems.push(format!("dataset '{}' has an empty local_file", dataset.name));
            }
        }

        problems
    }

    fn pipeline_problems(config: &HdctlConfig) -> Vec<String> {
        config
            .pipeline
            .steps
            .iter()
            .enumerate()
            .filter_map(|(i, step)| match shell_words::split(&step.command) {
                Ok(words) if words.is_empty() => Some(format!(
                    "pipeline step {} '{}' has an empty command",
                    i + 1,
                    step.description
                )),
                Ok(_) => None,
                Err(e) => Some(format!(
                    "pipeline step {} '{}' has an unparseable command: {}",
                    i + 1,
                    step.description,
                    e
                )),
            })
            .collect()
    }
}
