//! Ordered command plans and their execution.
//!
//! Every entry point (start, stop, import, pipeline) builds a [`Plan`] and
//! hands it to the [`SequenceExecutor`], which runs the steps one by one and
//! records a [`StepOutcome`] for each.

pub mod executor;
pub mod report;

pub use executor::{ExecutorOptions, SequenceExecutor};
pub use report::{RunReport, StepOutcome, StepStatus};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ErrorCode, HdctlError};
use crate::subprocess::ProcessCommand;

/// What the executor does after a step fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failure; later steps are recorded as skipped
    #[default]
    Halt,
    /// Keep going and report every failure at the end
    Continue,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Halt => write!(f, "halt"),
            FailurePolicy::Continue => write!(f, "continue"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = HdctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "halt" => Ok(FailurePolicy::Halt),
            "continue" => Ok(FailurePolicy::Continue),
            other => Err(HdctlError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!("unknown failure policy '{}', expected 'halt' or 'continue'", other),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Step {
    pub description: String,
    pub command: ProcessCommand,
    /// Local file that must exist before the command is spawned
    pub requires: Option<PathBuf>,
}

impl Step {
    pub fn new(description: impl Into<String>, command: ProcessCommand) -> Self {
        Self {
            description: description.into(),
            command,
            requires: None,
        }
    }

    pub fn requires_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.requires = Some(path.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Plan {
    pub name: String,
    pub steps: Vec<Step>,
    pub success_message: String,
    /// Fixed policy that overrides the caller's choice
    pub policy_override: Option<FailurePolicy>,
    /// Pause between consecutive steps
    pub pause: Option<Duration>,
}

impl Plan {
    pub fn new(name: impl Into<String>, success_message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            success_message: success_message.into(),
            policy_override: None,
            pause: None,
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy_override = Some(policy);
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = (!pause.is_zero()).then_some(pause);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Human-readable listing used by `--dry-run`
    pub fn render(&self) -> String {
        let mut out = format!("Plan '{}' ({} steps)\n", self.name, self.steps.len());
        for (i, step) in self.steps.iter().enumerate() {
            out.push_str(&format!("{:>3}. {}\n", i + 1, step.description));
            if !step.command.env.is_empty() {
                out.push_str(&format!("       env: {}\n", step.command.env_line()));
            }
            out.push_str(&format!("       run: {}\n", step.command.command_line()));
            if let Some(path) = &step.requires {
                out.push_str(&format!("  requires: {}\n", path.display()));
            }
        }
        out
    }
}
