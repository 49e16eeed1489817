use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::FailurePolicy;
use crate::error::{ErrorCode, HdctlError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    Failed { exit_code: i32 },
    TimedOut,
    Signaled { signal: i32 },
    SpawnFailed { reason: String },
    MissingInput { path: PathBuf },
    Skipped,
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Succeeded)
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, StepStatus::Succeeded | StepStatus::Skipped)
    }

    fn error_code(&self) -> u16 {
        match self {
            StepStatus::Failed { .. } => ErrorCode::EXEC_SUBPROCESS_FAILED,
            StepStatus::TimedOut => ErrorCode::EXEC_TIMEOUT,
            StepStatus::Signaled { .. } => ErrorCode::EXEC_SIGNAL_RECEIVED,
            StepStatus::SpawnFailed { .. } => ErrorCode::EXEC_SPAWN_FAILED,
            StepStatus::MissingInput { .. } => ErrorCode::EXEC_MISSING_INPUT,
            StepStatus::Succeeded | StepStatus::Skipped => ErrorCode::EXEC_GENERIC,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Succeeded => write!(f, "ok"),
            StepStatus::Failed { exit_code } => write!(f, "exited with code {}", exit_code),
            StepStatus::TimedOut => write!(f, "timed out"),
            StepStatus::Signaled { signal } => write!(f, "killed by signal {}", signal),
            StepStatus::SpawnFailed { reason } => write!(f, "could not start: {}", reason),
            StepStatus::MissingInput { path } => {
                write!(f, "missing input file {}", path.display())
            }
            StepStatus::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub description: String,
    pub command: String,
    #[serde(flatten)]
    pub status: StepStatus,
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
}

/// Aggregate result of one plan run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub plan: String,
    pub policy: FailurePolicy,
    pub outcomes: Vec<StepOutcome>,
}

impl RunReport {
    pub fn new(plan: impl Into<String>, policy: FailurePolicy) -> Self {
        Self {
            plan: plan.into(),
            policy,
            outcomes: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.status.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failure())
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == StepStatus::Skipped)
            .count()
    }

    pub fn total_duration(&self) -> Duration {
        self.outcomes.iter().map(|o| o.duration).sum()
    }

    /// Multi-line summary of failed and skipped steps
    pub fn failure_summary(&self) -> String {
        let failed: Vec<_> = self.failures().collect();
        let mut out = format!(
            "{}: {} of {} steps failed",
            self.plan,
            failed.len(),
            self.outcomes.len()
        );
        let skipped = self.skipped();
        if skipped > 0 {
            out.push_str(&format!(", {} skipped", skipped));
        }
        for outcome in failed {
            out.push_str(&format!(
                "\n  step {} '{}': {}",
                outcome.index + 1,
                outcome.description,
                outcome.status
            ));
        }
        out
    }

    /// `Ok` when every step succeeded, otherwise an execution error for the
    /// first failed step
    pub fn into_result(self) -> Result<Self, HdctlError> {
        let first = self.failures().next().cloned();
        let first = match first {
            None => return Ok(self),
            Some(first) => first,
        };
        let code = if self.failures().count() > 1 {
            ErrorCode::EXEC_STEPS_FAILED
        } else {
            first.status.error_code()
        };
        let mut err = HdctlError::execution_with_code(
            code,
            self.failure_summary(),
            Some(first.command.clone()),
        );
        if let (
            HdctlError::Execution { exit_code, .. },
            StepStatus::Failed { exit_code: code },
        ) = (&mut err, &first.status)
        {
            *exit_code = Some(*code);
        }
        Err(err)
    }
}
