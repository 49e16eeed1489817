use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::report::{RunReport, StepOutcome, StepStatus};
use super::{FailurePolicy, Plan, Step};
use crate::subprocess::{ExitStatus, ProcessRunner};

#[derive(Debug, Clone, Default)]
pub struct ExecutorOptions {
    pub policy: FailurePolicy,
    /// Forward each command's stdout/stderr to the terminal as it arrives
    pub echo_output: bool,
    /// Print `=== step ===` banners around each step
    pub announce: bool,
}

/// Runs a plan's steps strictly one after another
pub struct SequenceExecutor {
    runner: Arc<dyn ProcessRunner>,
    options: ExecutorOptions,
}

impl SequenceExecutor {
    pub fn new(runner: Arc<dyn ProcessRunner>, options: ExecutorOptions) -> Self {
        Self { runner, options }
    }

    pub async fn run(&self, plan: &Plan) -> RunReport {
        let policy = plan.policy_override.unwrap_or(self.options.policy);
        let mut report = RunReport::new(plan.name.clone(), policy);
        let total = plan.steps.len();
        let mut halted = false;

        info!("Running plan '{}' ({} steps, policy {})", plan.name, total, policy);

        for (index, step) in plan.steps.iter().enumerate() {
            if halted {
                debug!("Skipping step {}/{}: {}", index + 1, total, step.description);
                report.outcomes.push(StepOutcome {
                    index,
                    description: step.description.clone(),
                    command: step.command.command_line(),
                    status: StepStatus::Skipped,
                    duration: Duration::ZERO,
                });
                continue;
            }

            if index > 0 {
                if let Some(pause) = plan.pause {
                    tokio::time::sleep(pause).await;
                }
            }

            let outcome = self.run_step(index, total, step).await;

            if outcome.status.is_failure() {
                error!(
                    "Step {}/{} '{}' failed: {}",
                    index + 1,
                    total,
                    step.description,
                    outcome.status
                );
                if self.options.announce {
                    eprintln!("ERROR: Step failed: {} ({})", step.description, outcome.status);
                }
                if policy == FailurePolicy::Halt {
                    halted = true;
                } else {
                    warn!("Continuing after failure (policy continue)");
                }
            } else if self.options.announce {
                println!("Completed: {}\n", step.description);
            }

            report.outcomes.push(outcome);
        }

        info!(
            "Plan '{}' finished in {:?}: {} failed, {} skipped",
            plan.name,
            report.total_duration(),
            report.failures().count(),
            report.skipped()
        );
        report
    }

    async fn run_step(&self, index: usize, total: usize, step: &Step) -> StepOutcome {
        let command_line = step.command.command_line();
        let start = Instant::now();

        info!("[{}/{}] {}", index + 1, total, step.description);
        if self.options.announce {
            println!("\n=== {} ===", step.description);
            println!("Running: {}", command_line);
        }

        let status = match self.missing_input(step) {
            Some(path) => StepStatus::MissingInput { path },
            None => self.spawn(step).await,
        };

        StepOutcome {
            index,
            description: step.description.clone(),
            command: command_line,
            status,
            duration: start.elapsed(),
        }
    }

    fn missing_input(&self, step: &Step) -> Option<PathBuf> {
        let required = step.requires.as_ref()?;
        let resolved = match &step.command.working_dir {
            Some(dir) if required.is_relative() => dir.join(required),
            _ => required.clone(),
        };
        if resolved.is_file() {
            None
        } else {
            warn!("Required input {} does not exist", resolved.display());
            Some(required.clone())
        }
    }

    async fn spawn(&self, step: &Step) -> StepStatus {
        let mut command = step.command.clone();
        command.echo = self.options.echo_output;

        match self.runner.run(command).await {
            Ok(output) => match output.status {
                ExitStatus::Success => StepStatus::Succeeded,
                ExitStatus::Error(exit_code) => StepStatus::Failed { exit_code },
                ExitStatus::Timeout => StepStatus::TimedOut,
                ExitStatus::Signal(signal) => StepStatus::Signaled { signal },
            },
            Err(e) => StepStatus::SpawnFailed {
                reason: e.to_string(),
            },
        }
    }
}
