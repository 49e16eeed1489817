//! End-to-end project pipeline: download, clean, import, load, analyze.
//!
//! Each configured entry is one external command. Commands are split with
//! shell-word rules and executed directly, never through `sh -c`.

use std::path::Path;

use crate::config::loader::{CONFIG_ENV, HADOOP_HOME_ENV, POLICY_ENV};
use crate::config::{HdctlConfig, PipelineStep};
use crate::error::{ErrorCode, HdctlError};
use crate::plan::{FailurePolicy, Plan, Step};
use crate::subprocess::ProcessCommandBuilder;

pub const PIPELINE_MESSAGE: &str = "Pipeline complete.";

/// Name under which pipeline steps refer back to this tool
const SELF_PROGRAM: &str = "hdctl";

/// How pipeline steps that call `hdctl` itself are launched
#[derive(Debug, Clone, Default)]
pub struct SelfInvocation<'a> {
    /// Path of the running executable, used instead of a `PATH` lookup
    pub exe: Option<&'a Path>,
    /// Explicit config file, forwarded so nested runs see the same settings
    pub config: Option<&'a Path>,
    /// `-v` count of the outer run
    pub verbose: u8,
}

/// Launch a nested `hdctl` with the outer run's effective settings.
///
/// Flags already folded into `config` are passed down through the
/// environment variables the loader reads, so they win over the nested
/// run's file and environment just as they did for the outer one.
fn self_command(
    args: &[String],
    config: &HdctlConfig,
    this: &SelfInvocation<'_>,
) -> ProcessCommandBuilder {
    let exe = this
        .exe
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| SELF_PROGRAM.to_string());

    let mut builder =
        ProcessCommandBuilder::new(&exe).env(POLICY_ENV, &config.policy.to_string());
    if let Some(path) = this.config {
        builder = builder.env(CONFIG_ENV, &path.to_string_lossy());
    }
    if let Some(home) = &config.hadoop_home {
        builder = builder.env(HADOOP_HOME_ENV, &home.to_string_lossy());
    }
    if this.verbose > 0 {
        builder = builder.arg(&format!("-{}", "v".repeat(this.verbose as usize)));
    }
    builder.args(args)
}

fn step_from(
    index: usize,
    entry: &PipelineStep,
    config: &HdctlConfig,
    this: &SelfInvocation<'_>,
) -> Result<Step, HdctlError> {
    let words = shell_words::split(&entry.command).map_err(|e| {
        HdctlError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_COMMAND,
            format!("step {} '{}': {}", index + 1, entry.description, e),
            Some("pipeline.steps".to_string()),
        )
    })?;

    let (program, args) = words.split_first().ok_or_else(|| {
        HdctlError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_COMMAND,
            format!("step {} '{}' has an empty command", index + 1, entry.description),
            Some("pipeline.steps".to_string()),
        )
    })?;

    let builder = if program == SELF_PROGRAM {
        self_command(args, config, this)
    } else {
        ProcessCommandBuilder::new(program).args(args)
    };

    Ok(Step::new(
        entry.description.clone(),
        builder.maybe_timeout(config.step_timeout).build(),
    ))
}

/// Build the pipeline plan; it always halts at the first failed step
pub fn pipeline_plan(
    config: &HdctlConfig,
    this: &SelfInvocation<'_>,
) -> Result<Plan, HdctlError> {
    let mut plan = Plan::new("pipeline", PIPELINE_MESSAGE)
        .with_policy(FailurePolicy::Halt)
        .with_pause(config.pipeline.pause);

    for (index, entry) in config.pipeline.steps.iter().enumerate() {
        plan.push(step_from(index, entry, config, this)?);
    }

    Ok(plan)
}
