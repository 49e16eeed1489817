//! Command handlers

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use super::args::RunArgs;
use crate::app::AppConfig;
use crate::config::HdctlConfig;
use crate::pipeline::SelfInvocation;
use crate::plan::{ExecutorOptions, Plan, SequenceExecutor};
use crate::subprocess::ProcessRunner;

/// Which plan a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    Start,
    Stop,
    Import,
    Pipeline,
}

/// Everything a handler needs, resolved once in `main`
pub struct CommandContext {
    pub app: AppConfig,
    pub config: HdctlConfig,
    pub runner: Arc<dyn ProcessRunner>,
}

pub fn build_plan(kind: PlanKind, ctx: &CommandContext) -> Result<Plan> {
    let plan = match kind {
        PlanKind::Start => crate::cluster::start_plan(&ctx.config),
        PlanKind::Stop => crate::cluster::stop_plan(&ctx.config),
        PlanKind::Import => crate::import::import_plan(&ctx.config),
        PlanKind::Pipeline => {
            let exe = std::env::current_exe().ok();
            let this = SelfInvocation {
                exe: exe.as_deref(),
                config: ctx.app.config_path.as_deref(),
                verbose: ctx.app.verbose,
            };
            crate::pipeline::pipeline_plan(&ctx.config, &this)?
        }
    };
    debug!("Built plan '{}' with {} steps", plan.name, plan.len());
    Ok(plan)
}

/// Run (or with `--dry-run`, print) one plan and report the outcome.
///
/// The plan's success message is printed only when every step succeeded.
pub async fn run_plan_command(kind: PlanKind, args: RunArgs, ctx: &CommandContext) -> Result<()> {
    let plan = build_plan(kind, ctx)?;

    if args.dry_run {
        print!("{}", plan.render());
        return Ok(());
    }

    let executor = SequenceExecutor::new(
        Arc::clone(&ctx.runner),
        ExecutorOptions {
            policy: ctx.config.policy,
            echo_output: !args.json,
            announce: kind == PlanKind::Pipeline && !args.json,
        },
    );
    let report = executor.run(&plan).await;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize run report")?;
        println!("{}", json);
    }

    report.into_result()?;

    if !args.json {
        println!("{}", plan.success_message);
    }
    Ok(())
}

pub fn run_config_command(ctx: &CommandContext) -> Result<()> {
    let text = ctx
        .config
        .to_toml()
        .context("Failed to render configuration")?;
    print!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subprocess::MockProcessRunner;

    fn ctx(mock: &MockProcessRunner) -> CommandContext {
        CommandContext {
            app: AppConfig::default(),
            config: HdctlConfig::default(),
            runner: Arc::new(mock.clone()),
        }
    }

    #[tokio::test]
    async fn test_dry_run_spawns_nothing() {
        let mock = MockProcessRunner::new();
        run_plan_command(
            PlanKind::Start,
            RunArgs {
                dry_run: true,
                json: false,
            },
            &ctx(&mock),
        )
        .await
        .unwrap();
        assert!(mock.get_call_history().is_empty());
    }

    #[tokio::test]
    async fn test_failed_step_surfaces_execution_error() {
        let mut mock = MockProcessRunner::new();
        mock.expect_command("stop-yarn.sh")
            .returns_exit_code(1)
            .finish();
        mock.succeed_by_default();

        let err = run_plan_command(PlanKind::Stop, RunArgs::default(), &ctx(&mock))
            .await
            .unwrap_err();
        assert_eq!(crate::app::exit_code_for(&err), 5);
        // halt: stop-dfs.sh never ran
        assert!(mock.verify_called("stop-dfs.sh", 0));
    }

    #[tokio::test]
    async fn test_successful_stop() {
        let mut mock = MockProcessRunner::new();
        mock.succeed_by_default();
        run_plan_command(PlanKind::Stop, RunArgs::default(), &ctx(&mock))
            .await
            .unwrap();
        assert_eq!(mock.get_call_history().len(), 3);
    }

    #[test]
    fn test_build_pipeline_plan() {
        let mock = MockProcessRunner::new();
        let plan = build_plan(PlanKind::Pipeline, &ctx(&mock)).unwrap();
        assert_eq!(plan.len(), 5);
    }
}
