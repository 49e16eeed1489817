//! Command routing and execution

use anyhow::Result;

use super::args::Commands;
use super::commands::{run_config_command, run_plan_command, CommandContext, PlanKind};

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(command: Commands, ctx: &CommandContext) -> Result<()> {
    match command {
        Commands::Start(args) => run_plan_command(PlanKind::Start, args, ctx).await,
        Commands::Stop(args) => run_plan_command(PlanKind::Stop, args, ctx).await,
        Commands::Import(args) => run_plan_command(PlanKind::Import, args, ctx).await,
        Commands::Pipeline(args) => run_plan_command(PlanKind::Pipeline, args, ctx).await,
        Commands::Config => run_config_command(ctx),
    }
}
