use clap::Parser;
use tracing::debug;

use hdctl::app::{handle_fatal_error, init_logging, AppConfig};
use hdctl::cli::{execute_command, Cli, CommandContext};
use hdctl::config::load_config;
use hdctl::subprocess::SubprocessManager;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let app = AppConfig::new(cli.verbose).with_config_path(cli.config.clone());
    init_logging(&app);

    let mut config = match load_config(app.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => handle_fatal_error(e.into(), app.verbose),
    };

    // Flags beat file and environment
    if let Some(home) = cli.hadoop_home {
        config.hadoop_home = Some(home);
    }
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }
    debug!("Effective policy: {}", config.policy);

    let ctx = CommandContext {
        app,
        config,
        runner: SubprocessManager::production().runner(),
    };

    if let Err(e) = execute_command(cli.command, &ctx).await {
        handle_fatal_error(e, ctx.app.verbose);
    }
}
