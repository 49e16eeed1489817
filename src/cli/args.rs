//! CLI argument structures

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::plan::FailurePolicy;

/// Start, stop and seed a single-host Hadoop cluster
#[derive(Parser, Debug)]
#[command(name = "hdctl")]
#[command(about = "hdctl - Start, stop and seed a single-host Hadoop cluster", long_about = None)]
#[command(version, arg_required_else_help = true)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./hdctl.toml when present)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// What to do after a failed step: halt or continue
    #[arg(long, global = true, value_name = "POLICY")]
    pub policy: Option<FailurePolicy>,

    /// Hadoop installation root (overrides HADOOP_HOME)
    #[arg(long, global = true, value_name = "DIR")]
    pub hadoop_home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HDFS, the secondary DataNode and YARN
    Start(RunArgs),

    /// Stop the secondary DataNode, YARN and HDFS
    Stop(RunArgs),

    /// Upload the JSON datasets into HDFS
    Import(RunArgs),

    /// Run the end-to-end data pipeline
    Pipeline(RunArgs),

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RunArgs {
    /// Print the steps without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}
