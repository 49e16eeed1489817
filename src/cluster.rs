//! Cluster start and stop sequences.
//!
//! Start brings up HDFS, then the secondary DataNode, then YARN. Stop runs
//! the mirror image so nothing is left holding a connection to a NameNode
//! that has already gone away.

use crate::config::HdctlConfig;
use crate::hadoop::{daemon_command, DaemonAction, DaemonRole, HadoopLayout, NodeIdentity};
use crate::plan::{Plan, Step};
use crate::subprocess::ProcessCommandBuilder;
use std::time::Duration;

pub const STARTED_MESSAGE: &str = "All Hadoop services started.";
pub const STOPPED_MESSAGE: &str = "All Hadoop services stopped.";

fn script_step(
    description: &str,
    layout: &HadoopLayout,
    script: &str,
    timeout: Option<Duration>,
) -> Step {
    Step::new(
        description,
        ProcessCommandBuilder::new(&layout.sbin(script))
            .maybe_timeout(timeout)
            .build(),
    )
}

fn secondary_step(
    layout: &HadoopLayout,
    action: DaemonAction,
    identity: &NodeIdentity,
    timeout: Option<Duration>,
) -> Step {
    Step::new(
        format!("{} secondary DataNode ({})", action, identity.ident),
        daemon_command(layout, action, DaemonRole::DataNode, identity, timeout),
    )
}

pub fn start_plan(config: &HdctlConfig) -> Plan {
    let layout = config.layout();
    let identity = config.secondary_identity();
    let timeout = config.step_timeout;

    Plan::new("start", STARTED_MESSAGE)
        .step(script_step("start HDFS daemons", &layout, "start-dfs.sh", timeout))
        .step(secondary_step(&layout, DaemonAction::Start, &identity, timeout))
        .step(script_step("start YARN daemons", &layout, "start-yarn.sh", timeout))
}

pub fn stop_plan(config: &HdctlConfig) -> Plan {
    let layout = config.layout();
    let identity = config.secondary_identity();
    let timeout = config.step_timeout;

    Plan::new("stop", STOPPED_MESSAGE)
        .step(secondary_step(&layout, DaemonAction::Stop, &identity, timeout))
        .step(script_step("stop YARN daemons", &layout, "stop-yarn.sh", timeout))
        .step(script_step("stop HDFS daemons", &layout, "stop-dfs.sh", timeout))
}
