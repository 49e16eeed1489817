//! Command construction for Hadoop's own control binaries.
//!
//! Nothing here talks to the cluster. These types only describe which
//! binary to run with which arguments and environment.

pub mod fs;
pub mod layout;
pub mod node;

pub use fs::{DfsCommands, HdfsPath};
pub use layout::HadoopLayout;
pub use node::{daemon_command, DaemonAction, DaemonRole, NodeIdentity};
