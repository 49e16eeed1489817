//! # hdctl
//!
//! Start, stop and seed a single-host Hadoop cluster, and run the project's
//! data pipeline, with every step's result checked.
//!
//! ## Usage
//!
//! ```bash
//! hdctl start [--dry-run] [--json]
//! hdctl import
//! hdctl stop
//! hdctl pipeline
//! ```
//!
//! ## Modules
//!
//! - `app` - Logging setup, process-level settings, fatal error reporting
//! - `cli` - Argument parsing, command handlers and routing
//! - `cluster` - Start and stop sequences for HDFS, YARN and the secondary DataNode
//! - `config` - `hdctl.toml` loading, environment overlay and validation
//! - `error` - Unified error type with numeric codes
//! - `hadoop` - Command construction for Hadoop's control binaries
//! - `import` - Uploading the JSON datasets into HDFS
//! - `pipeline` - End-to-end project pipeline
//! - `plan` - Ordered step plans, the sequence executor and run reports
//! - `subprocess` - Process runner abstraction with a recording mock
pub mod app;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod hadoop;
pub mod import;
pub mod pipeline;
pub mod plan;
pub mod subprocess;
