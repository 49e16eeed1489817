//! Seeding HDFS with the cleaned JSON datasets.

use crate::config::HdctlConfig;
use crate::hadoop::DfsCommands;
use crate::plan::{Plan, Step};

pub const IMPORTED_MESSAGE: &str = "JSON files imported into Hadoop!";

/// Create every directory, then upload every file, then list the
/// directories marked for verification.
///
/// Both `-mkdir -p` and `-put -f` are idempotent, so re-running the import
/// leaves each directory holding only the latest upload.
pub fn import_plan(config: &HdctlConfig) -> Plan {
    let layout = config.layout();
    let dfs = DfsCommands::new(&layout, config.step_timeout);
    let mut plan = Plan::new("import", IMPORTED_MESSAGE);

    for dataset in &config.datasets {
        plan.push(Step::new(
            format!("create {}", dataset.hdfs_dir),
            dfs.mkdir(&dataset.hdfs_dir),
        ));
    }

    for dataset in &config.datasets {
        plan.push(
            Step::new(
                format!("upload {} to {}", dataset.local_file.display(), dataset.hdfs_dir),
                dfs.put(&dataset.local_file, &dataset.hdfs_dir),
            )
            .requires_file(&dataset.local_file),
        );
    }

    for dataset in config.datasets.iter().filter(|d| d.verify) {
        plan.push(Step::new(
            format!("list {}", dataset.hdfs_dir),
            dfs.ls(&dataset.hdfs_dir),
        ));
    }

    plan
}
