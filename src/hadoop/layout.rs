use std::path::PathBuf;

/// Where the Hadoop control binaries live.
///
/// With a known `HADOOP_HOME` the sbin scripts and the `hdfs` launcher are
/// addressed by absolute path. Without one, bare names are left for `PATH`
/// lookup, which is how the scripts are usually invoked on a configured
/// host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HadoopLayout {
    home: Option<PathBuf>,
}

impl HadoopLayout {
    pub fn new(home: Option<PathBuf>) -> Self {
        Self { home }
    }

    /// Path of a cluster control script such as `start-dfs.sh`
    pub fn sbin(&self, script: &str) -> String {
        self.resolve("sbin", script)
    }

    /// Path of a launcher under `bin/`, e.g. `hdfs`
    pub fn bin(&self, program: &str) -> String {
        self.resolve("bin", program)
    }

    pub fn hdfs(&self) -> String {
        self.bin("hdfs")
    }

    fn resolve(&self, dir: &str, name: &str) -> String {
        match &self.home {
            Some(home) => home.join(dir).join(name).to_string_lossy().into_owned(),
            None => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_home() {
        let layout = HadoopLayout::new(Some(PathBuf::from("/opt/hadoop")));
        assert_eq!(layout.sbin("start-dfs.sh"), "/opt/hadoop/sbin/start-dfs.sh");
        assert_eq!(layout.hdfs(), "/opt/hadoop/bin/hdfs");
    }

    #[test]
    fn test_without_home_uses_path_lookup() {
        let layout = HadoopLayout::default();
        assert_eq!(layout.sbin("stop-yarn.sh"), "stop-yarn.sh");
        assert_eq!(layout.hdfs(), "hdfs");
    }
}
