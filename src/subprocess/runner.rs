use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

use super::error::ProcessError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Overrides applied on top of the inherited environment
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
    /// Forward each output line to the terminal as it is read
    pub echo: bool,
}

impl ProcessCommand {
    /// Shell-quoted rendering of program and arguments
    pub fn command_line(&self) -> String {
        shell_words::join(std::iter::once(&self.program).chain(self.args.iter()))
    }

    /// `KEY=value` rendering of the environment overrides
    pub fn env_line(&self) -> String {
        self.env
            .iter()
            .map(|(k, v)| format!("{}={}", k, shell_words::quote(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Timeout,
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError>;
}

pub struct TokioProcessRunner;

impl TokioProcessRunner {
    fn log_command_start(command: &ProcessCommand) {
        tracing::debug!("Executing subprocess: {}", command.command_line());

        if !command.env.is_empty() {
            tracing::debug!("Environment overrides: {}", command.env_line());
        }

        if let Some(ref dir) = command.working_dir {
            tracing::trace!("Working directory: {:?}", dir);
        }
    }

    /// Configure the command with environment overrides and working directory.
    ///
    /// The parent environment is inherited: Hadoop's control scripts read
    /// `JAVA_HOME` and the rest of `HADOOP_*` from it.
    fn configure_command(command: &ProcessCommand) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args);

        for (key, value) in &command.env {
            cmd.env(key, value);
        }

        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        // Own process group, so a timeout can take down everything the
        // control scripts fork
        #[cfg(unix)]
        {
            cmd.process_group(0);
        }

        cmd.stdin(std::process::Stdio::null());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }

    /// Kill the child's whole process group so forked daemons and ssh
    /// sessions go down with it, then reap the child.
    async fn kill_process_group(child: &mut tokio::process::Child) {
        #[cfg(unix)]
        {
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            if let Some(pid) = child.id() {
                if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                    tracing::warn!("Failed to kill process group {}: {}", pid, e);
                }
            }
        }

        if let Err(e) = child.kill().await {
            tracing::debug!("Child already gone after group kill: {}", e);
        }
    }

    /// Collect what a reader task captured, giving up after `grace` when
    /// something outside the process group still holds the pipe open.
    async fn collect_stream(
        handle: Option<JoinHandle<String>>,
        grace: Option<Duration>,
    ) -> String {
        let Some(mut handle) = handle else {
            return String::new();
        };
        let joined = match grace {
            Some(grace) => match tokio::time::timeout(grace, &mut handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    tracing::warn!("Output stream still open {:?} after kill", grace);
                    handle.abort();
                    return String::new();
                }
            },
            None => handle.await,
        };
        joined.unwrap_or_default()
    }

    fn parse_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::parse_signal_status(status)
        }
    }

    #[cfg(unix)]
    fn parse_signal_status(status: std::process::ExitStatus) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            ExitStatus::Signal(signal)
        } else {
            ExitStatus::Error(1)
        }
    }

    #[cfg(not(unix))]
    fn parse_signal_status(_status: std::process::ExitStatus) -> ExitStatus {
        ExitStatus::Error(1)
    }

    fn log_result(result: &ProcessOutput, command: &ProcessCommand) {
        let command_str = command.command_line();

        match &result.status {
            ExitStatus::Success => {
                tracing::debug!(
                    "Subprocess completed successfully in {:?}: {}",
                    result.duration,
                    command_str
                );
                tracing::trace!("Stdout length: {} bytes", result.stdout.len());
            }
            ExitStatus::Error(code) => {
                tracing::debug!(
                    "Subprocess failed with exit code {} in {:?}: {}",
                    code,
                    result.duration,
                    command_str
                );
                if !result.stderr.is_empty() {
                    tracing::trace!("Stderr: {}", result.stderr);
                }
            }
            ExitStatus::Signal(signal) => {
                tracing::warn!(
                    "Subprocess terminated by signal {} in {:?}: {}",
                    signal,
                    result.duration,
                    command_str
                );
            }
            ExitStatus::Timeout => {
                tracing::warn!(
                    "Subprocess timed out after {:?}: {}",
                    result.duration,
                    command_str
                );
            }
        }
    }

    fn map_spawn_error(error: std::io::Error, command: &ProcessCommand) -> ProcessError {
        if error.kind() == std::io::ErrorKind::NotFound {
            ProcessError::CommandNotFound(command.program.clone())
        } else {
            ProcessError::SpawnFailed {
                command: command.command_line(),
                source: error,
            }
        }
    }
}

/// How long readers may keep draining pipes once a timed-out child is dead
const DRAIN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
enum StreamSource {
    Stdout,
    Stderr,
}

/// Read a stream line by line, echoing each line when asked, and return
/// everything read. Lines already read survive a timeout.
async fn forward_lines(
    stream: impl AsyncRead + Unpin,
    source: StreamSource,
    echo: bool,
) -> String {
    let mut lines = BufReader::new(stream).lines();
    let mut captured = String::new();

    while let Ok(Some(line)) = lines.next_line().await {
        if echo {
            match source {
                StreamSource::Stdout => println!("{}", line),
                StreamSource::Stderr => eprintln!("{}", line),
            }
        }
        captured.push_str(&line);
        captured.push('\n');
    }

    captured
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        let start = std::time::Instant::now();

        Self::log_command_start(&command);

        let mut cmd = Self::configure_command(&command);
        let mut child = cmd
            .spawn()
            .map_err(|e| Self::map_spawn_error(e, &command))?;

        let stdout = child
            .stdout
            .take()
            .map(|s| tokio::spawn(forward_lines(s, StreamSource::Stdout, command.echo)));
        let stderr = child
            .stderr
            .take()
            .map(|s| tokio::spawn(forward_lines(s, StreamSource::Stderr, command.echo)));

        let (status, grace) = match command.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => (Self::parse_exit_status(status?), None),
                Err(_) => {
                    Self::kill_process_group(&mut child).await;
                    (ExitStatus::Timeout, Some(DRAIN_GRACE))
                }
            },
            None => (Self::parse_exit_status(child.wait().await?), None),
        };

        let result = ProcessOutput {
            status,
            stdout: Self::collect_stream(stdout, grace).await,
            stderr: Self::collect_stream(stderr, grace).await,
            duration: start.elapsed(),
        };

        Self::log_result(&result, &command);

        Ok(result)
    }
}
