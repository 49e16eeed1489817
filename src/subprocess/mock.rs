use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

/// Recording runner used to exercise plans without touching a real cluster.
///
/// Expectations are matched in registration order. Commands that match no
/// expectation get the fallback response if one was set with
/// [`MockProcessRunner::succeed_by_default`], and an error otherwise.
/// Clones share state, so a clone handed to an executor records into the
/// same history the test inspects.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    expectations: Vec<Expectation>,
    calls: Vec<ProcessCommand>,
    fallback: Option<ProcessOutput>,
}

type ArgsMatcher = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

struct Expectation {
    program: String,
    args_matcher: Option<ArgsMatcher>,
    response: ProcessOutput,
    matched: usize,
    limit: Option<usize>,
}

impl Expectation {
    fn matches(&self, command: &ProcessCommand) -> bool {
        self.program == command.program
            && self
                .args_matcher
                .as_ref()
                .map_or(true, |matcher| matcher(&command.args))
    }
}

/// Builder returned by [`MockProcessRunner::expect_command`]; registers
/// the expectation on [`finish`](MockCommandConfig::finish)
pub struct MockCommandConfig {
    runner: MockProcessRunner,
    expectation: Expectation,
}

fn success_output() -> ProcessOutput {
    ProcessOutput {
        status: ExitStatus::Success,
        stdout: String::new(),
        stderr: String::new(),
        duration: Duration::from_millis(10),
    }
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    // Mock state is test-only; a poisoned lock means a test already panicked
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start an expectation for `program`; it answers with success until
    /// told otherwise
    pub fn expect_command(&mut self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: Expectation {
                program: program.to_string(),
                args_matcher: None,
                response: success_output(),
                matched: 0,
                limit: None,
            },
        }
    }

    /// Answer every unmatched command with a successful, empty output
    pub fn succeed_by_default(&mut self) {
        self.state().fallback = Some(success_output());
    }

    /// Whether `program` was run exactly `times` times
    pub fn verify_called(&self, program: &str, times: usize) -> bool {
        self.state()
            .calls
            .iter()
            .filter(|cmd| cmd.program == program)
            .count()
            == times
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        self.state().calls.clone()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        let mut state = self.state();
        state.calls.push(command.clone());

        if let Some(expectation) = state
            .expectations
            .iter_mut()
            .find(|e| e.matches(&command))
        {
            expectation.matched += 1;
            return match expectation.limit {
                Some(limit) if expectation.matched > limit => {
                    Err(ProcessError::MockExpectationNotMet(format!(
                        "'{}' ran {} times, expected at most {}",
                        command.command_line(),
                        expectation.matched,
                        limit
                    )))
                }
                _ => Ok(expectation.response.clone()),
            };
        }

        state.fallback.clone().ok_or_else(|| {
            ProcessError::MockExpectationNotMet(format!(
                "unexpected command: {}",
                command.command_line()
            ))
        })
    }
}

impl MockCommandConfig {
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.expectation.args_matcher = Some(Box::new(matcher));
        self
    }

    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        self.expectation.response.stdout = stdout.to_string();
        self
    }

    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        self.expectation.response.stderr = stderr.to_string();
        self
    }

    pub fn returns_exit_code(self, code: i32) -> Self {
        self.returns_status(if code == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Error(code)
        })
    }

    pub fn returns_status(mut self, status: ExitStatus) -> Self {
        self.expectation.response.status = status;
        self
    }

    /// Fail the run once the expectation has matched more than `n` times
    pub fn times(mut self, n: usize) -> Self {
        self.expectation.limit = Some(n);
        self
    }

    pub fn finish(self) {
        self.runner.state().expectations.push(self.expectation);
    }
}
