mod capture;

use std::{process::ExitStatus, time::Duration};

use mk_model::MakeResult;
use tokio::time::{Instant, sleep_until, timeout};
use tokio_util::sync::CancellationToken;

use crate::{
    error::ExecError,
    resolve::CommandLine,
    util::{cmd_program, exit_signal, kill_graceful, kill_group},
};

use capture::{Capture, Output};

/// How long pipes may stay open once the process group has been killed.
const KILL_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Terminal state of one process run.
///
/// `error` is `Some` exactly when `result.exit_code != 0`.
#[derive(Debug)]
pub struct ProcOutcome {
    pub result: MakeResult,
    pub error: Option<ExecError>,
}

impl ProcOutcome {
    fn new(stdout: String, stderr: String, duration: Duration, error: Option<ExecError>) -> Self {
        let (exit_code, message) = match &error {
            None => (0, String::new()),
            Some(err) => (err.exit_code(), err.to_string()),
        };
        Self {
            result: MakeResult {
                stdout,
                stderr,
                exit_code,
                duration_ms: duration.as_millis() as u64,
                error: message,
            },
            error,
        }
    }
}

/// How the process wait ended.
enum Exit {
    Status(ExitStatus),
    Stopped(ExecError),
}

/// Runs a resolved command line under a fixed deadline.
#[derive(Clone, Debug)]
pub struct ProcRunner {
    timeout: Duration,
    kill_grace: Duration,
}

impl ProcRunner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            kill_grace: Duration::from_millis(200),
        }
    }

    pub fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Launch `cmd` and wait for exit, the deadline, or `cancel`.
    ///
    /// Cancellation is checked first, then the deadline, then the exit. The
    /// deadline also covers collecting output: descendants that keep the pipes
    /// open past it are killed with the group and the run reports a timeout.
    pub async fn run(&self, cmd: &CommandLine, cancel: &CancellationToken) -> ProcOutcome {
        let started = Instant::now();
        let deadline = started + self.timeout;

        let mut child = match cmd_program(cmd).spawn() {
            Ok(child) => child,
            Err(source) => {
                let err = ExecError::Launch {
                    program: cmd.program.clone(),
                    source,
                };
                return ProcOutcome::new(String::new(), String::new(), started.elapsed(), Some(err));
            }
        };
        let pid = child.id();

        let mut output = Output::new(
            child.stdout.take().map(Capture::spawn),
            child.stderr.take().map(Capture::spawn),
        );

        let exit = tokio::select! {
            biased;
            _ = cancel.cancelled() => Exit::Stopped(ExecError::Cancelled),
            _ = sleep_until(deadline) => Exit::Stopped(self.timed_out()),
            status = child.wait() => match status {
                Ok(status) => Exit::Status(status),
                Err(e) => Exit::Stopped(ExecError::Wait(e)),
            },
        };

        let error = match exit {
            Exit::Stopped(err) => {
                let _ = kill_graceful(&mut child, self.kill_grace).await;
                let _ = timeout(KILL_DRAIN_GRACE, output.closed()).await;
                Some(err)
            }
            Exit::Status(status) => {
                let drained = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Some(ExecError::Cancelled),
                    _ = sleep_until(deadline) => Some(self.timed_out()),
                    _ = output.closed() => None,
                };
                match drained {
                    None => classify(status),
                    Some(err) => {
                        // The leader is gone; whatever still holds the pipes is in its group.
                        kill_group(pid);
                        let _ = timeout(KILL_DRAIN_GRACE, output.closed()).await;
                        Some(err)
                    }
                }
            }
        };
        debug_assert!(error.is_some() || output.is_complete());

        let duration = started.elapsed();
        let (stdout, stderr) = output.into_text();
        ProcOutcome::new(stdout, stderr, duration, error)
    }

    fn timed_out(&self) -> ExecError {
        ExecError::Timeout {
            timeout: self.timeout,
        }
    }
}

fn classify(status: ExitStatus) -> Option<ExecError> {
    if status.success() {
        return None;
    }
    match status.code() {
        Some(code) => Some(ExecError::NonZeroExit { code }),
        None => Some(ExecError::Signaled {
            signal: exit_signal(&status),
        }),
    }
}
