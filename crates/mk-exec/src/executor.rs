use std::sync::Arc;

use mk_model::{MakeParams, MakeResult};
use tokio_util::sync::CancellationToken;

use crate::{
    config::ExecutorConfig,
    error::ExecError,
    event::{Bus, EventKind, ExecEvent, Subscribe},
    gate::Gate,
    proc::{ProcOutcome, ProcRunner},
    resolve::resolve,
};

/// Outcome of [`Executor::execute`] once a slot was granted.
///
/// The result is always populated; `error` is `Some` iff `result.exit_code != 0`.
#[derive(Debug)]
pub struct Execution {
    pub result: MakeResult,
    pub error: Option<ExecError>,
}

impl Execution {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Drop the structured result on failure.
    pub fn into_result(self) -> Result<MakeResult, ExecError> {
        match self.error {
            None => Ok(self.result),
            Some(err) => Err(err),
        }
    }
}

impl From<ProcOutcome> for Execution {
    fn from(outcome: ProcOutcome) -> Self {
        Self {
            result: outcome.result,
            error: outcome.error,
        }
    }
}

/// Bounded-concurrency runner of build-tool invocations.
///
/// One instance is shared (behind `Arc`) by every caller; the gate is its only
/// mutable state.
pub struct Executor {
    cfg: ExecutorConfig,
    gate: Arc<Gate>,
    runner: ProcRunner,
    bus: Bus,
}

impl Executor {
    pub fn new(
        cfg: ExecutorConfig,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Result<Self, ExecError> {
        cfg.validate()?;
        Ok(Self {
            gate: Arc::new(Gate::new(cfg.max_concurrent)),
            runner: ProcRunner::new(cfg.timeout).with_kill_grace(cfg.kill_grace),
            bus: Bus::new(subscribers),
            cfg,
        })
    }

    #[inline]
    pub fn config(&self) -> &ExecutorConfig {
        &self.cfg
    }

    #[inline]
    pub fn gate(&self) -> &Arc<Gate> {
        &self.gate
    }

    /// Run one invocation: acquire → resolve → run → release.
    ///
    /// Returns `Err` only when no slot was granted (`AdmissionCancelled` or
    /// `GateClosed`); no process is launched in that case. Every other failure
    /// comes back inside [`Execution`] together with its result.
    pub async fn execute(
        &self,
        params: &MakeParams,
        cancel: &CancellationToken,
    ) -> Result<Execution, ExecError> {
        let target = params.target();

        if self.gate.available() == 0 {
            self.bus.publish(
                ExecEvent::new(EventKind::AdmissionWaiting)
                    .with_target(target)
                    .with_in_use(self.gate.in_use()),
            );
        }

        let permit = match self.gate.acquire(cancel).await {
            Ok(permit) => permit,
            Err(err) => {
                self.bus.publish(
                    ExecEvent::new(EventKind::AdmissionRejected)
                        .with_target(target)
                        .with_reason(err.to_string()),
                );
                return Err(err);
            }
        };
        self.bus.publish(
            ExecEvent::new(EventKind::Admitted)
                .with_target(target)
                .with_in_use(self.gate.in_use()),
        );

        let cmd = resolve(&self.cfg.program, &self.cfg.workdir, params);
        self.bus.publish(
            ExecEvent::new(EventKind::ProcessStarting)
                .with_target(target)
                .with_reason(cmd.to_string()),
        );

        let outcome = self.runner.run(&cmd, cancel).await;
        self.publish_outcome(target, &outcome);
        drop(permit);

        Ok(outcome.into())
    }

    fn publish_outcome(&self, target: &str, outcome: &ProcOutcome) {
        let kind = match &outcome.error {
            None => EventKind::ProcessExited,
            Some(ExecError::Timeout { .. }) => EventKind::TimeoutHit,
            Some(ExecError::Cancelled) => EventKind::Cancelled,
            Some(ExecError::Launch { .. }) => EventKind::LaunchFailed,
            Some(_) => EventKind::ProcessFailed,
        };

        let mut event = ExecEvent::new(kind)
            .with_target(target)
            .with_exit_code(outcome.result.exit_code)
            .with_duration_ms(outcome.result.duration_ms)
            .with_in_use(self.gate.in_use());
        if kind == EventKind::TimeoutHit {
            event = event.with_timeout_ms(self.cfg.timeout.as_millis() as u64);
        }
        if let Some(err) = &outcome.error {
            event = event.with_reason(err.to_string());
        }
        self.bus.publish(event);
    }
}
