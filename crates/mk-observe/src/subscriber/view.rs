use std::borrow::Borrow;

use mk_exec::{EventKind, ExecEvent};
use tracing::{debug, error, info, trace, warn};

pub trait View {
    fn as_target(&self) -> &str;
    fn as_reason(&self) -> &str;
    fn exit_code(&self) -> i32;
    fn duration_ms(&self) -> u64;
    fn timeout_ms(&self) -> u64;
    fn in_use(&self) -> usize;
    fn kind(&self) -> EventKind;
}

impl<T> View for T
where
    T: Borrow<ExecEvent>,
{
    #[inline]
    fn as_target(&self) -> &str {
        self.borrow().target.as_deref().unwrap_or("unknown")
    }
    #[inline]
    fn as_reason(&self) -> &str {
        self.borrow().reason.as_deref().unwrap_or("unknown")
    }
    #[inline]
    fn exit_code(&self) -> i32 {
        self.borrow().exit_code.unwrap_or(-1)
    }
    #[inline]
    fn duration_ms(&self) -> u64 {
        self.borrow().duration_ms.unwrap_or(0)
    }
    #[inline]
    fn timeout_ms(&self) -> u64 {
        self.borrow().timeout_ms.unwrap_or(0)
    }
    #[inline]
    fn in_use(&self) -> usize {
        self.borrow().in_use.unwrap_or(0)
    }
    #[inline]
    fn kind(&self) -> EventKind {
        self.borrow().kind
    }
}

#[inline]
pub fn message_for(kind: EventKind) -> &'static str {
    match kind {
        // admission
        EventKind::AdmissionWaiting => "all execution slots busy; waiting",
        EventKind::Admitted => "execution slot acquired",
        EventKind::AdmissionRejected => "execution not admitted",

        // process
        EventKind::ProcessStarting => "make is starting",
        EventKind::ProcessExited => "make finished successfully",
        EventKind::ProcessFailed => "make failed",
        EventKind::LaunchFailed => "make could not be started",
        EventKind::TimeoutHit => "make exceeded its configured timeout",
        EventKind::Cancelled => "make cancelled by caller",
    }
}

#[inline]
pub fn log_event<E: View>(e: E) {
    let msg = message_for(e.kind());

    match e.kind() {
        // admission
        EventKind::AdmissionWaiting => debug!(make_target = e.as_target(), in_use = e.in_use(), "{msg}"),
        EventKind::Admitted => trace!(make_target = e.as_target(), in_use = e.in_use(), "{msg}"),
        EventKind::AdmissionRejected => {
            warn!(make_target = e.as_target(), reason = e.as_reason(), "{msg}")
        }

        // process
        EventKind::ProcessStarting => {
            info!(make_target = e.as_target(), command = e.as_reason(), "{msg}")
        }
        EventKind::ProcessExited => info!(
            make_target = e.as_target(),
            duration_ms = e.duration_ms(),
            "{msg}"
        ),
        EventKind::ProcessFailed => warn!(
            make_target = e.as_target(),
            exit_code = e.exit_code(),
            duration_ms = e.duration_ms(),
            reason = e.as_reason(),
            "{msg}"
        ),
        EventKind::LaunchFailed => {
            error!(make_target = e.as_target(), reason = e.as_reason(), "{msg}")
        }
        EventKind::TimeoutHit => warn!(
            make_target = e.as_target(),
            timeout_ms = e.timeout_ms(),
            duration_ms = e.duration_ms(),
            "{msg}"
        ),
        EventKind::Cancelled => debug!(
            make_target = e.as_target(),
            duration_ms = e.duration_ms(),
            "{msg}"
        ),
    }
}
