use std::sync::Arc;

/// Classification of executor lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // admission
    AdmissionWaiting,
    Admitted,
    AdmissionRejected,

    // process
    ProcessStarting,
    ProcessExited,
    ProcessFailed,
    LaunchFailed,
    TimeoutHit,
    Cancelled,
}

/// Leveled, structured event published by the executor.
///
/// Optional fields are set only where the kind carries them.
#[derive(Debug, Clone)]
pub struct ExecEvent {
    pub kind: EventKind,
    pub target: Option<String>,
    pub reason: Option<String>,
    pub exit_code: Option<i32>,
    pub duration_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub in_use: Option<usize>,
}

impl ExecEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            reason: None,
            exit_code: None,
            duration_ms: None,
            timeout_ms: None,
            in_use: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    pub fn with_in_use(mut self, in_use: usize) -> Self {
        self.in_use = Some(in_use);
        self
    }
}

/// Receiver of executor events.
///
/// Called inline on the invoking task, so implementations must not block.
pub trait Subscribe: Send + Sync + 'static {
    fn on_event(&self, event: &ExecEvent);

    fn name(&self) -> &'static str {
        "subscriber"
    }
}

/// Fan-out to every registered subscriber.
#[derive(Clone, Default)]
pub(crate) struct Bus {
    subscribers: Arc<Vec<Arc<dyn Subscribe>>>,
}

impl Bus {
    pub(crate) fn new(subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        Self {
            subscribers: Arc::new(subscribers),
        }
    }

    pub(crate) fn publish(&self, event: ExecEvent) {
        for sub in self.subscribers.iter() {
            sub.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<EventKind>>);

    impl Subscribe for Recorder {
        fn on_event(&self, event: &ExecEvent) {
            self.0.lock().unwrap().push(event.kind);
        }
    }

    #[test]
    fn bus_fans_out_in_order() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let bus = Bus::new(vec![a.clone() as Arc<dyn Subscribe>, b.clone()]);

        bus.publish(ExecEvent::new(EventKind::Admitted).with_in_use(1));
        bus.publish(ExecEvent::new(EventKind::ProcessExited).with_exit_code(0));

        let expected = vec![EventKind::Admitted, EventKind::ProcessExited];
        assert_eq!(*a.0.lock().unwrap(), expected);
        assert_eq!(*b.0.lock().unwrap(), expected);
    }

    #[test]
    fn empty_bus_is_noop() {
        Bus::default().publish(ExecEvent::new(EventKind::Cancelled));
    }
}
