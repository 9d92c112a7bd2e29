use mk_exec::{ExecEvent, Subscribe};

use crate::subscriber::view::log_event;

/// Forwards executor events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Journal;

impl Journal {
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for Journal {
    fn on_event(&self, event: &ExecEvent) {
        log_event(event);
    }

    fn name(&self) -> &'static str {
        "journal"
    }
}
