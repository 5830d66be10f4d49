//! Port for structured monitor event logging.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port records every
//! [`MonitorEvent`] in a machine-readable format (JSONL).

use squad_domain::MonitorEvent;

/// Implementations write each event as one record. Logging is synchronous
/// and non-fallible; failures are reported through `tracing` only.
pub trait EventLog: Send + Sync {
    fn log(&self, event: &MonitorEvent);
}

/// No-op implementation for tests and when event logging is disabled.
pub struct NoEventLog;

impl EventLog for NoEventLog {
    fn log(&self, _event: &MonitorEvent) {}
}
