//! Logging infrastructure: structured monitor event logging.
//!
//! Provides [`JsonlEventLog`], a JSONL file writer that implements
//! the [`EventLog`](squad_application::EventLog) port.

mod jsonl_event_log;

pub use jsonl_event_log::JsonlEventLog;
