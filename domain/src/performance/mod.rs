//! Per-agent historical performance.

pub mod record;
pub mod report;

pub use record::{AgentRecord, EffectivenessWeights, RunOutcome, effectiveness_score};
pub use report::format_report;
