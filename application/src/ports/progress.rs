//! Progress notification port
//!
//! Defines the interface for reporting progress while a plan executes.

use squad_domain::ExecutionPhase;

/// Callback for progress updates during plan execution
///
/// Implementations live in the presentation layer.
pub trait ExecutionProgress: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &ExecutionPhase);

    /// Called when one agent of a phase finishes
    fn on_agent_complete(&self, phase: &ExecutionPhase, agent: &str, success: bool);

    /// Called when every agent of a phase has finished
    fn on_phase_complete(&self, phase: &ExecutionPhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ExecutionProgress for NoProgress {
    fn on_phase_start(&self, _phase: &ExecutionPhase) {}
    fn on_agent_complete(&self, _phase: &ExecutionPhase, _agent: &str, _success: bool) {}
    fn on_phase_complete(&self, _phase: &ExecutionPhase) {}
}
