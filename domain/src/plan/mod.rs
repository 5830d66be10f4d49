//! Phased execution plans built from a review team.

pub mod entities;

pub use entities::{ExecutionPhase, ExecutionPlan, PhaseKind};
