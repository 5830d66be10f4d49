//! Review team selection.
//!
//! - [`entities`]: the selected team and why each agent is on it
//! - [`tunables`]: thresholds, weights and lookup tables
//! - [`selector`]: the ranking algorithm

pub mod entities;
pub mod selector;
pub mod tunables;

pub use entities::{CoordinationPattern, DomainMatch, ReviewTeam, SelectedAgent, SelectionReason};
pub use selector::{AgentHistory, NoHistory, TeamSelector};
pub use tunables::{SelectionTunables, TierHours, TierWeights};
