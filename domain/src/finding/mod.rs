//! Findings reported by agents and their aggregation.

pub mod aggregate;
pub mod entities;

pub use aggregate::{AggregatedFindings, SeverityCounts};
pub use entities::{Finding, Location, Severity};
