//! Agent catalog: the read-only list of available reviewer agents.

pub mod descriptor;

pub use descriptor::{AgentCatalog, AgentCategory, AgentDescriptor, ModelTier};
