//! Process-backed adapters for agents and the task classifier

pub mod classifier;
pub mod command_invoker;
mod process;

pub use classifier::{CommandTaskClassifier, load_profile, parse_profile};
pub use command_invoker::CommandAgentInvoker;
