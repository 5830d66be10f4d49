//! Application-level configuration.
//!
//! - [`ExecutionParams`]: plan execution control (timeouts, concurrency, team size)
//! - [`WatchParams`]: issue watcher polling and classification

pub mod execution_params;
pub mod watch_params;

pub use execution_params::ExecutionParams;
pub use watch_params::WatchParams;
