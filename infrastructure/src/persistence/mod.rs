//! JSON state stores with atomic whole-file writes.

pub mod atomic;
pub mod performance_store;
pub mod watch_store;

pub use atomic::atomic_write;
pub use performance_store::JsonPerformanceStore;
pub use watch_store::JsonWatchStateStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use squad_application::StoreError;
use std::path::Path;

/// Read a JSON document; a missing file yields `T::default()`.
pub(crate) fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            });
        }
    };
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Serialize `value` as pretty JSON and replace `path` atomically.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut content =
        serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialize(e.to_string()))?;
    content.push('\n');
    atomic_write(path, content.as_bytes()).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
