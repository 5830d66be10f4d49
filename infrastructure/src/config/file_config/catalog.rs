//! Catalog configuration from TOML (`[catalog]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw catalog configuration from TOML
///
/// ```toml
/// [catalog]
/// path = "~/.config/review-squad/agents.toml"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// Agent catalog file; defaults to `agents.toml` next to the global config
    pub path: Option<PathBuf>,
}
